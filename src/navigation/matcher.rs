use log::{ debug, info };

/// Spanish section names and the English ids the page actually uses.
/// Checked in order; every entry whose key overlaps the name contributes.
const SECTION_ALIASES: &[(&str, &[&str])] = &[
    ("inicio", &["hero", "home", "hero-section"]),
    ("servicios", &["services", "services-section"]),
    ("proceso", &["process", "process-section"]),
    ("metodologia", &["process", "process-section"]),
    ("precios", &["pricing", "pricing-section"]),
    ("planes", &["pricing", "pricing-section"]),
    ("testimonios", &["testimonials", "testimonials-section"]),
    ("opiniones", &["testimonials", "testimonials-section"]),
    ("clientes", &["testimonials", "testimonials-section"]),
    ("contacto", &["contact", "contact-section"]),
    ("nosotros", &["about", "about-section"]),
    ("preguntas", &["faq", "faq-section"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Instant,
}

/// What the matcher needs from a page: id lookup, headings in document
/// order and the ability to scroll an element into view.
pub trait Document {
    type Element: Clone;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;
    fn headings(&self) -> Vec<(Self::Element, String)>;
    fn scroll_into_view(&mut self, element: &Self::Element, behavior: ScrollBehavior);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchedBy {
    Id(String),
    Heading(String),
}

#[derive(Debug, Clone)]
pub struct SectionMatch<E> {
    pub element: E,
    pub matched_by: MatchedBy,
}

fn strip_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' => 'a',
        'é' | 'è' | 'ë' => 'e',
        'í' | 'ì' | 'ï' => 'i',
        'ó' | 'ò' | 'ö' => 'o',
        'ú' | 'ù' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Lowercases and strips Spanish diacritics, keeping spacing intact.
pub fn fold_diacritics(text: &str) -> String {
    text.to_lowercase().chars().map(strip_diacritic).collect()
}

/// Lowercases, trims, turns whitespace runs into `-` and strips Spanish
/// diacritics: `"  Sobre  Nosotros "` becomes `"sobre-nosotros"`.
pub fn normalize_section_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .map(strip_diacritic)
        .collect()
}

/// Candidate element ids for an already-normalized name, in lookup order
/// and without duplicates.
pub fn candidate_ids(normalized: &str) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    let mut push = |id: String| {
        if !candidates.contains(&id) {
            candidates.push(id);
        }
    };

    push(normalized.to_string());
    for (alias, targets) in SECTION_ALIASES {
        if normalized.contains(alias) || alias.contains(normalized) {
            for target in targets.iter() {
                push(target.to_string());
            }
        }
    }
    push(format!("{}-section", normalized));
    push(format!("section-{}", normalized));
    candidates
}

/// Finds the element a section name refers to without scrolling. Ids are
/// tried before any heading text is considered.
pub fn resolve_section<D: Document>(document: &D, name: &str) -> Option<SectionMatch<D::Element>> {
    let normalized = normalize_section_name(name);
    if normalized.is_empty() {
        return None;
    }

    for id in candidate_ids(&normalized) {
        if let Some(element) = document.element_by_id(&id) {
            return Some(SectionMatch {
                element,
                matched_by: MatchedBy::Id(id),
            });
        }
    }

    document
        .headings()
        .into_iter()
        .find_map(|(element, text)| {
            let heading = normalize_section_name(&text);
            if heading.is_empty() {
                return None;
            }
            if heading.contains(&normalized) || normalized.contains(&heading) {
                Some(SectionMatch {
                    element,
                    matched_by: MatchedBy::Heading(text),
                })
            } else {
                None
            }
        })
}

/// Smooth-scrolls to the section `name` refers to. Returns false on a miss.
pub fn scroll_to_section<D: Document>(document: &mut D, name: &str) -> bool {
    match resolve_section(document, name) {
        Some(found) => {
            info!("Scrolling to section '{}' ({:?})", name, found.matched_by);
            document.scroll_into_view(&found.element, ScrollBehavior::Smooth);
            true
        }
        None => {
            debug!("No section matched '{}'", name);
            false
        }
    }
}
