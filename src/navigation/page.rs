use crate::config::page::{ PageLayout, SectionLayout };
use super::matcher::{ Document, ScrollBehavior };

/// In-memory stand-in for the rendered landing page.
#[derive(Debug, Clone)]
pub struct PageDocument {
    page: String,
    viewport_height: f64,
    scroll_y: f64,
    sections: Vec<SectionLayout>,
    last_scroll: Option<(usize, ScrollBehavior)>,
}

impl PageDocument {
    pub fn from_layout(layout: PageLayout) -> Self {
        Self {
            page: layout.page,
            viewport_height: layout.viewport_height,
            scroll_y: 0.0,
            sections: layout.sections,
            last_scroll: None,
        }
    }

    pub fn page(&self) -> &str {
        &self.page
    }

    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn sections(&self) -> &[SectionLayout] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&SectionLayout> {
        self.sections.get(index)
    }

    fn max_scroll(&self) -> f64 {
        let bottom = self.sections
            .iter()
            .map(|s| s.top + s.height)
            .fold(0.0, f64::max);
        (bottom - self.viewport_height).max(0.0)
    }

    /// Sets the scroll offset, clamped to the scrollable range.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y.clamp(0.0, self.max_scroll());
    }

    /// The section most recently brought into view, with how it was scrolled.
    pub fn last_scrolled(&self) -> Option<(&SectionLayout, ScrollBehavior)> {
        self.last_scroll.and_then(|(index, behavior)| {
            self.sections.get(index).map(|s| (s, behavior))
        })
    }
}

impl Document for PageDocument {
    type Element = usize;

    fn element_by_id(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id.as_deref() == Some(id))
    }

    fn headings(&self) -> Vec<(usize, String)> {
        self.sections
            .iter()
            .enumerate()
            .filter_map(|(index, s)| s.heading.clone().map(|h| (index, h)))
            .collect()
    }

    fn scroll_into_view(&mut self, element: &usize, behavior: ScrollBehavior) {
        if let Some(top) = self.sections.get(*element).map(|s| s.top) {
            self.scroll_to(top);
            self.last_scroll = Some((*element, behavior));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::page::default_layout;
    use crate::navigation::matcher::{ resolve_section, scroll_to_section, MatchedBy };

    fn layout(sections: Vec<SectionLayout>) -> PageLayout {
        PageLayout {
            page: "/".into(),
            viewport_height: 600.0,
            sections,
        }
    }

    fn section(id: Option<&str>, heading: Option<&str>, top: f64) -> SectionLayout {
        SectionLayout {
            id: id.map(String::from),
            heading: heading.map(String::from),
            top,
            height: 500.0,
        }
    }

    #[test]
    fn contacto_scrolls_to_contact_section() {
        let mut doc = PageDocument::from_layout(default_layout());

        assert!(scroll_to_section(&mut doc, "contacto"));

        let (section, behavior) = doc.last_scrolled().unwrap();
        assert_eq!(section.id.as_deref(), Some("contact-section"));
        assert_eq!(behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn unknown_section_returns_false_and_does_not_scroll() {
        let mut doc = PageDocument::from_layout(default_layout());

        assert!(!scroll_to_section(&mut doc, "carrito de compras"));
        assert!(doc.last_scrolled().is_none());
        assert_eq!(doc.scroll_y(), 0.0);
    }

    #[test]
    fn empty_name_never_matches() {
        let mut doc = PageDocument::from_layout(default_layout());
        assert!(!scroll_to_section(&mut doc, "   "));
    }

    #[test]
    fn id_match_beats_earlier_heading_match() {
        let doc = PageDocument::from_layout(
            layout(vec![section(None, Some("Blog"), 0.0), section(Some("blog-section"), None, 500.0)])
        );

        let found = resolve_section(&doc, "Blog").unwrap();
        assert_eq!(found.element, 1);
        assert_eq!(found.matched_by, MatchedBy::Id("blog-section".into()));
    }

    #[test]
    fn falls_back_to_first_matching_heading() {
        let mut doc = PageDocument::from_layout(
            layout(vec![
                section(Some("a"), Some("Casos de Éxito"), 0.0),
                section(Some("b"), Some("Más casos de éxito"), 500.0)
            ])
        );

        let found = resolve_section(&doc, "casos de exito").unwrap();
        assert_eq!(found.element, 0);
        assert!(matches!(found.matched_by, MatchedBy::Heading(_)));
        assert!(scroll_to_section(&mut doc, "casos de exito"));
    }

    #[test]
    fn headings_without_text_are_skipped() {
        let doc = PageDocument::from_layout(
            layout(vec![section(None, Some("  "), 0.0), section(None, Some("Equipo"), 500.0)])
        );
        let found = resolve_section(&doc, "nuestro equipo").unwrap();
        assert_eq!(found.element, 1);
    }

    #[test]
    fn scroll_is_clamped_to_page_bottom() {
        let mut doc = PageDocument::from_layout(
            layout(vec![section(Some("a"), None, 0.0), section(Some("b"), None, 500.0)])
        );
        doc.scroll_to(10_000.0);
        assert_eq!(doc.scroll_y(), 400.0);
        doc.scroll_to(-5.0);
        assert_eq!(doc.scroll_y(), 0.0);
    }
}
