use crate::models::navigation::NavigationState;
use super::page::PageDocument;

/// Derives [`NavigationState`] from a page's scroll position. A section is
/// visible when any part of it overlaps the viewport; the active section is
/// the one crossing the activation line.
#[derive(Debug, Clone, Copy)]
pub struct ScrollSpy {
    /// Fraction of the viewport height, from the top, where the activation line sits.
    pub activation_ratio: f64,
}

impl Default for ScrollSpy {
    fn default() -> Self {
        Self { activation_ratio: 1.0 / 3.0 }
    }
}

impl ScrollSpy {
    pub fn observe(&self, document: &PageDocument) -> NavigationState {
        let view_top = document.scroll_y();
        let view_bottom = view_top + document.viewport_height();
        let line = view_top + document.viewport_height() * self.activation_ratio;

        let mut state = NavigationState {
            current_page: document.page().to_string(),
            ..NavigationState::default()
        };
        let mut first_visible = None;

        for section in document.sections() {
            let Some(id) = section.id.as_ref() else {
                continue;
            };
            let top = section.top;
            let bottom = section.top + section.height;
            if bottom <= view_top || top >= view_bottom {
                continue;
            }
            state.visible_sections.insert(id.clone());
            if first_visible.is_none() {
                first_visible = Some(id.clone());
            }
            if state.active_section.is_none() && top <= line && line < bottom {
                state.active_section = Some(id.clone());
            }
        }

        if state.active_section.is_none() {
            state.active_section = first_visible;
        }
        state
    }
}

/// Share of a section currently inside the viewport, in [0, 1].
pub fn visible_ratio(document: &PageDocument, section_index: usize) -> f64 {
    let Some(section) = document.section(section_index) else {
        return 0.0;
    };
    if section.height <= 0.0 {
        return 0.0;
    }
    let view_top = document.scroll_y();
    let view_bottom = view_top + document.viewport_height();
    let overlap = (section.top + section.height).min(view_bottom) - section.top.max(view_top);
    (overlap / section.height).clamp(0.0, 1.0)
}

/// "Animate when in view" trigger. With `once`, the flag latches after the
/// first time the threshold is reached, so entrance animations run once.
#[derive(Debug, Clone)]
pub struct InViewTrigger {
    threshold: f64,
    once: bool,
    in_view: bool,
}

impl InViewTrigger {
    pub fn new(threshold: f64, once: bool) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            once,
            in_view: false,
        }
    }

    pub fn in_view(&self) -> bool {
        self.in_view
    }

    pub fn update(&mut self, ratio: f64) -> bool {
        if self.once && self.in_view {
            return true;
        }
        self.in_view = ratio > 0.0 && ratio >= self.threshold;
        self.in_view
    }
}

impl Default for InViewTrigger {
    fn default() -> Self {
        Self::new(0.1, true)
    }
}
