use std::collections::BTreeSet;

/// Transient, scroll-derived navigation state. Never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    pub current_page: String,
    pub visible_sections: BTreeSet<String>,
    pub active_section: Option<String>,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            current_page: "/".to_string(),
            visible_sections: BTreeSet::new(),
            active_section: None,
        }
    }
}

impl NavigationState {
    pub fn is_visible(&self, section_id: &str) -> bool {
        self.visible_sections.contains(section_id)
    }
}
