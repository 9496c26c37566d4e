pub mod matcher;
pub mod page;
pub mod scroll;

pub use matcher::{ normalize_section_name, resolve_section, scroll_to_section, Document };
pub use page::PageDocument;
pub use scroll::{ InViewTrigger, ScrollSpy };
