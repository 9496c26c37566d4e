pub mod chat;
pub mod navigation;
pub mod preferences;
