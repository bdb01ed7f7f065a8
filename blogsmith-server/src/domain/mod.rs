pub mod blog;
pub mod error;
pub mod listing;
pub mod system_templates;
pub mod template;
