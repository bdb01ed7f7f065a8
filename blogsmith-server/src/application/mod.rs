pub mod blog_service;
pub mod template_service;
