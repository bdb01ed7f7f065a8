//! Typed HTTP client for the blogsmith REST API.

mod error;
mod http_client;
pub mod models;

pub use error::ClientError;
pub use http_client::BlogsmithClient;
pub use models::{
    Author, Blog, BlogDetail, BlogSummary, BlogUpdate, ListBlogsParams, ListTemplatesParams,
    NewTemplate, Page, PublishCustomization, Template, TemplateListItem, TemplateStyle,
    TemplateUpdate,
};
