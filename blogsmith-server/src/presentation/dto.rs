use serde::{Deserialize, Serialize};

use crate::application::blog_service::NewBlog;
use crate::domain::error::DomainError;
use crate::domain::listing::{
    BlogListQuery, Pagination, SortOrder, TemplateListQuery, normalize_search,
};

// ======================= BLOGS =======================

/// Missing fields are reported by the service as a validation failure.
#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub length: Option<i32>,
}

impl From<CreateBlogRequest> for NewBlog {
    fn from(req: CreateBlogRequest) -> Self {
        NewBlog {
            topic: req.topic.unwrap_or_default(),
            tone: req.tone.unwrap_or_default(),
            length: req.length.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListBlogsQuery {
    pub p: Option<u32>,
    pub n: Option<u32>,
    pub search: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

impl TryFrom<ListBlogsQuery> for BlogListQuery {
    type Error = DomainError;

    fn try_from(q: ListBlogsQuery) -> Result<Self, Self::Error> {
        Ok(BlogListQuery {
            pagination: Pagination::new(q.p, q.n),
            search: normalize_search(q.search),
            sort: q.sort_by.as_deref().unwrap_or_default().parse()?,
            order: SortOrder::parse(q.order.as_deref()),
        })
    }
}

// ======================= TEMPLATES =======================

#[derive(Debug, Default, Deserialize)]
pub struct ListTemplatesQuery {
    pub p: Option<u32>,
    pub n: Option<u32>,
    pub search: Option<String>,
}

impl From<ListTemplatesQuery> for TemplateListQuery {
    fn from(q: ListTemplatesQuery) -> Self {
        TemplateListQuery {
            pagination: Pagination::new(q.p, q.n),
            search: normalize_search(q.search),
        }
    }
}

// ======================= Envelopes =======================

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            message: None,
            data,
        }
    }

    pub fn with_message(message: &'static str, data: T) -> Self {
        Self {
            message: Some(message),
            data,
        }
    }
}
