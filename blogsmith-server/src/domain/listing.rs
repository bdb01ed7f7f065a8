use std::str::FromStr;

use serde::Serialize;

use crate::domain::error::DomainError;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: i64,
}

/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Only `desc` sorts descending; anything else is ascending.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlogSortField {
    #[default]
    CreatedAt,
    UpdatedAt,
    PublishedAt,
    Topic,
    Tone,
    Length,
}

impl BlogSortField {
    pub fn column(&self) -> &'static str {
        match self {
            BlogSortField::CreatedAt => "created_at",
            BlogSortField::UpdatedAt => "updated_at",
            BlogSortField::PublishedAt => "published_at",
            BlogSortField::Topic => "topic",
            BlogSortField::Tone => "tone",
            BlogSortField::Length => "length",
        }
    }
}

impl FromStr for BlogSortField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "createdAt" => Ok(BlogSortField::CreatedAt),
            "updatedAt" => Ok(BlogSortField::UpdatedAt),
            "publishedAt" => Ok(BlogSortField::PublishedAt),
            "topic" => Ok(BlogSortField::Topic),
            "tone" => Ok(BlogSortField::Tone),
            "length" => Ok(BlogSortField::Length),
            other => Err(DomainError::Validation(format!(
                "unsupported sort field: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BlogListQuery {
    pub pagination: Pagination,
    /// Case-insensitive substring of `topic`.
    pub search: Option<String>,
    pub sort: BlogSortField,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default)]
pub struct TemplateListQuery {
    pub pagination: Pagination,
    /// Case-insensitive substring of `name`.
    pub search: Option<String>,
}

pub fn normalize_search(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}
