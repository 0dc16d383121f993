//! Query-string translation for article listings.
//!
//! Raw `limit`/`offset` values arrive as untyped strings; anything that
//! does not parse, or parses out of range, silently falls back to the
//! defaults instead of erroring.
use serde::Deserialize;

pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = match limit.map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 1 => n.min(MAX_LIMIT),
            _ => DEFAULT_LIMIT,
        };

        let offset = match offset.map(str::parse::<i64>) {
            Some(Ok(n)) if n >= 0 => n,
            _ => 0,
        };

        Self { limit, offset }
    }
}

/// Filters combine with logical AND; the feed variant ignores all three.
#[derive(Debug, Default, Clone)]
pub struct ArticleFilter {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub tag: Option<String>,
    pub author: Option<String>,
    pub favorited: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> Page {
        Page::from_query(self.limit.as_deref(), self.offset.as_deref())
    }

    pub fn filter(&self) -> ArticleFilter {
        ArticleFilter {
            tag: self.tag.clone(),
            author: self.author.clone(),
            favorited: self.favorited.clone(),
        }
    }
}
