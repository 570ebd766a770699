use serde::Deserialize;

use crate::config::PaginationConfig;
use crate::error::ApiError;

/// Raw `page`/`limit` query values; parsed by [`PageQuery::resolve`]
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

impl PageQuery {
    /// Page defaults to 1, limit to the configured default, clamped to the configured max
    pub fn resolve(&self, config: &PaginationConfig) -> Result<Page, ApiError> {
        let page = positive("page", self.page.as_deref())?.unwrap_or(1);
        let limit = positive("limit", self.limit.as_deref())?
            .unwrap_or(config.default_limit)
            .min(config.max_limit);
        Ok(Page { page, limit })
    }
}

fn positive(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(n) if n >= 1 => Ok(Some(n)),
        _ => Err(ApiError::bad_request(format!("'{}' must be a positive integer, got '{}'", name, raw))),
    }
}
