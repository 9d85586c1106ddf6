//! Page requests and paginated results

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const DEFAULT_PER_PAGE: usize = 10;
pub const MAX_PER_PAGE: usize = 100;

/// Raw list query: `?search=&page=&per_page=`
///
/// Numbers are kept as strings so malformed input becomes a validation
/// error inside the JSON envelope rather than an extractor rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub page: Option<String>,
    pub per_page: Option<String>,
}

impl ListQuery {
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn page_request(&self) -> AppResult<PageRequest> {
        PageRequest::parse(self.page.as_deref(), self.per_page.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageRequest {
    /// Validate `page >= 1` and `per_page` in `1..=100`; blank means default
    pub fn parse(page: Option<&str>, per_page: Option<&str>) -> AppResult<Self> {
        let page = match non_blank(page) {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(p) if p >= 1 => p as usize,
                _ => {
                    return Err(AppError::Validation(
                        "page must be an integer greater than or equal to 1".to_string(),
                    ))
                }
            },
        };

        let per_page = match non_blank(per_page) {
            None => DEFAULT_PER_PAGE,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if (1..=MAX_PER_PAGE as i64).contains(&n) => n as usize,
                _ => {
                    return Err(AppError::Validation(format!(
                        "per_page must be an integer between 1 and {}",
                        MAX_PER_PAGE
                    )))
                }
            },
        };

        Ok(Self { page, per_page })
    }

    /// Slice `items`, clamping an out-of-range page to the last one
    pub fn paginate<T>(self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let total_pages = total.div_ceil(self.per_page);
        let page = if total_pages > 0 && self.page > total_pages {
            total_pages
        } else {
            self.page
        };

        let start = (page - 1).saturating_mul(self.per_page);
        let items: Vec<T> = items.into_iter().skip(start).take(self.per_page).collect();

        Page {
            items,
            pagination: Pagination {
                page,
                per_page: self.per_page,
                total,
                total_pages,
                has_prev: page > 1 && total_pages > 0,
                has_next: page < total_pages,
            },
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

/// One page of results
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}
