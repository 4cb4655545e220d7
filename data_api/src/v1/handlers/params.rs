use crate::v1::error::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::model::DateRange;

pub const MAX_PAGE_SIZE: usize = 100;

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    25
}

/// Query parameters shared by every report endpoint. Policy overrides
/// (`threshold`, `min_run_length`, `min_altitude_delta`, `top_n`,
/// `score`) are only read by the endpoints they apply to.
#[derive(Debug, Deserialize)]
pub struct ReportParams {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    pub threshold: Option<f64>,
    pub min_run_length: Option<usize>,
    pub min_altitude_delta: Option<i32>,
    pub top_n: Option<usize>,
    pub score: Option<analytics::RouteScore>,
}

impl ReportParams {
    /// Bounds-check paging and the date window. Engine policy values are
    /// validated by the engine itself so the two layers cannot drift.
    pub fn validate(&self) -> Result<DateRange, ApiError> {
        if self.page < 1 {
            return Err(ApiError::InvalidParams("page must be at least 1".into()));
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Err(ApiError::InvalidParams(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if to < from {
                return Err(ApiError::InvalidParams(
                    "date_to must not be before date_from".into(),
                ));
            }
        }
        Ok(DateRange {
            from: self.date_from,
            to: self.date_to,
        })
    }
}

/// Paging metadata echoed on every report response.
#[derive(Debug, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice one page out of a fully computed report. Reports are small
/// (bounded by country/airline cardinality), so computing then slicing
/// keeps the engine pure.
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> (Vec<T>, PageInfo) {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size);
    // Saturate so an absurd page number yields an empty page instead of
    // an arithmetic overflow.
    let offset = page.saturating_sub(1).saturating_mul(page_size);
    let page_items = items.into_iter().skip(offset).take(page_size).collect();
    (
        page_items,
        PageInfo {
            page,
            page_size,
            total_items,
            total_pages,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: usize, page_size: usize) -> ReportParams {
        ReportParams {
            date_from: None,
            date_to: None,
            page,
            page_size,
            threshold: None,
            min_run_length: None,
            min_altitude_delta: None,
            top_n: None,
            score: None,
        }
    }

    #[test]
    fn rejects_out_of_range_paging() {
        assert!(params(0, 25).validate().is_err());
        assert!(params(1, 0).validate().is_err());
        assert!(params(1, 101).validate().is_err());
        assert!(params(1, 100).validate().is_ok());
    }

    #[test]
    fn rejects_inverted_date_window() {
        let mut p = params(1, 25);
        p.date_from = NaiveDate::from_ymd_opt(2024, 2, 1);
        p.date_to = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(p.validate().is_err());
    }

    #[test]
    fn paginates_with_remainder_page() {
        let (items, info) = paginate((0..7).collect::<Vec<_>>(), 2, 3);
        assert_eq!(items, vec![3, 4, 5]);
        assert_eq!(info.total_items, 7);
        assert_eq!(info.total_pages, 3);

        let (items, info) = paginate(Vec::<i32>::new(), 1, 25);
        assert!(items.is_empty());
        assert_eq!(info.total_pages, 0);
    }

    #[test]
    fn huge_page_numbers_yield_empty_pages() {
        let (items, info) = paginate((0..7).collect::<Vec<_>>(), usize::MAX, 100);
        assert!(items.is_empty());
        assert_eq!(info.total_items, 7);

        let (items, _) = paginate((0..7).collect::<Vec<_>>(), usize::MAX, usize::MAX);
        assert!(items.is_empty());
    }
}
