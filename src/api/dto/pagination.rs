//! Pagination query parameters.

use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::link_service::clamp_limit;

/// `?limit=&offset=` for list endpoints.
///
/// Uses `serde_with` to parse integers from query strings. Missing or
/// non-positive limits fall back to the default page size, large ones are
/// capped.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<i64>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ListParams {
    /// Limit actually applied by the service.
    pub fn effective_limit(&self) -> i64 {
        clamp_limit(self.limit)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = ListParams::default();
        assert_eq!(p.effective_limit(), 50);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_limit_is_capped() {
        let p = ListParams {
            limit: Some(1000),
            offset: Some(10),
        };
        assert_eq!(p.effective_limit(), 100);
        assert_eq!(p.offset(), 10);
    }

    #[test]
    fn test_non_positive_limit_uses_default() {
        let p = ListParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(p.effective_limit(), 50);
    }
}
