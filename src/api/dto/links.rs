//! DTOs for link endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::Link;

/// Body of `POST /api/links`.
///
/// An omitted or empty `alias` gets a generated one. Length and charset
/// rules live in the link service so URL errors are reported first.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    #[validate(length(min = 1, message = "URL is required"))]
    pub url: String,

    #[serde(default)]
    pub alias: Option<String>,
}

/// A link as seen by its owner or an admin.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub alias: String,
    pub short_url: String,
    pub original_url: String,
    pub owner_id: i64,
    pub click_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkResponse {
    pub fn from_link(link: Link, short_url: String) -> Self {
        Self {
            alias: link.alias,
            short_url,
            original_url: link.original_url,
            owner_id: link.owner_id,
            click_count: link.click_count,
            created_at: link.created_at,
            updated_at: link.updated_at,
        }
    }
}

/// One page of links.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub items: Vec<LinkResponse>,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_alias_is_optional() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();

        assert!(req.alias.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_create_request_requires_url() {
        let req: CreateLinkRequest =
            serde_json::from_str(r#"{"url": "", "alias": "sale"}"#).unwrap();

        assert!(req.validate().is_err());
    }

    #[test]
    fn test_link_response_serialization() {
        let now = Utc::now();
        let link = Link::new(
            1,
            "sale".into(),
            "https://shop.example.com".into(),
            7,
            3,
            now,
            now,
        );

        let json =
            serde_json::to_value(LinkResponse::from_link(link, "https://s.io/sale".into()))
                .unwrap();

        assert_eq!(json["alias"], "sale");
        assert_eq!(json["short_url"], "https://s.io/sale");
        assert_eq!(json["click_count"], 3);
        assert_eq!(json["owner_id"], 7);
    }
}
