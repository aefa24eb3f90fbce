use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::tags::models::Tag;
use crate::features::websites::models::WebsiteTag;
use crate::shared::constants::TAG_NAME_MAX_LEN;
use crate::shared::validation::COLOR_REGEX;

/// Ordering of the tag list view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrder {
    /// Name ascending, used by the public listing
    NameAsc,
    /// Newest first, used by the admin listing
    CreatedDesc,
}

/// Tag with the number of websites carrying it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TagWithCountDto {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub website_count: i64,
}

impl TagWithCountDto {
    pub fn with_count(tag: Tag, website_count: i64) -> Self {
        Self {
            id: tag.id,
            name: tag.name,
            color: tag.color,
            description: tag.description,
            created_at: tag.created_at,
            website_count,
        }
    }

    /// Attach usage counts from the join rows and sort in `order`
    pub fn assemble(tags: Vec<Tag>, links: &[WebsiteTag], order: TagOrder) -> Vec<Self> {
        let mut counts: HashMap<i64, i64> = HashMap::new();
        for link in links {
            *counts.entry(link.tag_id).or_default() += 1;
        }

        let mut out: Vec<Self> = tags
            .into_iter()
            .map(|tag| {
                let count = counts.get(&tag.id).copied().unwrap_or(0);
                Self::with_count(tag, count)
            })
            .collect();

        match order {
            TagOrder::NameAsc => out.sort_by(|a, b| {
                a.name
                    .to_lowercase()
                    .cmp(&b.name.to_lowercase())
                    .then_with(|| a.name.cmp(&b.name))
            }),
            TagOrder::CreatedDesc => out.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| b.id.cmp(&a.id))
            }),
        }

        out
    }
}

/// Trim a tag name and reject empty or over-long results
pub fn normalize_tag_name(raw: &str) -> Result<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Tag name is required".to_string()));
    }
    if name.chars().count() as u64 > TAG_NAME_MAX_LEN {
        return Err(AppError::Validation(format!(
            "Tag name must be at most {} characters",
            TAG_NAME_MAX_LEN
        )));
    }
    Ok(name.to_string())
}

/// Request DTO for creating a tag
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateTagDto {
    pub name: String,
    #[validate(regex(path = *COLOR_REGEX, message = "Color must be a hex color like #1E90FF"))]
    pub color: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

/// Request DTO for updating a tag (full replacement)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateTagDto {
    pub name: String,
    #[validate(regex(path = *COLOR_REGEX, message = "Color must be a hex color like #1E90FF"))]
    pub color: Option<String>,
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn tag(id: i64, name: &str, minutes: i64) -> Tag {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes);
        Tag {
            id,
            name: name.to_string(),
            color: None,
            description: None,
            created_at,
            updated_at: created_at,
        }
    }

    fn link(website_id: i64, tag_id: i64) -> WebsiteTag {
        WebsiteTag { website_id, tag_id }
    }

    #[test]
    fn test_assemble_counts_links() {
        let tags = vec![tag(1, "rust", 0), tag(2, "design", 1), tag(3, "unused", 2)];
        let links = vec![link(10, 1), link(11, 1), link(10, 2), link(12, 99)];

        let view = TagWithCountDto::assemble(tags, &links, TagOrder::NameAsc);
        let counts: Vec<(&str, i64)> = view
            .iter()
            .map(|t| (t.name.as_str(), t.website_count))
            .collect();

        assert_eq!(counts, vec![("design", 1), ("rust", 2), ("unused", 0)]);
    }

    #[test]
    fn test_assemble_name_order_ignores_case() {
        let tags = vec![tag(1, "beta", 0), tag(2, "Alpha", 1), tag(3, "gamma", 2)];

        let view = TagWithCountDto::assemble(tags, &[], TagOrder::NameAsc);
        let names: Vec<&str> = view.iter().map(|t| t.name.as_str()).collect();

        assert_eq!(names, vec!["Alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_assemble_created_order_newest_first() {
        let tags = vec![tag(1, "old", 0), tag(2, "new", 30), tag(3, "middle", 10)];

        let view = TagWithCountDto::assemble(tags, &[], TagOrder::CreatedDesc);
        let ids: Vec<i64> = view.iter().map(|t| t.id).collect();

        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_orderings_cover_same_tags() {
        let tags = vec![tag(1, "b", 5), tag(2, "a", 0)];
        let links = vec![link(1, 2)];

        let mut by_name = TagWithCountDto::assemble(tags.clone(), &links, TagOrder::NameAsc);
        let mut by_created = TagWithCountDto::assemble(tags, &links, TagOrder::CreatedDesc);
        by_name.sort_by_key(|t| t.id);
        by_created.sort_by_key(|t| t.id);

        assert_eq!(by_name, by_created);
    }

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("  rust ").unwrap(), "rust");
        assert!(matches!(
            normalize_tag_name("   "),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(normalize_tag_name(""), Err(AppError::Validation(_))));
        assert!(normalize_tag_name(&"x".repeat(51)).is_err());
        assert!(normalize_tag_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_create_tag_dto_color_validation() {
        let valid = CreateTagDto {
            name: "rust".to_string(),
            color: Some("#ff6600".to_string()),
            description: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateTagDto {
            color: Some("orange".to_string()),
            ..valid
        };
        assert!(invalid.validate().is_err());
    }
}
