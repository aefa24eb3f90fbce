use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::categories::models::Category;
use crate::features::websites::models::Website;

/// Category summary embedded in website views
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryRefDto {
    pub id: i64,
    pub name: String,
}

/// Website entry of the recommended view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendedWebsiteDto {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub display_order: i32,
    /// None when the website points at a category that no longer exists
    pub category: Option<CategoryRefDto>,
}

/// Recommended websites with their count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendedWebsitesView {
    pub websites: Vec<RecommendedWebsiteDto>,
    pub count: usize,
}

impl RecommendedWebsitesView {
    /// Keep recommended websites, order them by `display_order` and attach
    /// each one's category id and name.
    ///
    /// The sort is stable, so websites sharing a position keep input order.
    pub fn assemble(websites: Vec<Website>, categories: &[Category]) -> Self {
        let names: HashMap<i64, &str> = categories
            .iter()
            .map(|c| (c.id, c.name.as_str()))
            .collect();

        let mut picked: Vec<Website> = websites.into_iter().filter(|w| w.is_recommended).collect();
        picked.sort_by_key(|w| w.display_order);

        let websites: Vec<RecommendedWebsiteDto> = picked
            .into_iter()
            .map(|w| RecommendedWebsiteDto {
                category: names.get(&w.category_id).map(|name| CategoryRefDto {
                    id: w.category_id,
                    name: (*name).to_string(),
                }),
                id: w.id,
                name: w.name,
                url: w.url,
                description: w.description,
                display_order: w.display_order,
            })
            .collect();

        Self {
            count: websites.len(),
            websites,
        }
    }
}

/// Response DTO for website
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebsiteResponseDto {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub description: String,
    pub category_id: i64,
    pub display_order: i32,
    pub is_recommended: bool,
    pub tag_ids: Vec<i64>,
}

impl WebsiteResponseDto {
    pub fn new(website: Website, tag_ids: Vec<i64>) -> Self {
        Self {
            id: website.id,
            name: website.name,
            url: website.url,
            description: website.description,
            category_id: website.category_id,
            display_order: website.display_order,
            is_recommended: website.is_recommended,
            tag_ids,
        }
    }
}

/// Request DTO for creating a website
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateWebsiteDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(url(message = "Invalid URL"))]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub category_id: i64,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

/// Request DTO for updating a website (full replacement, tag set included)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateWebsiteDto {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    #[validate(url(message = "Invalid URL"))]
    pub url: String,
    #[serde(default)]
    #[validate(length(max = 2000))]
    pub description: String,
    pub category_id: i64,
    #[serde(default)]
    pub display_order: i32,
    #[serde(default)]
    pub is_recommended: bool,
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn website(id: i64, is_recommended: bool, display_order: i32, category_id: i64) -> Website {
        let now = Utc::now();
        Website {
            id,
            name: format!("site-{}", id),
            url: format!("https://site-{}.example.com", id),
            description: String::new(),
            category_id,
            display_order,
            is_recommended,
            created_at: now,
            updated_at: now,
        }
    }

    fn category(id: i64, name: &str) -> Category {
        let now = Utc::now();
        Category {
            id,
            parent_id: None,
            name: name.to_string(),
            display_order: 0,
            icon_url: None,
            icon: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_recommended_filters_and_orders() {
        let websites = vec![
            website(5, true, 1, 1),
            website(2, true, 0, 1),
            website(9, false, 0, 1),
        ];

        let view = RecommendedWebsitesView::assemble(websites, &[category(1, "Tools")]);
        let ids: Vec<i64> = view.websites.iter().map(|w| w.id).collect();

        assert_eq!(ids, vec![2, 5]);
        assert_eq!(view.count, 2);
    }

    #[test]
    fn test_recommended_embeds_category_summary_only() {
        let view = RecommendedWebsitesView::assemble(
            vec![website(1, true, 0, 7)],
            &[category(7, "News"), category(8, "Other")],
        );

        assert_eq!(
            view.websites[0].category,
            Some(CategoryRefDto {
                id: 7,
                name: "News".to_string()
            })
        );
        let json = serde_json::to_value(&view.websites[0]).unwrap();
        assert_eq!(
            json["category"],
            serde_json::json!({ "id": 7, "name": "News" })
        );
    }

    #[test]
    fn test_recommended_missing_category() {
        let view = RecommendedWebsitesView::assemble(vec![website(1, true, 0, 42)], &[]);
        assert_eq!(view.count, 1);
        assert!(view.websites[0].category.is_none());
    }

    #[test]
    fn test_recommended_ties_keep_input_order() {
        let websites = vec![
            website(3, true, 0, 1),
            website(1, true, 0, 1),
            website(2, true, 0, 1),
        ];

        let view = RecommendedWebsitesView::assemble(websites, &[]);
        let ids: Vec<i64> = view.websites.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_recommended_empty() {
        let view = RecommendedWebsitesView::assemble(vec![website(1, false, 0, 1)], &[]);
        assert!(view.websites.is_empty());
        assert_eq!(view.count, 0);
    }

    #[test]
    fn test_create_website_dto_validation() {
        let dto: CreateWebsiteDto = serde_json::from_value(serde_json::json!({
            "name": "Rust",
            "url": "https://www.rust-lang.org",
            "category_id": 1
        }))
        .unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.tag_ids.is_empty());
        assert!(!dto.is_recommended);

        let bad = CreateWebsiteDto {
            url: "not a url".to_string(),
            ..dto
        };
        assert!(bad.validate().is_err());
    }
}
