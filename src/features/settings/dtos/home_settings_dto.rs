use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::error::{AppError, Result};
use crate::features::settings::models::Setting;

/// Setting keys read by the home settings view
pub mod keys {
    pub const HOME_TITLE: &str = "home_title";
    pub const HOME_SUBTITLE: &str = "home_subtitle";
    pub const HOME_FOOTER_TEXT: &str = "home_footer_text";
    pub const HOME_SHOW_RECOMMENDED: &str = "home_show_recommended";
    /// JSON array of category ids
    pub const HOME_SIDEBAR_CATEGORIES: &str = "home_sidebar_categories";
    /// JSON array of `{ "name": .., "url": .. }`
    pub const HOME_CUSTOM_LINKS: &str = "home_custom_links";

    pub const ALL: [&str; 6] = [
        HOME_TITLE,
        HOME_SUBTITLE,
        HOME_FOOTER_TEXT,
        HOME_SHOW_RECOMMENDED,
        HOME_SIDEBAR_CATEGORIES,
        HOME_CUSTOM_LINKS,
    ];
}

pub const DEFAULT_TITLE: &str = "Website Directory";
pub const DEFAULT_SUBTITLE: &str = "A curated collection of useful websites";
pub const DEFAULT_FOOTER_TEXT: &str = "Curated by hand. Suggestions welcome.";

/// Extra link shown on the home page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomLinkDto {
    pub name: String,
    pub url: String,
}

/// Typed home page settings with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HomeSettingsView {
    pub title: String,
    pub subtitle: String,
    pub footer_text: String,
    pub show_recommended: bool,
    pub sidebar_categories: Vec<i64>,
    pub custom_links: Vec<CustomLinkDto>,
}

/// Value of the first row stored under `key`; a blank value counts as absent
fn lookup<'a>(settings: &'a [Setting], key: &str) -> Option<&'a str> {
    settings
        .iter()
        .find(|s| s.key == key)
        .map(|s| s.value.as_str())
        .filter(|v| !v.trim().is_empty())
}

fn text_or(settings: &[Setting], key: &str, default: &str) -> String {
    lookup(settings, key).unwrap_or(default).to_string()
}

fn parse_list<T: DeserializeOwned>(key: &str, raw: Option<&str>) -> Result<Vec<T>> {
    match raw {
        None => Ok(Vec::new()),
        Some(raw) => serde_json::from_str(raw).map_err(|e| AppError::MalformedSetting {
            key: key.to_string(),
            reason: e.to_string(),
        }),
    }
}

/// Check that `value` is acceptable for `key` before it is stored
pub fn check_value(key: &str, value: &str) -> Result<()> {
    let raw = Some(value).filter(|v| !v.trim().is_empty());
    let checked = match key {
        keys::HOME_SIDEBAR_CATEGORIES => parse_list::<i64>(key, raw).map(|_| ()),
        keys::HOME_CUSTOM_LINKS => parse_list::<CustomLinkDto>(key, raw).map(|_| ()),
        _ => Ok(()),
    };

    checked.map_err(|e| match e {
        AppError::MalformedSetting { key, reason } => {
            AppError::Validation(format!("Setting '{}' must be a JSON list: {}", key, reason))
        }
        other => other,
    })
}

impl HomeSettingsView {
    /// Build the view from stored rows.
    ///
    /// When a key appears more than once the first row wins. A list-valued
    /// key that does not parse fails the whole view with `MalformedSetting`.
    pub fn assemble(settings: &[Setting]) -> Result<Self> {
        Ok(Self {
            title: text_or(settings, keys::HOME_TITLE, DEFAULT_TITLE),
            subtitle: text_or(settings, keys::HOME_SUBTITLE, DEFAULT_SUBTITLE),
            footer_text: text_or(settings, keys::HOME_FOOTER_TEXT, DEFAULT_FOOTER_TEXT),
            show_recommended: lookup(settings, keys::HOME_SHOW_RECOMMENDED) == Some("true"),
            sidebar_categories: parse_list(
                keys::HOME_SIDEBAR_CATEGORIES,
                lookup(settings, keys::HOME_SIDEBAR_CATEGORIES),
            )?,
            custom_links: parse_list(
                keys::HOME_CUSTOM_LINKS,
                lookup(settings, keys::HOME_CUSTOM_LINKS),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn setting(key: &str, value: &str) -> Setting {
        Setting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_defaults_when_nothing_stored() {
        let view = HomeSettingsView::assemble(&[]).unwrap();

        assert_eq!(view.title, DEFAULT_TITLE);
        assert_eq!(view.subtitle, DEFAULT_SUBTITLE);
        assert_eq!(view.footer_text, DEFAULT_FOOTER_TEXT);
        assert!(!view.show_recommended);
        assert!(view.sidebar_categories.is_empty());
        assert!(view.custom_links.is_empty());
    }

    #[test]
    fn test_show_recommended_only_for_literal_true() {
        let on = HomeSettingsView::assemble(&[setting("home_show_recommended", "true")]).unwrap();
        assert!(on.show_recommended);

        let yes = HomeSettingsView::assemble(&[setting("home_show_recommended", "yes")]).unwrap();
        assert!(!yes.show_recommended);

        let upper = HomeSettingsView::assemble(&[setting("home_show_recommended", "TRUE")]).unwrap();
        assert!(!upper.show_recommended);
    }

    #[test]
    fn test_empty_string_uses_default() {
        let view = HomeSettingsView::assemble(&[
            setting("home_title", ""),
            setting("home_sidebar_categories", "  "),
        ])
        .unwrap();

        assert_eq!(view.title, DEFAULT_TITLE);
        assert!(view.sidebar_categories.is_empty());
    }

    #[test]
    fn test_stored_values_are_parsed() {
        let view = HomeSettingsView::assemble(&[
            setting("home_title", "My Links"),
            setting("home_sidebar_categories", "[3, 1, 2]"),
            setting(
                "home_custom_links",
                r#"[{"name": "Blog", "url": "https://blog.example.com"}]"#,
            ),
            setting("unrelated", "ignored"),
        ])
        .unwrap();

        assert_eq!(view.title, "My Links");
        assert_eq!(view.sidebar_categories, vec![3, 1, 2]);
        assert_eq!(
            view.custom_links,
            vec![CustomLinkDto {
                name: "Blog".to_string(),
                url: "https://blog.example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_malformed_list_names_the_key() {
        let result = HomeSettingsView::assemble(&[
            setting("home_title", "Fine"),
            setting("home_sidebar_categories", "not json"),
        ]);

        match result {
            Err(AppError::MalformedSetting { key, .. }) => {
                assert_eq!(key, "home_sidebar_categories")
            }
            other => panic!("expected MalformedSetting, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_custom_links() {
        let result =
            HomeSettingsView::assemble(&[setting("home_custom_links", r#"[{"name": "x"}]"#)]);
        assert!(matches!(
            result,
            Err(AppError::MalformedSetting { ref key, .. }) if key == "home_custom_links"
        ));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let view = HomeSettingsView::assemble(&[
            setting("home_title", "First"),
            setting("home_title", "Second"),
        ])
        .unwrap();

        assert_eq!(view.title, "First");
    }

    #[test]
    fn test_check_value() {
        assert!(check_value("home_sidebar_categories", "[1,2]").is_ok());
        assert!(check_value("home_sidebar_categories", "").is_ok());
        assert!(matches!(
            check_value("home_sidebar_categories", "1,2"),
            Err(AppError::Validation(_))
        ));
        assert!(check_value("home_title", "anything at all").is_ok());
    }
}
