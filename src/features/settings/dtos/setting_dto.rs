use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::shared::validation::SETTING_KEY_REGEX;

/// Request DTO for writing one setting
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertSettingDto {
    #[validate(
        length(min = 1, max = 100, message = "Key must be 1-100 characters"),
        regex(path = *SETTING_KEY_REGEX, message = "Key must be lowercase snake_case")
    )]
    pub key: String,
    #[validate(length(max = 10000, message = "Value must be at most 10000 characters"))]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_setting_key_format() {
        let ok = UpsertSettingDto {
            key: "home_title".to_string(),
            value: "Links".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = UpsertSettingDto {
            key: "Home-Title".to_string(),
            ..ok
        };
        assert!(bad.validate().is_err());
    }
}
