mod home_settings_dto;
mod setting_dto;

pub use home_settings_dto::{check_value, keys, CustomLinkDto, HomeSettingsView};
pub use setting_dto::UpsertSettingDto;
