use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for tag colors: CSS hex notation, short or long form
    /// - Valid: "#fff", "#1E90FF"
    /// - Invalid: "fff", "#ffff", "#12345g", "blue"
    pub static ref COLOR_REGEX: Regex = Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();

    /// Regex for setting keys
    /// Must be lowercase snake_case
    /// - Valid: "home_title", "home_show_recommended"
    /// - Invalid: "Home", "home-title", "_home", "home__title"
    pub static ref SETTING_KEY_REGEX: Regex = Regex::new(r"^[a-z][a-z0-9]*(?:_[a-z0-9]+)*$").unwrap();
}
