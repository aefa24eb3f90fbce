/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - can manage categories, tags, websites and settings
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// FIELD LIMITS
// =============================================================================

/// Maximum length of a tag name
pub const TAG_NAME_MAX_LEN: u64 = 50;
