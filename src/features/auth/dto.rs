use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub sub: String,
    pub roles: Vec<String>,
    pub is_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            is_admin: user.is_admin(),
            sub: user.sub,
            roles: user.roles,
        }
    }
}
