use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    PublicUser,
}

impl Role {
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::PublicUser => "public user",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// User object returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

impl AuthUser {
    pub fn display_name(&self) -> String {
        self.user_metadata
            .name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "User".to_string())
    }

    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_else(|| "U".to_string())
    }
}

/// Row of `public_users` selected as `name, phone`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleName {
    pub role_name: Role,
}

/// Row of `user_roles` selected as `roles(role_name)`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRoleRow {
    pub roles: Option<RoleName>,
}
