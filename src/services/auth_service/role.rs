use serde::Serialize;
use uuid::Uuid;

use crate::models::database::{AuthUser, Role, UserRoleRow};
use crate::supabase::SupabaseClient;

/// Looks up the user's role. Lookup failures are logged and yield `None`.
pub async fn resolve_role(client: &SupabaseClient, user_id: Uuid, access_token: &str) -> Option<Role> {
    let row = client
        .from("user_roles")
        .select("roles(role_name)")
        .eq("user_id", user_id)
        .token(Some(access_token))
        .fetch_single::<UserRoleRow>()
        .await;
    match row {
        Ok(row) => row.roles.map(|r| r.role_name),
        Err(e) => {
            log::error!("error fetching role for {}: {}", user_id, e);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
}

/// Navigation bar state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub signed_in: bool,
    pub user_name: Option<String>,
    pub initial: Option<String>,
    pub role: Option<Role>,
    pub role_label: Option<&'static str>,
    pub links: Vec<NavLink>,
}

impl SessionSummary {
    pub fn anonymous() -> Self {
        SessionSummary {
            signed_in: false,
            user_name: None,
            initial: None,
            role: None,
            role_label: None,
            links: vec![
                NavLink { label: "Login", href: "/login" },
                NavLink { label: "Get Started", href: "/register" },
            ],
        }
    }

    pub fn for_user(user: &AuthUser, role: Option<Role>) -> Self {
        let home = match role {
            Some(Role::Admin) => NavLink { label: "Dashboard", href: "/admin/dashboard" },
            _ => NavLink { label: "My Appointments", href: "/my-appointments" },
        };
        SessionSummary {
            signed_in: true,
            user_name: Some(user.display_name()),
            initial: Some(user.initial()),
            role,
            role_label: role.map(|r| r.label()),
            links: vec![home, NavLink { label: "Logout", href: "/auth/logout" }],
        }
    }
}

/// Where a freshly signed-in user lands.
pub fn landing_page(role: Option<Role>) -> &'static str {
    match role {
        Some(Role::Admin) => "/admin/dashboard",
        _ => "/",
    }
}
