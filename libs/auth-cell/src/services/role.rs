use anyhow::Result;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::role::AppRole;

pub struct RoleService {
    supabase: SupabaseClient,
}

impl RoleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Resolves a user to their staff role via the `user_roles` table.
    /// Most recent assignment wins when duplicates exist; no row means no
    /// role, which callers treat as most-restrictive.
    pub async fn resolve_role(&self, user_id: &str, auth_token: &str) -> Result<Option<AppRole>> {
        debug!("Resolving role for user: {}", user_id);

        let path = format!(
            "/rest/v1/user_roles?user_id=eq.{}&select=role&order=created_at.desc&limit=1",
            urlencoding::encode(user_id)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let role = rows
            .first()
            .and_then(|row| row["role"].as_str())
            .and_then(|r| r.parse::<AppRole>().ok());

        Ok(role)
    }

    /// Server-side role confirmation through the `has_role` remote procedure.
    pub async fn check_role(&self, user_id: &str, role: AppRole, auth_token: &str) -> Result<bool> {
        debug!("Checking role {} for user: {}", role, user_id);

        let granted: bool = self
            .supabase
            .rpc(
                "has_role",
                Some(auth_token),
                Some(json!({
                    "_user_id": user_id,
                    "_role": role.as_str(),
                })),
            )
            .await?;

        Ok(granted)
    }
}
