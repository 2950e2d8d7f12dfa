use anyhow::Result;
use reqwest::Method;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::SessionResponse;

pub struct SessionService {
    supabase: SupabaseClient,
}

impl SessionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Password-grant sign-in against the auth backend. Credentials are never
    /// inspected or stored here; the backend's verdict is passed through.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<SessionResponse> {
        debug!("Signing in: {}", email);

        let session: SessionResponse = self
            .supabase
            .request(
                Method::POST,
                "/auth/v1/token?grant_type=password",
                None,
                Some(json!({
                    "email": email,
                    "password": password,
                })),
            )
            .await?;

        Ok(session)
    }

    /// The auth backend's view of the user behind a token.
    pub async fn current_user(&self, auth_token: &str) -> Result<serde_json::Value> {
        self.supabase.get_user_profile(auth_token).await
    }
}
