use anyhow::{anyhow, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key).unwrap());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
            );
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, auth_token, body, None)
            .await
    }

    /// Same as `request`, with extra headers merged in. Write paths that need
    /// the inserted/updated row back pass `Prefer: return=representation`.
    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let mut headers = self.get_headers(auth_token);
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Deletes never ask PostgREST for a body back.
    pub async fn delete(&self, path: &str, auth_token: Option<&str>) -> Result<()> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Deleting {}", url);

        let response = self
            .client
            .request(Method::DELETE, &url)
            .headers(self.get_headers(auth_token))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);
            return Err(anyhow!("API error ({}): {}", status, error_text));
        }

        Ok(())
    }

    /// Calls a PostgREST remote procedure and deserializes its scalar or
    /// row-set result.
    pub async fn rpc<T>(&self, function: &str, auth_token: Option<&str>, args: Option<Value>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/rpc/{}", function);
        self.request(
            Method::POST,
            &path,
            auth_token,
            Some(args.unwrap_or_else(|| json!({}))),
        )
        .await
    }

    /// Row count without fetching rows: HEAD with `Prefer: count=exact`,
    /// total parsed from the `Content-Range` trailer ("0-24/57" or "*/57").
    pub async fn count(&self, path: &str, auth_token: Option<&str>) -> Result<u64> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Counting {}", url);

        let mut headers = self.get_headers(auth_token);
        headers.insert("Prefer", HeaderValue::from_static("count=exact"));

        let response = self
            .client
            .request(Method::HEAD, &url)
            .headers(headers)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("Count request failed ({}) for {}", status, url);
            return Err(anyhow!("API error ({}) counting {}", status, path));
        }

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| anyhow!("Missing Content-Range header counting {}", path))?;

        let total = content_range
            .rsplit('/')
            .next()
            .and_then(|t| t.parse::<u64>().ok())
            .ok_or_else(|| anyhow!("Unparseable Content-Range '{}' counting {}", content_range, path))?;

        Ok(total)
    }

    pub async fn get_user_profile(&self, auth_token: &str) -> Result<Value> {
        // Supabase Auth API returns the user behind the token
        self.request::<Value>(Method::GET, "/auth/v1/user", Some(auth_token), None)
            .await
    }
}
