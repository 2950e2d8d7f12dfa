use anyhow::{anyhow, Result};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Owner, Pet, RegisterRequest};

pub struct OwnerService {
    supabase: SupabaseClient,
}

impl OwnerService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Exact-match dedup lookup by mobile. Mobile is the de-facto unique key;
    /// when duplicates exist anyway, the most recently created row wins.
    pub async fn lookup_by_mobile(&self, mobile: &str, auth_token: &str) -> Result<Option<Owner>> {
        debug!("Looking up owner by mobile: {}", mobile);

        let path = format!(
            "/rest/v1/owners?mobile=eq.{}&order=created_at.desc&limit=1",
            urlencoding::encode(mobile)
        );
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        match rows.into_iter().next() {
            Some(row) => Ok(Some(serde_json::from_value(row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_owner(&self, owner_id: &Uuid, auth_token: &str) -> Result<Owner> {
        let path = format!("/rest/v1/owners?id=eq.{}", owner_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Owner not found"))?;
        Ok(serde_json::from_value(row)?)
    }

    pub async fn pets_for_owner(&self, owner_id: &Uuid, auth_token: &str) -> Result<Vec<Pet>> {
        let path = format!("/rest/v1/pets?owner_id=eq.{}", owner_id);
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        let pets = rows
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(pets)
    }

    pub async fn create_owner(&self, request: &RegisterRequest, auth_token: &str) -> Result<Owner> {
        debug!("Creating owner: {}", request.owner_name);

        let owner_data = json!({
            "name": request.owner_name,
            "mobile": request.mobile,
            "alternate_mobile": request.alternate_mobile,
            "address": request.address,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/owners",
                Some(auth_token),
                Some(owner_data),
                Some(headers),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create owner"))?;
        let owner: Owner = serde_json::from_value(row)?;
        debug!("Owner created with ID: {}", owner.id);

        Ok(owner)
    }

    pub async fn create_pet(
        &self,
        owner_id: &Uuid,
        request: &RegisterRequest,
        auth_token: &str,
    ) -> Result<Pet> {
        debug!("Creating pet {} for owner {}", request.pet_name, owner_id);

        let pet_data = json!({
            "owner_id": owner_id,
            "name": request.pet_name,
            "animal_type": request.animal_type,
            "breed": request.breed,
            "age": request.age,
            "sex": request.sex,
            "weight": request.weight,
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            "Prefer",
            reqwest::header::HeaderValue::from_static("return=representation"),
        );

        let rows: Vec<Value> = self
            .supabase
            .request_with_headers(
                Method::POST,
                "/rest/v1/pets",
                Some(auth_token),
                Some(pet_data),
                Some(headers),
            )
            .await?;

        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Failed to create pet"))?;
        Ok(serde_json::from_value(row)?)
    }
}
