use anyhow::{Context, Result};
use tracing::debug;

use shared_config::AppConfig;

use crate::models::{RegisterRequest, RegistrationOutcome};
use crate::services::{OwnerService, VisitService};

/// Orchestrates the walk-in registration sequence:
/// resolve-or-create owner, create pet, mint case number, create visit.
///
/// The four writes are independent round trips with no transaction spanning
/// them. A failure after the owner/pet inserts leaves those rows behind as
/// valid standalone entities; the next lookup by mobile picks them up. The
/// error is surfaced to the caller and nothing is retried.
pub struct RegistrationService {
    owners: OwnerService,
    visits: VisitService,
}

impl RegistrationService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            owners: OwnerService::new(config),
            visits: VisitService::new(config),
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
        created_by: &str,
        auth_token: &str,
    ) -> Result<RegistrationOutcome> {
        let owner = match request.existing_owner_id {
            Some(owner_id) => self
                .owners
                .get_owner(&owner_id, auth_token)
                .await
                .context("resolving existing owner")?,
            None => match self
                .owners
                .lookup_by_mobile(&request.mobile, auth_token)
                .await?
            {
                Some(owner) => {
                    debug!("Returning owner {} matched by mobile", owner.id);
                    owner
                }
                None => self.owners.create_owner(&request, auth_token).await?,
            },
        };

        let pet = self
            .owners
            .create_pet(&owner.id, &request, auth_token)
            .await?;

        let case_number = self
            .visits
            .next_case_number(auth_token)
            .await
            .context("allocating case number")?;

        let visit = self
            .visits
            .create_visit(&pet.id, &case_number, created_by, auth_token)
            .await?;

        debug!("Registered visit {} (case {})", visit.id, case_number);

        Ok(RegistrationOutcome {
            owner,
            pet,
            visit,
            case_number,
        })
    }
}
