use crate::domain::models::{Organization, OrganizationDraft, OrganizationPatch};
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::{ApiGateway, HttpMethod};
use crate::infrastructure::repository::EntityRepository;
use std::sync::Arc;

/// Organization collection. Administrative actions (edit, delete, invite)
/// are gated locally on the caller's role in the cached organization,
/// mirroring the server's permission model without a round trip.
pub struct OrganizationService<G: ApiGateway> {
    repository: Arc<EntityRepository<Organization, G>>,
}

impl<G: ApiGateway> OrganizationService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            repository: Arc::new(EntityRepository::new(gateway)),
        }
    }

    pub fn repository(&self) -> &Arc<EntityRepository<Organization, G>> {
        &self.repository
    }

    pub async fn list(&self) -> Result<Vec<Organization>, ApiError> {
        self.repository.list().await
    }

    pub fn snapshot(&self) -> Result<Vec<Organization>, ApiError> {
        self.repository.snapshot()
    }

    pub async fn create(&self, draft: &OrganizationDraft) -> Result<Organization, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.repository.create(draft).await
    }

    pub async fn update(
        &self,
        id: i64,
        patch: &OrganizationPatch,
    ) -> Result<Organization, ApiError> {
        self.guard_administer(id)?;
        self.repository.update(id, patch).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.guard_administer(id)?;
        self.repository.remove(id).await
    }

    /// Invites a member by email. Membership changes are reflected on the
    /// next `list`; the cache is not touched here.
    pub async fn invite(&self, id: i64, email: &str) -> Result<(), ApiError> {
        if email.trim().is_empty() {
            return Err(ApiError::Validation("invite email must not be empty".to_string()));
        }
        self.guard_administer(id)?;

        self.repository
            .gateway()
            .send(
                HttpMethod::Post,
                &format!("organizations/{id}/invite/"),
                Some(serde_json::json!({ "email": email })),
            )
            .await?;
        Ok(())
    }

    fn guard_administer(&self, id: i64) -> Result<(), ApiError> {
        let organization = self
            .repository
            .find(id)?
            .ok_or_else(|| ApiError::NotFound(format!("no cached entry {id} in organizations")))?;

        if organization.user_role.can_administer() {
            Ok(())
        } else {
            Err(ApiError::Validation(format!(
                "administering '{}' requires the owner or admin role",
                organization.name
            )))
        }
    }
}
