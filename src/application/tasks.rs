use crate::domain::models::{Task, TaskDraft, TaskPatch};
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::{ApiGateway, HttpMethod};
use crate::infrastructure::repository::EntityRepository;
use std::sync::Arc;

/// Task collection plus the server-side state transitions (`assign`,
/// `complete`) that return an updated task to fold back into the cache.
pub struct TaskService<G: ApiGateway> {
    repository: Arc<EntityRepository<Task, G>>,
}

impl<G: ApiGateway> TaskService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            repository: Arc::new(EntityRepository::new(gateway)),
        }
    }

    pub fn repository(&self) -> &Arc<EntityRepository<Task, G>> {
        &self.repository
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        self.repository.list().await
    }

    pub fn snapshot(&self) -> Result<Vec<Task>, ApiError> {
        self.repository.snapshot()
    }

    pub async fn create(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.repository.create(draft).await
    }

    pub async fn update(&self, id: i64, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.repository.update(id, patch).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.repository.remove(id).await
    }

    pub async fn assign(&self, id: i64, user_id: i64) -> Result<Task, ApiError> {
        self.guard_cached(id)?;

        let payload = self
            .repository
            .gateway()
            .send(
                HttpMethod::Post,
                &format!("tasks/{id}/assign/"),
                Some(serde_json::json!({ "user_id": user_id })),
            )
            .await?;
        self.absorb_task(payload)
    }

    pub async fn complete(&self, id: i64) -> Result<Task, ApiError> {
        self.guard_cached(id)?;

        let payload = self
            .repository
            .gateway()
            .send(HttpMethod::Post, &format!("tasks/{id}/complete/"), None)
            .await?;
        self.absorb_task(payload)
    }

    fn guard_cached(&self, id: i64) -> Result<(), ApiError> {
        if self.repository.find(id)?.is_some() {
            Ok(())
        } else {
            Err(ApiError::NotFound(format!("no cached entry {id} in tasks")))
        }
    }

    fn absorb_task(&self, payload: serde_json::Value) -> Result<Task, ApiError> {
        let task: Task = serde_json::from_value(payload)
            .map_err(|error| ApiError::Payload(format!("unexpected task payload: {error}")))?;
        self.repository.absorb(task.clone())?;
        Ok(task)
    }
}
