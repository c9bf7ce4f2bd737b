use crate::domain::models::{Comment, CommentDraft, CommentPatch};
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::ApiGateway;
use crate::infrastructure::repository::EntityRepository;
use std::sync::Arc;

/// Comment thread for a single task, fetched through the shared comments
/// collection with a `task` query filter.
pub struct CommentService<G: ApiGateway> {
    repository: Arc<EntityRepository<Comment, G>>,
}

impl<G: ApiGateway> CommentService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            repository: Arc::new(EntityRepository::new(gateway)),
        }
    }

    pub async fn thread(&self, task_id: i64) -> Result<Vec<Comment>, ApiError> {
        self.repository
            .list_filtered(&[("task", task_id.to_string())])
            .await
    }

    pub fn snapshot(&self) -> Result<Vec<Comment>, ApiError> {
        self.repository.snapshot()
    }

    pub async fn add(&self, draft: &CommentDraft) -> Result<Comment, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;
        self.repository.create(draft).await
    }

    pub async fn edit(&self, id: i64, patch: &CommentPatch) -> Result<Comment, ApiError> {
        self.repository.update(id, patch).await
    }

    pub async fn remove(&self, id: i64) -> Result<(), ApiError> {
        self.repository.remove(id).await
    }
}
