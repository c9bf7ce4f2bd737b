use crate::domain::models::Notification;
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::{ApiGateway, HttpMethod};
use crate::infrastructure::repository::EntityRepository;
use std::sync::Arc;

/// Notification feed. Mark-as-read actions flip the cached flag after the
/// server acknowledges, so the local mirror stays in step without a
/// refetch.
pub struct NotificationService<G: ApiGateway> {
    repository: Arc<EntityRepository<Notification, G>>,
}

impl<G: ApiGateway> NotificationService<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            repository: Arc::new(EntityRepository::new(gateway)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Notification>, ApiError> {
        self.repository.list().await
    }

    pub fn snapshot(&self) -> Result<Vec<Notification>, ApiError> {
        self.repository.snapshot()
    }

    pub fn unread_count(&self) -> Result<usize, ApiError> {
        Ok(self
            .repository
            .snapshot()?
            .iter()
            .filter(|notification| !notification.read)
            .count())
    }

    pub async fn mark_read(&self, id: i64) -> Result<(), ApiError> {
        let mut notification = self
            .repository
            .find(id)?
            .ok_or_else(|| ApiError::NotFound(format!("no cached entry {id} in notifications")))?;

        self.repository
            .gateway()
            .send(HttpMethod::Post, &format!("notifications/{id}/mark_read/"), None)
            .await?;

        notification.read = true;
        self.repository.absorb(notification)
    }

    pub async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.repository
            .gateway()
            .send(HttpMethod::Post, "notifications/mark_all_read/", None)
            .await?;

        for mut notification in self.repository.snapshot()? {
            notification.read = true;
            self.repository.absorb(notification)?;
        }
        Ok(())
    }
}
