use crate::domain::models::{Activity, Task};
use crate::domain::stats::{DashboardStats, compute_stats};
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::ApiGateway;
use crate::infrastructure::repository::EntityRepository;
use chrono::{DateTime, TimeZone};
use std::sync::Arc;

/// Everything the dashboard needs, produced in one shot. Never built from
/// a partial fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSnapshot {
    pub tasks: Vec<Task>,
    pub activities: Vec<Activity>,
    pub stats: DashboardStats,
}

/// Loads tasks and the activity feed concurrently and derives the task
/// statistics from the fetched collection. Fail-fast: if either fetch
/// fails the whole load fails, so a view never renders half a dashboard.
pub struct DashboardService<G: ApiGateway> {
    tasks: Arc<EntityRepository<Task, G>>,
    activities: Arc<EntityRepository<Activity, G>>,
}

impl<G: ApiGateway> DashboardService<G> {
    pub fn new(
        tasks: Arc<EntityRepository<Task, G>>,
        activities: Arc<EntityRepository<Activity, G>>,
    ) -> Self {
        Self { tasks, activities }
    }

    pub async fn load<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
    ) -> Result<DashboardSnapshot, ApiError> {
        let (tasks, activities) = tokio::try_join!(self.tasks.list(), self.activities.list())?;

        Ok(DashboardSnapshot {
            stats: compute_stats(&tasks, now),
            tasks,
            activities,
        })
    }
}
