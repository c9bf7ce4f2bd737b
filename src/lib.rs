pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::auth::AuthService;
pub use application::bootstrap::AppContext;
pub use application::comments::CommentService;
pub use application::dashboard::{DashboardService, DashboardSnapshot};
pub use application::guard::{FailureDisposition, classify_failure};
pub use application::notifications::NotificationService;
pub use application::organizations::OrganizationService;
pub use application::tasks::TaskService;
pub use domain::models::{
    Activity, ActivityActor, AuthResponse, Comment, CommentDraft, CommentPatch, Credential,
    LoginRequest, Notification, Organization, OrganizationDraft, OrganizationPatch,
    OrganizationRole, ProfilePatch, SignupDraft, Task, TaskDraft, TaskPatch, TaskPriority,
    TaskStatus, UserProfile,
};
pub use domain::stats::{DashboardStats, compute_stats};
pub use infrastructure::credential_store::{
    CredentialStore, InMemoryCredentialStore, KeyringCredentialStore,
};
pub use infrastructure::error::ApiError;
pub use infrastructure::gateway::{ApiGateway, HttpGateway, HttpMethod};
pub use infrastructure::repository::{EntityRepository, Resource};
