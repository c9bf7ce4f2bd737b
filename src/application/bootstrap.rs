use crate::application::auth::AuthService;
use crate::application::comments::CommentService;
use crate::application::dashboard::DashboardService;
use crate::application::notifications::NotificationService;
use crate::application::organizations::OrganizationService;
use crate::application::tasks::TaskService;
use crate::domain::models::Activity;
use crate::infrastructure::config::{AppConfig, ensure_default_config, load_config};
use crate::infrastructure::credential_store::KeyringCredentialStore;
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::HttpGateway;
use crate::infrastructure::repository::EntityRepository;
use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type Gateway = HttpGateway<KeyringCredentialStore>;

/// Fully wired object graph for one running client. Construction creates
/// the workspace layout (`config/`, `logs/`), materializes default
/// configuration and connects every service to one shared gateway and
/// credential store.
pub struct AppContext {
    config: AppConfig,
    logs_dir: PathBuf,
    log_guard: Mutex<()>,
    pub auth: AuthService<KeyringCredentialStore, Gateway>,
    pub tasks: TaskService<Gateway>,
    pub organizations: OrganizationService<Gateway>,
    pub comments: CommentService<Gateway>,
    pub notifications: NotificationService<Gateway>,
    pub dashboard: DashboardService<Gateway>,
}

impl AppContext {
    pub fn new(workspace_root: &Path) -> Result<Self, ApiError> {
        let config_dir = workspace_root.join("config");
        let logs_dir = workspace_root.join("logs");
        fs::create_dir_all(&config_dir).map_err(|error| ApiError::Internal(error.to_string()))?;
        fs::create_dir_all(&logs_dir).map_err(|error| ApiError::Internal(error.to_string()))?;

        ensure_default_config(&config_dir)?;
        let config = load_config(&config_dir)?;

        let credential_store = Arc::new(KeyringCredentialStore::new(
            config.credential_service.clone(),
            "default",
        ));
        let gateway = Arc::new(HttpGateway::new(
            &config.api_base_url,
            Arc::clone(&credential_store),
        )?);

        let tasks = TaskService::new(Arc::clone(&gateway));
        let activities: Arc<EntityRepository<Activity, Gateway>> =
            Arc::new(EntityRepository::new(Arc::clone(&gateway)));
        let dashboard = DashboardService::new(Arc::clone(tasks.repository()), activities);

        Ok(Self {
            auth: AuthService::new(credential_store, Arc::clone(&gateway)),
            organizations: OrganizationService::new(Arc::clone(&gateway)),
            comments: CommentService::new(Arc::clone(&gateway)),
            notifications: NotificationService::new(Arc::clone(&gateway)),
            tasks,
            dashboard,
            config,
            logs_dir,
            log_guard: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Logs a failed operation and hands back the user-displayable
    /// message.
    pub fn operation_error(&self, operation: &str, error: &ApiError) -> String {
        self.log_error(operation, &error.to_string());
        error.to_string()
    }

    pub fn log_info(&self, operation: &str, message: &str) {
        self.append_log("info", operation, message);
    }

    pub fn log_error(&self, operation: &str, message: &str) {
        self.append_log("error", operation, message);
    }

    fn append_log(&self, level: &str, operation: &str, message: &str) {
        let Ok(_guard) = self.log_guard.lock() else {
            return;
        };
        let path = self.logs_dir.join("client.log");
        let payload = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "level": level,
            "operation": operation,
            "message": message,
        });

        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{payload}");
        }
    }
}
