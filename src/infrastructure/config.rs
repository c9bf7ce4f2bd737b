use crate::infrastructure::error::ApiError;
use std::fs;
use std::path::Path;

const APP_JSON: &str = "app.json";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api/";
const DEFAULT_CREDENTIAL_SERVICE: &str = "taskmate.session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub credential_service: String,
}

fn default_app_config() -> serde_json::Value {
    serde_json::json!({
        "schema": 1,
        "appName": "TaskMate",
        "apiBaseUrl": DEFAULT_API_BASE_URL,
        "credentialService": DEFAULT_CREDENTIAL_SERVICE,
    })
}

pub fn ensure_default_config(config_dir: &Path) -> Result<(), ApiError> {
    let path = config_dir.join(APP_JSON);
    if !path.exists() {
        let formatted = serde_json::to_string_pretty(&default_app_config())
            .map_err(|error| ApiError::Internal(error.to_string()))?;
        fs::write(path, format!("{formatted}\n"))
            .map_err(|error| ApiError::Internal(error.to_string()))?;
    }
    Ok(())
}

pub fn load_config(config_dir: &Path) -> Result<AppConfig, ApiError> {
    let path = config_dir.join(APP_JSON);
    let raw = fs::read_to_string(&path)
        .map_err(|error| ApiError::Internal(format!("failed reading {}: {error}", path.display())))?;
    let parsed: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|error| ApiError::Internal(format!("invalid json in {}: {error}", path.display())))?;

    let schema = parsed
        .get("schema")
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| ApiError::Internal(format!("missing schema in {}", path.display())))?;
    if schema != 1 {
        return Err(ApiError::Internal(format!(
            "unsupported schema {} in {}",
            schema,
            path.display()
        )));
    }

    Ok(AppConfig {
        api_base_url: read_string(&parsed, "apiBaseUrl", DEFAULT_API_BASE_URL),
        credential_service: read_string(&parsed, "credentialService", DEFAULT_CREDENTIAL_SERVICE),
    })
}

fn read_string(value: &serde_json::Value, key: &str, fallback: &str) -> String {
    value
        .get(key)
        .and_then(serde_json::Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(fallback)
        .to_string()
}
