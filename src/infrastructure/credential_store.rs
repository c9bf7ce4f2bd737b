use crate::domain::models::Credential;
use crate::infrastructure::error::ApiError;
use std::sync::Mutex;

/// Holds the current session token and user profile. The pair is replaced
/// and cleared atomically; token contents are opaque to the client.
pub trait CredentialStore: Send + Sync {
    fn set(&self, credential: &Credential) -> Result<(), ApiError>;
    fn get(&self) -> Result<Option<Credential>, ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Persists the credential pair in the platform keyring so a session
/// survives an application restart. One entry holds the serialized pair,
/// so token and profile can never go out of step.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service_name: String,
    account_name: String,
}

impl KeyringCredentialStore {
    pub fn new(service_name: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            account_name: account_name.into(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry, ApiError> {
        keyring::Entry::new(&self.service_name, &self.account_name)
            .map_err(|error| ApiError::Credential(error.to_string()))
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new("taskmate.session", "default")
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn set(&self, credential: &Credential) -> Result<(), ApiError> {
        let payload = serde_json::to_string(credential)
            .map_err(|error| ApiError::Credential(error.to_string()))?;
        self.entry()?
            .set_password(&payload)
            .map_err(|error| ApiError::Credential(error.to_string()))
    }

    fn get(&self) -> Result<Option<Credential>, ApiError> {
        let payload = match self.entry()?.get_password() {
            Ok(value) => value,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(error) => return Err(ApiError::Credential(error.to_string())),
        };

        let credential = serde_json::from_str::<Credential>(&payload)
            .map_err(|error| ApiError::Credential(error.to_string()))?;
        Ok(Some(credential))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match self.entry()?.delete_credential() {
            Ok(_) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(ApiError::Credential(error.to_string())),
        }
    }
}

#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credential: Mutex<Option<Credential>>,
}

impl CredentialStore for InMemoryCredentialStore {
    fn set(&self, credential: &Credential) -> Result<(), ApiError> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|error| ApiError::Credential(format!("in-memory lock poisoned: {error}")))?;
        *guard = Some(credential.clone());
        Ok(())
    }

    fn get(&self) -> Result<Option<Credential>, ApiError> {
        let guard = self
            .credential
            .lock()
            .map_err(|error| ApiError::Credential(format!("in-memory lock poisoned: {error}")))?;
        Ok(guard.clone())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut guard = self
            .credential
            .lock()
            .map_err(|error| ApiError::Credential(format!("in-memory lock poisoned: {error}")))?;
        *guard = None;
        Ok(())
    }
}
