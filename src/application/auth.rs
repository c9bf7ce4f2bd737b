use crate::domain::models::{
    AuthResponse, Credential, LoginRequest, ProfilePatch, SignupDraft, UserProfile,
};
use crate::infrastructure::credential_store::CredentialStore;
use crate::infrastructure::error::ApiError;
use crate::infrastructure::gateway::{ApiGateway, HttpMethod};
use std::sync::Arc;

/// Authentication lifecycle: login/signup mint a credential pair, logout
/// and session expiry erase it. Client-side validation failures never
/// reach the network.
pub struct AuthService<S, G>
where
    S: CredentialStore,
    G: ApiGateway,
{
    credential_store: Arc<S>,
    gateway: Arc<G>,
}

impl<S, G> AuthService<S, G>
where
    S: CredentialStore,
    G: ApiGateway,
{
    pub fn new(credential_store: Arc<S>, gateway: Arc<G>) -> Self {
        Self {
            credential_store,
            gateway,
        }
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<Credential, ApiError> {
        request.validate().map_err(ApiError::Validation)?;

        let payload = self
            .gateway
            .send(
                HttpMethod::Post,
                "auth/login/",
                Some(encode_body(request)?),
            )
            .await?;
        self.store_auth_response(payload)
    }

    pub async fn register(&self, draft: &SignupDraft) -> Result<Credential, ApiError> {
        draft.validate().map_err(ApiError::Validation)?;

        // confirm_password is a client-side check only; never sent.
        let body = serde_json::json!({
            "first_name": draft.first_name,
            "last_name": draft.last_name,
            "email": draft.email,
            "password": draft.password,
        });
        let payload = self
            .gateway
            .send(HttpMethod::Post, "auth/register/", Some(body))
            .await?;
        self.store_auth_response(payload)
    }

    /// Erases the stored pair. Idempotent, no network call.
    pub fn logout(&self) -> Result<(), ApiError> {
        self.credential_store.clear()
    }

    pub fn credential(&self) -> Result<Option<Credential>, ApiError> {
        self.credential_store.get()
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        let payload = self.gateway.send(HttpMethod::Get, "users/me/", None).await?;
        let profile: UserProfile = decode(payload)?;
        self.refresh_stored_profile(&profile)?;
        Ok(profile)
    }

    pub async fn update_profile(&self, patch: &ProfilePatch) -> Result<UserProfile, ApiError> {
        let payload = self
            .gateway
            .send(HttpMethod::Patch, "users/me/", Some(encode_body(patch)?))
            .await?;
        let profile: UserProfile = decode(payload)?;
        self.refresh_stored_profile(&profile)?;
        Ok(profile)
    }

    pub async fn change_password(
        &self,
        current: &str,
        new: &str,
        confirm: &str,
    ) -> Result<(), ApiError> {
        if current.trim().is_empty() || new.trim().is_empty() {
            return Err(ApiError::Validation(
                "current and new password are required".to_string(),
            ));
        }
        if new != confirm {
            return Err(ApiError::Validation("new passwords do not match".to_string()));
        }

        let body = serde_json::json!({
            "current_password": current,
            "new_password": new,
        });
        self.gateway
            .send(HttpMethod::Post, "users/change-password/", Some(body))
            .await?;
        Ok(())
    }

    fn store_auth_response(&self, payload: serde_json::Value) -> Result<Credential, ApiError> {
        let response: AuthResponse = decode(payload)?;
        let credential = Credential {
            token: response.token,
            user: response.user,
        };
        self.credential_store.set(&credential)?;
        Ok(credential)
    }

    /// Keeps the stored pair coherent after a profile read or edit: same
    /// token, fresh profile, replaced in one step.
    fn refresh_stored_profile(&self, profile: &UserProfile) -> Result<(), ApiError> {
        if let Some(existing) = self.credential_store.get()? {
            self.credential_store.set(&Credential {
                token: existing.token,
                user: profile.clone(),
            })?;
        }
        Ok(())
    }
}

fn encode_body<B: serde::Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body)
        .map_err(|error| ApiError::Internal(format!("failed encoding request body: {error}")))
}

fn decode<T: serde::de::DeserializeOwned>(payload: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(payload)
        .map_err(|error| ApiError::Payload(format!("unexpected response shape: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::credential_store::InMemoryCredentialStore;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeGateway {
        responses: Mutex<VecDeque<Result<serde_json::Value, ApiError>>>,
        bodies: Mutex<Vec<Option<serde_json::Value>>>,
        call_count: AtomicUsize,
    }

    impl FakeGateway {
        fn with_responses(responses: Vec<Result<serde_json::Value, ApiError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                bodies: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ApiGateway for FakeGateway {
        async fn send(
            &self,
            _method: HttpMethod,
            _path: &str,
            body: Option<serde_json::Value>,
        ) -> Result<serde_json::Value, ApiError> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.bodies.lock().expect("bodies lock").push(body);
            self.responses
                .lock()
                .expect("responses lock")
                .pop_front()
                .unwrap_or(Ok(serde_json::Value::Null))
        }
    }

    fn profile_json(id: i64, first_name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "username": "ada",
            "email": "ada@example.com",
            "first_name": first_name,
            "last_name": "Lovelace",
        })
    }

    fn service(
        responses: Vec<Result<serde_json::Value, ApiError>>,
    ) -> (
        AuthService<InMemoryCredentialStore, FakeGateway>,
        Arc<InMemoryCredentialStore>,
        Arc<FakeGateway>,
    ) {
        let store = Arc::new(InMemoryCredentialStore::default());
        let gateway = Arc::new(FakeGateway::with_responses(responses));
        let service = AuthService::new(Arc::clone(&store), Arc::clone(&gateway));
        (service, store, gateway)
    }

    #[tokio::test]
    async fn login_stores_token_and_profile_as_a_pair() {
        let (service, store, _gateway) = service(vec![Ok(serde_json::json!({
            "token": "fresh-token",
            "user": profile_json(7, "Ada"),
        }))]);

        let credential = service
            .login(&LoginRequest {
                username: "ada".to_string(),
                password: "secret".to_string(),
            })
            .await
            .expect("login");

        assert_eq!(credential.token, "fresh-token");
        let stored = store.get().expect("get").expect("credential stored");
        assert_eq!(stored, credential);
    }

    #[tokio::test]
    async fn login_with_blank_password_issues_no_call() {
        let (service, store, gateway) = service(vec![]);

        let result = service
            .login(&LoginRequest {
                username: "ada".to_string(),
                password: "  ".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(gateway.call_count.load(Ordering::SeqCst), 0);
        assert!(store.get().expect("get").is_none());
    }

    #[tokio::test]
    async fn register_with_mismatched_passwords_issues_no_call() {
        let (service, _store, gateway) = service(vec![]);

        let result = service
            .register(&SignupDraft {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "one".to_string(),
                confirm_password: "two".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(gateway.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn register_never_sends_the_confirmation_field() {
        let (service, _store, gateway) = service(vec![Ok(serde_json::json!({
            "token": "signup-token",
            "user": profile_json(8, "Ada"),
        }))]);

        service
            .register(&SignupDraft {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                password: "secret".to_string(),
                confirm_password: "secret".to_string(),
            })
            .await
            .expect("register");

        let bodies = gateway.bodies.lock().expect("bodies lock");
        let sent = bodies[0].as_ref().expect("body sent");
        assert!(sent.get("confirm_password").is_none());
        assert_eq!(sent.get("password"), Some(&serde_json::json!("secret")));
    }

    #[tokio::test]
    async fn current_user_refreshes_profile_but_keeps_token() {
        let (service, store, _gateway) =
            service(vec![Ok(profile_json(7, "Augusta"))]);
        store
            .set(&Credential {
                token: "existing-token".to_string(),
                user: serde_json::from_value(profile_json(7, "Ada")).expect("profile"),
            })
            .expect("seed credential");

        let profile = service.current_user().await.expect("current user");
        assert_eq!(profile.first_name, "Augusta");

        let stored = store.get().expect("get").expect("credential stored");
        assert_eq!(stored.token, "existing-token");
        assert_eq!(stored.user.first_name, "Augusta");
    }

    #[tokio::test]
    async fn change_password_mismatch_is_local() {
        let (service, _store, gateway) = service(vec![]);

        let result = service.change_password("old", "new", "different").await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
        assert_eq!(gateway.call_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn change_password_posts_current_and_new() {
        let (service, _store, gateway) = service(vec![Ok(serde_json::Value::Null)]);

        service
            .change_password("old", "new", "new")
            .await
            .expect("change password");

        let bodies = gateway.bodies.lock().expect("bodies lock");
        assert_eq!(
            bodies[0],
            Some(serde_json::json!({
                "current_password": "old",
                "new_password": "new",
            }))
        );
    }

    #[tokio::test]
    async fn logout_clears_pair_and_is_idempotent() {
        let (service, store, gateway) = service(vec![]);
        store
            .set(&Credential {
                token: "tok".to_string(),
                user: serde_json::from_value(profile_json(7, "Ada")).expect("profile"),
            })
            .expect("seed credential");

        service.logout().expect("logout");
        service.logout().expect("logout again");

        assert!(store.get().expect("get").is_none());
        assert_eq!(gateway.call_count.load(Ordering::SeqCst), 0);
    }
}
