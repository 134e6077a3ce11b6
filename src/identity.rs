//! Identity mapping - resolves an external auth identity to a backend user id
//!
//! The cache is owned by a [`UserDirectory`] that lives for one signed-in
//! session; call [`UserDirectory::clear`] on sign-out.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::error::{ApiError, ApiResult};
use crate::models::{CreateUserRequest, User, UserPreferences};
use crate::network::ApiClient;

/// The parts of an auth-provider user the backend cares about
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExternalUser {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub first_name: Option<String>,
}

impl ExternalUser {
    pub fn new(id: impl Into<String>) -> Self {
        ExternalUser {
            id: id.into(),
            ..ExternalUser::default()
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = Some(name.into());
        self
    }

    fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .or(self.first_name.as_deref())
            .filter(|n| !n.trim().is_empty())
            .unwrap_or("User")
            .to_string()
    }

    fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// Session-scoped external-id -> backend-id map
pub struct UserDirectory {
    client: ApiClient,
    cache: Mutex<HashMap<String, String>>,
}

impl UserDirectory {
    pub fn new(client: ApiClient) -> Self {
        UserDirectory {
            client,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve (or create) the backend user for `user`.
    ///
    /// Order: cache, lookup by external id, lookup by email, create. The cache
    /// lock is held for the whole resolution so concurrent callers share one
    /// round trip.
    pub async fn backend_user_id(
        &self,
        user: &ExternalUser,
        token: Option<&str>,
    ) -> ApiResult<String> {
        if user.id.trim().is_empty() {
            return Err(ApiError::InvalidRequest("external user has no id".into()));
        }

        let mut cache = self.cache.lock().await;
        if let Some(id) = cache.get(&user.id) {
            tracing::debug!(external_id = %user.id, backend_id = %id, "User id served from cache");
            return Ok(id.clone());
        }

        let backend_id = self.resolve(user, token).await?;
        tracing::info!(external_id = %user.id, backend_id = %backend_id, "Resolved backend user");
        cache.insert(user.id.clone(), backend_id.clone());
        Ok(backend_id)
    }

    async fn resolve(&self, user: &ExternalUser, token: Option<&str>) -> ApiResult<String> {
        if let Some(found) = self.client.user_by_clerk_id(&user.id, token).await? {
            return Ok(found.id);
        }

        if let Some(found) = self.find_by_email(user, token).await? {
            return Ok(found.id);
        }

        match self.create(user, token).await {
            Ok(created) => Ok(created.id),
            Err(create_err) => {
                // Another session may have created the user in the meantime.
                tracing::warn!(external_id = %user.id, error = %create_err, "User creation failed, retrying email lookup");
                match self.find_by_email(user, token).await? {
                    Some(found) => Ok(found.id),
                    None => Err(create_err),
                }
            }
        }
    }

    async fn find_by_email(&self, user: &ExternalUser, token: Option<&str>) -> ApiResult<Option<User>> {
        match user.email() {
            Some(email) => self.client.user_by_email(email, token).await,
            None => Ok(None),
        }
    }

    async fn create(&self, user: &ExternalUser, token: Option<&str>) -> ApiResult<User> {
        let request = CreateUserRequest {
            email: user.email().unwrap_or_default().to_string(),
            name: user.display_name(),
            clerk_user_id: user.id.clone(),
        };
        let created = self.client.create_user(&request, token).await?;

        if let Err(e) = self
            .client
            .update_user_preferences(&created.id, &UserPreferences::default(), token)
            .await
        {
            tracing::warn!(backend_id = %created.id, error = %e, "User created but default preferences were not saved");
        }

        Ok(created)
    }

    /// Cached backend id for `external_id`, if resolved this session
    pub async fn cached(&self, external_id: &str) -> Option<String> {
        self.cache.lock().await.get(external_id).cloned()
    }

    /// Forget every mapping; call on sign-out.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
    }
}
