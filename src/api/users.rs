use crate::error::ApiResult;
use crate::models::{CreateUserRequest, User, UserPreferences};
use crate::network::{encode_path_segment, ApiClient, RequestOptions};

/// NotFound means "no such user"; every other failure is real.
fn absent_on_not_found<T>(result: ApiResult<T>) -> ApiResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

impl ApiClient {
    /// `GET /users/clerk/{clerkId}`
    pub async fn user_by_clerk_id(
        &self,
        clerk_id: &str,
        token: Option<&str>,
    ) -> ApiResult<Option<User>> {
        let endpoint = format!("/users/clerk/{}", encode_path_segment(clerk_id)?);
        absent_on_not_found(self.request(&endpoint, RequestOptions::get(), token).await)
    }

    /// `GET /users/email/{email}`
    pub async fn user_by_email(&self, email: &str, token: Option<&str>) -> ApiResult<Option<User>> {
        let endpoint = format!("/users/email/{}", encode_path_segment(email)?);
        absent_on_not_found(self.request(&endpoint, RequestOptions::get(), token).await)
    }

    /// `POST /users`
    pub async fn create_user(
        &self,
        request: &CreateUserRequest,
        token: Option<&str>,
    ) -> ApiResult<User> {
        let options = RequestOptions::post().json(request)?;
        self.request("/users", options, token).await
    }

    /// `GET /users/{id}/preferences`; NotFound or an empty body yields `None`,
    /// every other failure propagates. Use this before writing preferences back.
    pub async fn try_user_preferences(
        &self,
        user_id: &str,
        token: Option<&str>,
    ) -> ApiResult<Option<UserPreferences>> {
        let endpoint = format!("/users/{}/preferences", encode_path_segment(user_id)?);
        let prefs = absent_on_not_found(
            self.request::<Option<UserPreferences>>(&endpoint, RequestOptions::get(), token)
                .await,
        )?;
        Ok(prefs.flatten())
    }

    /// Like [`ApiClient::try_user_preferences`] but any failure yields `None`.
    /// For display only.
    pub async fn user_preferences(
        &self,
        user_id: &str,
        token: Option<&str>,
    ) -> Option<UserPreferences> {
        match self.try_user_preferences(user_id, token).await {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Could not load user preferences");
                None
            }
        }
    }

    /// `PUT /users/{id}/preferences`
    pub async fn update_user_preferences(
        &self,
        user_id: &str,
        preferences: &UserPreferences,
        token: Option<&str>,
    ) -> ApiResult<UserPreferences> {
        let endpoint = format!("/users/{}/preferences", encode_path_segment(user_id)?);
        let options = RequestOptions::put().json(preferences)?;
        let saved: Option<UserPreferences> = self.request(&endpoint, options, token).await?;
        Ok(saved.unwrap_or_else(|| preferences.clone()))
    }

    /// Read-modify-write of a user's preferences. Nothing is written unless
    /// the current preferences were read (or are absent).
    pub async fn edit_user_preferences<F>(
        &self,
        user_id: &str,
        edit: F,
        token: Option<&str>,
    ) -> ApiResult<UserPreferences>
    where
        F: FnOnce(&mut UserPreferences),
    {
        let mut prefs = self
            .try_user_preferences(user_id, token)
            .await?
            .unwrap_or_default();
        edit(&mut prefs);
        self.update_user_preferences(user_id, &prefs, token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;

    #[test]
    fn test_absent_on_not_found() {
        assert_eq!(absent_on_not_found(Ok(1)).unwrap(), Some(1));
        assert_eq!(absent_on_not_found::<u8>(Err(ApiError::NotFound)).unwrap(), None);
        assert!(matches!(
            absent_on_not_found::<u8>(Err(ApiError::Forbidden)),
            Err(ApiError::Forbidden)
        ));
    }
}
