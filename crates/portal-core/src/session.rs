//! Client session state.
//!
//! The session is a logged-in flag mirrored into two independent stores (a
//! persistent local store and a cookie jar) plus the cached [`UserProfile`].
//! It is advisory only: nothing here is revalidated against the backend.
//!
//! Every operation contains its own failures. Storage errors are logged and
//! reported as `false` / `None`, never propagated, so a broken store degrades
//! to "not authenticated".

use std::sync::Arc;
use std::time::Duration;

use crate::domain::{UserProfile, UserProfilePatch};
use crate::ports::{SessionStorage, StorageError};

pub const USER_DATA_KEY: &str = "userData";
pub const AUTH_TOKEN_KEY: &str = "authToken";
pub const IS_LOGGED_IN_KEY: &str = "isLoggedIn";

/// Lifetime of the cookie flag. Enforced by the cookie jar only.
pub const LOGIN_COOKIE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const FLAG_TRUE: &str = "true";

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";
const PUBLIC_PATHS: [&str; 2] = ["/", LOGIN_PATH];

/// Where a page request should end up given the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Stay,
    RedirectTo(&'static str),
}

/// Injectable session context shared by the views.
#[derive(Clone)]
pub struct SessionContext {
    local: Arc<dyn SessionStorage>,
    cookies: Arc<dyn SessionStorage>,
}

impl SessionContext {
    pub fn new(local: Arc<dyn SessionStorage>, cookies: Arc<dyn SessionStorage>) -> Self {
        Self { local, cookies }
    }

    async fn try_login(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let json = serde_json::to_string(profile)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.local.set(USER_DATA_KEY, &json, None).await?;
        self.local.set(IS_LOGGED_IN_KEY, FLAG_TRUE, None).await?;
        self.cookies
            .set(IS_LOGGED_IN_KEY, FLAG_TRUE, Some(LOGIN_COOKIE_TTL))
            .await?;
        Ok(())
    }

    /// Store the profile and raise both session flags.
    pub async fn login(&self, profile: &UserProfile) -> bool {
        match self.try_login(profile).await {
            Ok(()) => {
                tracing::info!(client = %profile.code, name = %profile.name, "Login stored");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to store login");
                false
            }
        }
    }

    async fn try_logout(&self) -> Result<(), StorageError> {
        self.local.remove(USER_DATA_KEY).await?;
        self.local.remove(AUTH_TOKEN_KEY).await?;
        self.local.remove(IS_LOGGED_IN_KEY).await?;
        self.cookies.remove(IS_LOGGED_IN_KEY).await?;
        Ok(())
    }

    /// Clear the profile, token and both flags.
    pub async fn logout(&self) -> bool {
        match self.try_logout().await {
            Ok(()) => {
                tracing::info!("Logout completed");
                true
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to clear session");
                false
            }
        }
    }

    async fn try_is_authenticated(&self) -> Result<bool, StorageError> {
        let local_flag = self.local.get(IS_LOGGED_IN_KEY).await?;
        let has_profile = self.local.get(USER_DATA_KEY).await?.is_some();
        let cookie_flag = self.cookies.get(IS_LOGGED_IN_KEY).await?;

        Ok(local_flag.as_deref() == Some(FLAG_TRUE)
            && has_profile
            && cookie_flag.as_deref() == Some(FLAG_TRUE))
    }

    /// True only when the local flag, the stored profile and the cookie flag
    /// all agree. Any partial state or read failure counts as logged out.
    pub async fn is_authenticated(&self) -> bool {
        self.try_is_authenticated().await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to check authentication");
            false
        })
    }

    /// No token expiry exists yet, so validity equals authentication.
    pub async fn is_session_valid(&self) -> bool {
        self.is_authenticated().await
    }

    pub async fn user_data(&self) -> Option<UserProfile> {
        let raw = match self.local.get(USER_DATA_KEY).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read user data");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::error!(error = %e, "Stored user data is not a valid profile");
                None
            }
        }
    }

    /// Shallow-merge `patch` into the stored profile.
    pub async fn update_user_data(&self, patch: UserProfilePatch) -> bool {
        let updated = self.user_data().await.unwrap_or_default().merged(patch);
        let result = match serde_json::to_string(&updated) {
            Ok(json) => self.local.set(USER_DATA_KEY, &json, None).await,
            Err(e) => Err(StorageError::Serialization(e.to_string())),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to update user data");
                false
            }
        }
    }

    /// Reserved bearer-token slot. Backend calls do not use it yet.
    pub async fn auth_token(&self) -> Option<String> {
        self.local.get(AUTH_TOKEN_KEY).await.unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to read auth token");
            None
        })
    }

    pub async fn set_auth_token(&self, token: &str) -> bool {
        match self.local.set(AUTH_TOKEN_KEY, token, None).await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "Failed to store auth token");
                false
            }
        }
    }

    /// Logged-in users are sent from the login page to the dashboard; anyone
    /// else outside the public pages is sent to login.
    pub async fn route_guard(&self, path: &str) -> RouteDecision {
        let authenticated = self.is_authenticated().await;
        if authenticated && path == LOGIN_PATH {
            RouteDecision::RedirectTo(DASHBOARD_PATH)
        } else if !authenticated && !PUBLIC_PATHS.contains(&path) {
            RouteDecision::RedirectTo(LOGIN_PATH)
        } else {
            RouteDecision::Stay
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::testing::{profile, session};
    use super::*;

    #[tokio::test]
    async fn test_login_then_authenticated() {
        let (session, _, _) = session();
        assert!(!session.is_authenticated().await);
        assert!(session.login(&profile()).await);
        assert!(session.is_authenticated().await);
        assert_eq!(session.user_data().await, Some(profile()));
    }

    #[tokio::test]
    async fn test_logout_clears_everything() {
        let (session, _, _) = session();
        session.login(&profile()).await;
        session.set_auth_token("abc").await;
        assert!(session.logout().await);
        assert!(!session.is_authenticated().await);
        assert_eq!(session.user_data().await, None);
        assert_eq!(session.auth_token().await, None);
    }

    #[tokio::test]
    async fn test_cookie_cleared_externally_fails_closed() {
        let (session, _, cookies) = session();
        session.login(&profile()).await;
        cookies.remove(IS_LOGGED_IN_KEY).await.unwrap();
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_local_flag_disagreement_fails_closed() {
        let (session, local, _) = session();
        session.login(&profile()).await;
        local.set(IS_LOGGED_IN_KEY, "false", None).await.unwrap();
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_missing_profile_fails_closed() {
        let (session, local, _) = session();
        session.login(&profile()).await;
        local.remove(USER_DATA_KEY).await.unwrap();
        assert!(!session.is_authenticated().await);
    }

    #[tokio::test]
    async fn test_storage_failure_is_contained() {
        let (session, local, _) = session();
        local.fail.store(true, Ordering::SeqCst);
        assert!(!session.login(&profile()).await);
        assert!(!session.logout().await);
        assert!(!session.is_authenticated().await);
        assert_eq!(session.user_data().await, None);
        assert!(!session.set_auth_token("t").await);
    }

    #[tokio::test]
    async fn test_update_user_data_is_shallow_merge() {
        let (session, _, _) = session();
        session.login(&profile()).await;
        let patch = UserProfilePatch {
            email: Some("financeiro@acme.com.br".into()),
            ..Default::default()
        };
        assert!(session.update_user_data(patch).await);
        let stored = session.user_data().await.unwrap();
        assert_eq!(stored.email, "financeiro@acme.com.br");
        assert_eq!(stored.name, profile().name);
    }

    #[tokio::test]
    async fn test_route_guard() {
        let (session, _, _) = session();
        assert_eq!(
            session.route_guard("/dashboard/pedidos").await,
            RouteDecision::RedirectTo(LOGIN_PATH)
        );
        assert_eq!(session.route_guard("/").await, RouteDecision::Stay);
        session.login(&profile()).await;
        assert_eq!(
            session.route_guard(LOGIN_PATH).await,
            RouteDecision::RedirectTo(DASHBOARD_PATH)
        );
        assert_eq!(session.route_guard("/dashboard").await, RouteDecision::Stay);
    }
}
