//! Auth session cache: the single source of truth for "who is signed in".
//!
//! The session token itself lives in an HTTP-only cookie, so the client
//! only ever learns identity by asking `GET /api/auth/me`. The resolved
//! state is held in one signal provided at the top of the component tree;
//! header, favorites, and every gated action read from it.
//!
//! State machine:
//!
//! ```text
//! Loading ── /me 2xx ──▶ Authenticated(user)
//!    │                        │
//!    └── /me 401/error ──▶ Unauthenticated ◀── logout() (always local-first)
//! ```
//!
//! Account-switch hygiene: whenever a refresh resolves a different primary
//! key than the one currently cached, the whole [`RequestCache`] is
//! cleared before the new identity is adopted, so two accounts sharing a
//! browser can never see each other's cached favorites or profile.

use dioxus::logger::tracing::{info, warn};
use url::form_urlencoded;

use crate::api::types::User;
use crate::api::ApiBackend;
use crate::cache::RequestCache;
use crate::error::ApiError;

/// Resolution state of the current browser session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The session-check request is outstanding.
    Loading,
    Authenticated(User),
    Unauthenticated,
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn user_id(&self) -> Option<u32> {
        self.user().map(|u| u.id)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn is_admin(&self) -> bool {
        self.user().map(|u| u.is_admin).unwrap_or(false)
    }
}

/// Initial state for a freshly mounted app.
///
/// A server-provided identity (e.g. embedded in the page shell) skips the
/// probe; otherwise the session starts `Loading` and [`check_session`]
/// resolves it.
pub fn initial_state(server_identity: Option<User>) -> SessionState {
    match server_identity {
        Some(user) => SessionState::Authenticated(user),
        None => SessionState::Loading,
    }
}

/// Runs the credentialed session check.
///
/// Any failure (401, transport error, malformed body) resolves to
/// `Unauthenticated` rather than retry-looping; the user can always sign
/// in explicitly.
pub async fn check_session(api: &dyn ApiBackend) -> SessionState {
    match api.current_user().await {
        Ok(user) => {
            info!("session resolved for {}", user.email);
            SessionState::Authenticated(user)
        }
        Err(err) => {
            if !err.is_unauthorized() {
                warn!("session check failed, treating as signed out: {}", err);
            }
            SessionState::Unauthenticated
        }
    }
}

/// Adopts a freshly resolved session state.
///
/// If the resolved primary key differs from the cached one (including
/// appearing or disappearing), every user-scoped assumption in the data
/// cache is void, so the cache is cleared wholesale.
pub fn reconcile(
    current: &SessionState,
    resolved: SessionState,
    cache: &RequestCache,
) -> SessionState {
    let before = current.user_id();
    let after = resolved.user_id();
    if before != after && before.is_some() {
        info!("session identity changed, purging client cache");
        cache.clear();
    }
    resolved
}

/// Local-first logout: the UI drops to `Unauthenticated` and the cache is
/// purged immediately, regardless of whether the server call (issued
/// separately) succeeds.
pub fn logout_locally(cache: &RequestCache) -> SessionState {
    cache.clear();
    SessionState::Unauthenticated
}

/// Builds the login redirect for a gated action attempted while signed
/// out, carrying the current path as the return target.
pub fn login_redirect(current_path: &str) -> String {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("redirect", current_path)
        .finish();
    format!("/login?{query}")
}

/// Reads the `redirect` return target back out of a login query string.
pub fn redirect_target(query: &str) -> Option<String> {
    form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
        .find(|(name, _)| name == "redirect")
        .map(|(_, value)| value.into_owned())
}

/// Client-side form validation, run before any network call.
pub mod forms {
    use thiserror::Error;

    /// Validation failures surfaced inline next to the form control.
    #[derive(Debug, Clone, PartialEq, Error)]
    pub enum FormError {
        #[error("Name is required")]
        MissingName,
        #[error("Enter a valid email address")]
        InvalidEmail,
        #[error("Password must be at least 8 characters")]
        PasswordTooShort,
        #[error("Passwords do not match")]
        PasswordMismatch,
    }

    /// Just enough structure to catch typos before the backend does the
    /// real validation: something@something.something.
    fn plausible_email(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    }

    pub fn validate_login(email: &str, password: &str) -> Result<(), FormError> {
        if !plausible_email(email.trim()) {
            return Err(FormError::InvalidEmail);
        }
        if password.len() < 8 {
            return Err(FormError::PasswordTooShort);
        }
        Ok(())
    }

    pub fn validate_signup(
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<(), FormError> {
        if name.trim().is_empty() {
            return Err(FormError::MissingName);
        }
        validate_login(email, password)?;
        if password != confirm {
            return Err(FormError::PasswordMismatch);
        }
        Ok(())
    }
}

/// Signs in after client-side validation has already passed.
pub async fn login(api: &dyn ApiBackend, email: &str, password: &str) -> Result<User, ApiError> {
    api.login(email, password).await
}

/// Registers a new account.
pub async fn signup(
    api: &dyn ApiBackend,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, ApiError> {
    api.signup(name, email, password).await
}

#[cfg(test)]
mod tests {
    use super::forms::*;
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::cache::{CacheKey, CachePolicy};
    use futures::executor::block_on;
    use std::time::Duration;

    fn prime(cache: &RequestCache, key: CacheKey, value: u32) {
        block_on(cache.get(key, CachePolicy::new(Duration::from_secs(3600), 1), || async move {
            Ok(value)
        }))
        .unwrap();
    }

    #[test]
    fn test_initial_state() {
        assert_eq!(initial_state(None), SessionState::Loading);
        let user = FakeApi::user(1, "Ada");
        assert_eq!(
            initial_state(Some(user.clone())),
            SessionState::Authenticated(user)
        );
    }

    #[test]
    fn test_check_session_authenticated() {
        let api = FakeApi::new();
        api.queue_me(Ok(FakeApi::user(1, "Ada")));

        let state = block_on(check_session(&api));
        assert_eq!(state.user_id(), Some(1));
        assert_eq!(api.me_calls.get(), 1);
    }

    #[test]
    fn test_check_session_defaults_to_unauthenticated() {
        let api = FakeApi::new();
        api.queue_me(Err(ApiError::Unauthorized));
        assert_eq!(block_on(check_session(&api)), SessionState::Unauthenticated);

        api.queue_me(Err(ApiError::Network("offline".into())));
        assert_eq!(block_on(check_session(&api)), SessionState::Unauthenticated);
    }

    #[test]
    fn test_reconcile_same_identity_keeps_cache() {
        let cache = RequestCache::new();
        prime(&cache, CacheKey::favorites(), 10);

        let current = SessionState::Authenticated(FakeApi::user(1, "Ada"));
        let resolved = SessionState::Authenticated(FakeApi::user(1, "Ada"));
        let next = reconcile(&current, resolved, &cache);

        assert_eq!(next.user_id(), Some(1));
        assert_eq!(cache.peek::<u32>(&CacheKey::favorites()), Some(10));
    }

    #[test]
    fn test_reconcile_identity_change_clears_cache() {
        let cache = RequestCache::new();
        prime(&cache, CacheKey::favorites(), 10);
        prime(&cache, CacheKey::books(1, 20), 20);

        let current = SessionState::Authenticated(FakeApi::user(1, "Ada"));
        let resolved = SessionState::Authenticated(FakeApi::user(2, "Bo"));
        let next = reconcile(&current, resolved, &cache);

        assert_eq!(next.user_id(), Some(2));
        assert!(cache.is_empty(), "account switch must purge the whole cache");
    }

    #[test]
    fn test_reconcile_first_resolution_keeps_cache() {
        // Loading -> Authenticated is not an account switch.
        let cache = RequestCache::new();
        prime(&cache, CacheKey::books(1, 20), 20);

        let next = reconcile(
            &SessionState::Loading,
            SessionState::Authenticated(FakeApi::user(1, "Ada")),
            &cache,
        );

        assert!(next.is_authenticated());
        assert_eq!(cache.peek::<u32>(&CacheKey::books(1, 20)), Some(20));
    }

    #[test]
    fn test_logout_clears_user_data() {
        let cache = RequestCache::new();
        prime(&cache, CacheKey::favorites(), 10);
        prime(&cache, CacheKey::favorite_check(42), 1);

        let state = logout_locally(&cache);

        assert_eq!(state, SessionState::Unauthenticated);
        assert_eq!(cache.peek::<u32>(&CacheKey::favorite_check(42)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_login_redirect_encodes_path() {
        assert_eq!(login_redirect("/book/42"), "/login?redirect=%2Fbook%2F42");
        assert_eq!(
            redirect_target("redirect=%2Fbook%2F42").as_deref(),
            Some("/book/42")
        );
        assert_eq!(redirect_target("?other=1"), None);
    }

    #[test]
    fn test_login_validation() {
        assert_eq!(validate_login("not-an-email", "longenough"), Err(FormError::InvalidEmail));
        assert_eq!(validate_login("a@b", "longenough"), Err(FormError::InvalidEmail));
        assert_eq!(
            validate_login("ada@example.com", "short"),
            Err(FormError::PasswordTooShort)
        );
        assert_eq!(validate_login("ada@example.com", "longenough"), Ok(()));
    }

    #[test]
    fn test_signup_validation() {
        assert_eq!(
            validate_signup("", "ada@example.com", "longenough", "longenough"),
            Err(FormError::MissingName)
        );
        assert_eq!(
            validate_signup("Ada", "ada@example.com", "longenough", "different"),
            Err(FormError::PasswordMismatch)
        );
        assert_eq!(
            validate_signup("Ada", "ada@example.com", "longenough", "longenough"),
            Ok(())
        );
    }

    #[test]
    fn test_login_returns_the_new_identity() {
        let api = FakeApi::new();
        api.queue_login(Ok(FakeApi::user(3, "Cy")));

        let user = block_on(login(&api, "cy@example.com", "longenough")).unwrap();
        assert_eq!(user.id, 3);
    }

    #[test]
    fn test_admin_flag() {
        let mut user = FakeApi::user(1, "Ada");
        assert!(!SessionState::Authenticated(user.clone()).is_admin());
        user.is_admin = true;
        assert!(SessionState::Authenticated(user).is_admin());
        assert!(!SessionState::Unauthenticated.is_admin());
    }
}
