use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::CookieJar;

use crate::api::TokenSource;
use crate::auth::cookies::CookieStorage;
use crate::auth::role::Role;
use crate::auth::session::{SessionStore, Storage, UserProfile};
use crate::state::SharedState;

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
}

/// The current identity for one navigation. Owns the session store and
/// keeps the parsed profile so it is read from storage once.
#[derive(Debug, Clone)]
pub struct AuthContext<S = CookieStorage> {
    store: SessionStore<S>,
    token: Option<String>,
    user: Option<UserProfile>,
}

impl<S: Storage> AuthContext<S> {
    pub fn new(storage: S) -> Self {
        let store = SessionStore::new(storage);
        let session = store.read();
        Self {
            store,
            token: session.token,
            user: session.user,
        }
    }

    pub fn state(&self) -> AuthState {
        if self.user.is_some() {
            AuthState::Authenticated
        } else {
            AuthState::Anonymous
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Record a successful login.
    pub fn set_user(&mut self, token: String, user: UserProfile) {
        self.store.write(&token, &user);
        tracing::info!(user = %user.id, role = %user.role, "Session started");
        self.token = Some(token);
        self.user = Some(user);
    }

    /// Clear persisted and in-memory state, then hand back the storage and a
    /// full redirect to the login page.
    pub fn logout(mut self) -> (S, Redirect) {
        self.store.clear();
        if let Some(user) = self.user.take() {
            tracing::info!(user = %user.id, "Session ended");
        }
        self.token = None;
        (self.store.into_storage(), Redirect::to(LOGIN_PATH))
    }

    pub fn into_storage(self) -> S {
        self.store.into_storage()
    }
}

impl AuthContext<CookieStorage> {
    pub fn from_jar(jar: CookieJar, secure: bool) -> Self {
        Self::new(CookieStorage::new(jar).secure(secure))
    }

    pub fn into_jar(self) -> CookieJar {
        self.into_storage().into_jar()
    }
}

impl<S: Storage> TokenSource for AuthContext<S> {
    fn bearer_token(&self) -> Option<String> {
        self.store.token()
    }
}

impl FromRequestParts<SharedState> for AuthContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse the context the route guard already built for this request
        if let Some(ctx) = parts.extensions.get::<AuthContext>() {
            return Ok(ctx.clone());
        }

        let jar = CookieJar::from_headers(&parts.headers);
        Ok(AuthContext::from_jar(jar, state.config.secure_cookies))
    }
}
