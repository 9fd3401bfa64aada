use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use crate::auth::context::{AuthContext, LOGIN_PATH};
use crate::auth::role::Role;
use crate::auth::session::Storage;
use crate::state::SharedState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    MissingToken,
    RoleNotAllowed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Permit,
    Deny(DenyReason),
}

/// Role allow-list for a subtree of routes. An empty list admits any
/// session holding a token.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    allow: Vec<Role>,
}

impl RouteGuard {
    pub fn new(allow: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allow: allow.into_iter().collect(),
        }
    }

    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn allows(&self, role: Role) -> bool {
        self.allow.contains(&role)
    }

    pub fn decide(&self, token: Option<&str>, role: Option<Role>) -> Decision {
        if token.is_none_or(str::is_empty) {
            return Decision::Deny(DenyReason::MissingToken);
        }
        if !self.allow.is_empty() && !role.is_some_and(|r| self.allows(r)) {
            return Decision::Deny(DenyReason::RoleNotAllowed);
        }
        Decision::Permit
    }

    pub fn check<S: Storage>(&self, ctx: &AuthContext<S>) -> Decision {
        self.decide(ctx.token(), ctx.role())
    }
}

/// Middleware enforcing a [`RouteGuard`]. Every denial goes to the login
/// page, whether the session is missing or holds the wrong role.
pub async fn enforce(
    State((state, guard)): State<(SharedState, RouteGuard)>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    let ctx = AuthContext::from_jar(jar, state.config.secure_cookies);

    match guard.check(&ctx) {
        Decision::Permit => {
            req.extensions_mut().insert(ctx);
            next.run(req).await
        }
        Decision::Deny(reason) => {
            tracing::debug!(
                path = %req.uri().path(),
                ?reason,
                role = ?ctx.role(),
                "Route guard denied navigation"
            );
            Redirect::to(LOGIN_PATH).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denies_without_token() {
        let guard = RouteGuard::new([Role::Admin]);
        assert_eq!(
            guard.decide(None, Some(Role::Admin)),
            Decision::Deny(DenyReason::MissingToken)
        );
        assert_eq!(
            guard.decide(Some(""), Some(Role::Admin)),
            Decision::Deny(DenyReason::MissingToken)
        );
        assert_eq!(
            RouteGuard::authenticated().decide(None, None),
            Decision::Deny(DenyReason::MissingToken)
        );
    }

    #[test]
    fn denies_role_outside_allow_list() {
        let guard = RouteGuard::new([Role::Member]);
        assert_eq!(
            guard.decide(Some("tok"), Some(Role::Admin)),
            Decision::Deny(DenyReason::RoleNotAllowed)
        );
        assert_eq!(
            guard.decide(Some("tok"), None),
            Decision::Deny(DenyReason::RoleNotAllowed)
        );
    }

    #[test]
    fn permits_role_in_allow_list() {
        let guard = RouteGuard::new([Role::Leader, Role::SeniorLeader]);
        assert_eq!(guard.decide(Some("tok"), Some(Role::SeniorLeader)), Decision::Permit);
        assert_eq!(guard.decide(Some("tok"), Some(Role::Leader)), Decision::Permit);
    }

    #[test]
    fn empty_allow_list_only_needs_a_token() {
        let guard = RouteGuard::authenticated();
        assert_eq!(guard.decide(Some("tok"), None), Decision::Permit);
        assert_eq!(guard.decide(Some("tok"), Some(Role::Member)), Decision::Permit);
    }

    #[test]
    fn allow_list_built_from_free_text_matches_normalized_roles() {
        let allow: Vec<Role> = ["Senior_Leader", " leader "]
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        let guard = RouteGuard::new(allow);
        let role: Role = "senior-leader".parse().unwrap();
        assert_eq!(guard.decide(Some("tok"), Some(role)), Decision::Permit);
    }
}
