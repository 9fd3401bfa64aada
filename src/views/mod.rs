pub mod account;
pub mod auth;
pub mod dashboard;
pub mod records;
pub mod table;

use axum::middleware::from_fn_with_state;
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::{Extension, Router};

use crate::auth::guard::{self, RouteGuard};
use crate::auth::{LOGIN_PATH, Role};
use crate::resources::Resource;
use crate::state::SharedState;

/// The role portal a request was routed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal(pub Role);

impl Portal {
    pub fn prefix(&self) -> &'static str {
        self.0.portal_prefix()
    }

    pub fn resource(&self, slug: &str) -> Option<Resource> {
        Resource::from_slug(slug).filter(|r| Resource::for_role(self.0).contains(r))
    }

    pub fn nav(&self) -> Vec<NavLink> {
        std::iter::once(NavLink {
            href: format!("{}/dashboard", self.prefix()),
            title: "Dashboard",
        })
        .chain(Resource::for_role(self.0).iter().map(|r| NavLink {
            href: format!("{}/{}", self.prefix(), r.slug()),
            title: r.title(),
        }))
        .collect()
    }
}

pub struct NavLink {
    pub href: String,
    pub title: &'static str,
}

pub fn view_routes(state: &SharedState) -> Router<SharedState> {
    let account = Router::new()
        .route("/account", get(account::show))
        .route_layer(from_fn_with_state(
            (state.clone(), RouteGuard::authenticated()),
            guard::enforce,
        ));

    let mut router = Router::new()
        // Public
        .route("/", get(|| async { Redirect::to(LOGIN_PATH) }))
        .route(LOGIN_PATH, get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/forbidden", get(auth::forbidden_page))
        // Any signed-in user
        .merge(account);

    // One portal per role, each admitting only that role
    for role in Role::ALL {
        router = router.nest(role.portal_prefix(), portal_routes(state, role));
    }

    router
}

fn portal_routes(state: &SharedState, role: Role) -> Router<SharedState> {
    Router::new()
        .route("/dashboard", get(dashboard::index))
        .route("/{resource}", get(records::list).post(records::create))
        .route("/{resource}/{id}", get(records::edit).post(records::update))
        .route("/{resource}/{id}/delete", post(records::delete))
        .route_layer(from_fn_with_state(
            (state.clone(), RouteGuard::new([role])),
            guard::enforce,
        ))
        .layer(Extension(Portal(role)))
}
