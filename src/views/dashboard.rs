use askama::Template;
use axum::Extension;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use futures_util::future::join_all;

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::resources::Resource;
use crate::state::SharedState;
use crate::views::{NavLink, Portal};

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>{{ portal_label }} Dashboard</title></head>
<body>
<nav>{% for link in nav %}<a href="{{ link.href }}">{{ link.title }}</a> {% endfor %}<a href="/account">Account</a>
<form method="post" action="/logout"><button type="submit">Logout</button></form></nav>
<h1>{{ portal_label }} Dashboard</h1>
<p>Welcome, {{ user_name }}</p>
{% for error in errors %}<p class="error">{{ error }}</p>{% endfor %}
<section class="stats">
{% for card in cards %}<div class="stat"><a href="{{ card.href }}">{{ card.title }}</a> <strong>{{ card.count }}</strong></div>
{% endfor %}</section>
</body></html>"#
)]
struct DashboardTemplate {
    portal_label: &'static str,
    user_name: String,
    nav: Vec<NavLink>,
    cards: Vec<StatCard>,
    errors: Vec<String>,
}

struct StatCard {
    title: &'static str,
    href: String,
    count: String,
}

pub async fn index(
    State(state): State<SharedState>,
    Extension(portal): Extension<Portal>,
    auth: AuthContext,
) -> Result<impl IntoResponse, AppError> {
    let api = state.api.with_session(&auth);
    let resources: &[Resource] = Resource::for_role(portal.0);

    // Requests run together and are dropped with this handler
    let results = join_all(resources.iter().map(|r| api.list(*r))).await;

    let mut cards = Vec::with_capacity(resources.len());
    let mut errors: Vec<String> = Vec::new();
    for (resource, result) in resources.iter().zip(results) {
        let count = match result {
            Ok(rows) => rows.len().to_string(),
            Err(e) => {
                let message = e.user_message();
                if !errors.contains(&message) {
                    errors.push(message);
                }
                "-".to_string()
            }
        };
        cards.push(StatCard {
            title: resource.title(),
            href: format!("{}/{}", portal.prefix(), resource.slug()),
            count,
        });
    }

    let template = DashboardTemplate {
        portal_label: portal.0.label(),
        user_name: auth.user().map(|u| u.name.clone()).unwrap_or_default(),
        nav: portal.nav(),
        cards,
        errors,
    };
    Ok(Html(template.render()?))
}
