use askama::Template;
use axum::response::{Html, IntoResponse};

use crate::auth::AuthContext;
use crate::error::AppError;

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>Account</title></head>
<body>
<h1>Account</h1>
{% if let Some(user) = user %}
<dl>
  <dt>Name</dt><dd>{{ user.name }}</dd>
  <dt>Email</dt><dd>{{ user.email }}</dd>
  <dt>Role</dt><dd>{{ user.role.label() }}</dd>
</dl>
<p><a href="{{ home }}">Dashboard</a></p>
{% else %}
<p class="error">Profile unavailable. Please log in again.</p>
{% endif %}
<form method="post" action="/logout"><button type="submit">Logout</button></form>
</body></html>"#
)]
struct AccountTemplate {
    user: Option<crate::auth::UserProfile>,
    home: String,
}

/// Profile of whoever holds the session. Reachable with any token.
pub async fn show(auth: AuthContext) -> Result<impl IntoResponse, AppError> {
    let user = auth.user().cloned();
    let home = user
        .as_ref()
        .map(|u| u.role.home_path())
        .unwrap_or_else(|| "/login".to_string());

    Ok(Html(AccountTemplate { user, home }.render()?))
}
