use askama::Template;
use axum::Form;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use serde::Deserialize;

use crate::api::auth::{self as api_auth, Credentials};
use crate::auth::{AuthContext, AuthState};
use crate::error::AppError;
use crate::state::SharedState;
use crate::validation;

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>Login</title></head>
<body>
<h1>Sign in</h1>
{% if let Some(error) = error %}<p class="error">{{ error }}</p>{% endif %}
<form method="post" action="/login">
  <label>Email <input type="email" name="email" value="{{ email }}"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Login</button>
</form>
</body></html>"#
)]
struct LoginTemplate {
    email: String,
    error: Option<String>,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>Forbidden</title></head>
<body>
<h1>Forbidden</h1>
<p>You do not have access to this page.</p>
<p><a href="/login">Back to login</a></p>
</body></html>"#
)]
struct ForbiddenTemplate;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn render_login(email: String, error: Option<String>) -> Result<Response, AppError> {
    let page = LoginTemplate { email, error }.render()?;
    Ok(Html(page).into_response())
}

pub async fn login_page(auth: AuthContext) -> Result<Response, AppError> {
    // Already signed in: go straight to the role's dashboard
    if auth.state() == AuthState::Authenticated && auth.token().is_some() {
        if let Some(role) = auth.role() {
            return Ok(Redirect::to(&role.home_path()).into_response());
        }
    }

    render_login(String::new(), None)
}

pub async fn login(
    State(state): State<SharedState>,
    mut auth: AuthContext,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let email = form.email.trim().to_string();

    if let Err(e) = validation::validate_login(&email, &form.password) {
        return render_login(email, Some(e.to_string()));
    }

    let credentials = Credentials {
        email: email.clone(),
        password: form.password,
    };

    match api_auth::login(&state.api, &credentials).await {
        Ok(resp) => {
            let home = resp.user.role.home_path();
            auth.set_user(resp.token, resp.user);
            Ok((auth.into_jar(), Redirect::to(&home)).into_response())
        }
        Err(e) => {
            tracing::info!(%email, "Login failed: {e}");
            render_login(email, Some(e.user_message()))
        }
    }
}

pub async fn logout(auth: AuthContext) -> impl IntoResponse {
    let (storage, redirect) = auth.logout();
    (storage.into_jar(), redirect)
}

/// Exists for direct links only; the route guard always sends denied
/// navigations to the login page instead.
pub async fn forbidden_page() -> Result<Response, AppError> {
    let page = ForbiddenTemplate.render()?;
    Ok((StatusCode::FORBIDDEN, Html(page)).into_response())
}
