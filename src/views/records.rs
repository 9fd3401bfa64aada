use askama::Template;
use axum::Extension;
use axum::extract::{Multipart, Path, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

use crate::api::records::{RecordForm, Upload};
use crate::auth::{AuthContext, LOGIN_PATH};
use crate::error::AppError;
use crate::resources::{FieldKind, Resource};
use crate::state::SharedState;
use crate::validation::{self, FormMode};
use crate::views::table::{self, TableRow};
use crate::views::{NavLink, Portal};

struct FormField {
    name: &'static str,
    label: &'static str,
    input_type: &'static str,
    required: bool,
    multiline: bool,
    value: String,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>{{ title }}</title></head>
<body>
<nav>{% for link in nav %}<a href="{{ link.href }}">{{ link.title }}</a> {% endfor %}</nav>
<h1>{{ title }}</h1>
{% if let Some(error) = error %}<p class="error">{{ error }}</p>{% endif %}
<table>
<thead><tr>{% for column in columns %}<th>{{ column }}</th>{% endfor %}<th></th></tr></thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row.cells %}<td>{{ cell }}</td>{% endfor %}<td>{% if !row.id.is_empty() %}<a href="{{ base }}/{{ row.path_id }}">Edit</a>
<form method="post" action="{{ base }}/{{ row.path_id }}/delete"><button type="submit">Delete</button></form>{% endif %}</td></tr>
{% endfor %}</tbody>
</table>
<h2>New {{ title }}</h2>
<form method="post" action="{{ base }}" enctype="multipart/form-data">
{% for field in fields %}<label>{{ field.label }}{% if field.multiline %} <textarea name="{{ field.name }}">{{ field.value }}</textarea>{% else %} <input type="{{ field.input_type }}" name="{{ field.name }}" value="{{ field.value }}"{% if field.required %} required{% endif %}>{% endif %}</label>
{% endfor %}<button type="submit">Save</button>
</form>
</body></html>"#
)]
struct ListTemplate {
    title: &'static str,
    base: String,
    nav: Vec<NavLink>,
    columns: Vec<String>,
    rows: Vec<TableRow>,
    fields: Vec<FormField>,
    error: Option<String>,
}

#[derive(Template)]
#[template(
    ext = "html",
    source = r#"<!doctype html>
<html><head><title>Edit {{ title }}</title></head>
<body>
<nav>{% for link in nav %}<a href="{{ link.href }}">{{ link.title }}</a> {% endfor %}</nav>
<h1>Edit {{ title }} #{{ id }}</h1>
{% if let Some(error) = error %}<p class="error">{{ error }}</p>{% endif %}
<form method="post" action="{{ base }}/{{ path_id }}" enctype="multipart/form-data">
{% for field in fields %}<label>{{ field.label }}{% if field.multiline %} <textarea name="{{ field.name }}">{{ field.value }}</textarea>{% else %} <input type="{{ field.input_type }}" name="{{ field.name }}" value="{{ field.value }}">{% endif %}</label>
{% endfor %}<button type="submit">Update</button>
</form>
<p><a href="{{ base }}">Back</a></p>
</body></html>"#
)]
struct EditTemplate {
    title: &'static str,
    base: String,
    id: String,
    path_id: String,
    nav: Vec<NavLink>,
    fields: Vec<FormField>,
    error: Option<String>,
}

fn base_path(portal: Portal, resource: Resource) -> String {
    format!("{}/{}", portal.prefix(), resource.slug())
}

fn form_fields(resource: Resource, value_of: impl Fn(&str) -> String) -> Vec<FormField> {
    resource
        .fields()
        .iter()
        .map(|f| FormField {
            name: f.name,
            label: f.label,
            input_type: f.kind.input_type(),
            required: f.required,
            multiline: f.kind == FieldKind::LongText,
            value: match f.kind {
                FieldKind::Password | FieldKind::Image => String::new(),
                _ => value_of(f.name),
            },
        })
        .collect()
}

/// Fetch the collection and render it. A failed fetch still renders the
/// page; an error passed in by the caller takes precedence.
async fn render_list(
    state: &SharedState,
    portal: Portal,
    auth: &AuthContext,
    resource: Resource,
    draft: Option<&RecordForm>,
    error: Option<String>,
) -> Result<Response, AppError> {
    let api = state.api.with_session(auth);
    let (records, error) = match api.list(resource).await {
        Ok(records) => (records, error),
        Err(e) => (Vec::new(), Some(error.unwrap_or_else(|| e.user_message()))),
    };

    let table = table::build(&records);
    let template = ListTemplate {
        title: resource.title(),
        base: base_path(portal, resource),
        nav: portal.nav(),
        columns: table.columns,
        rows: table.rows,
        fields: form_fields(resource, |name| {
            draft
                .and_then(|d| d.fields.get(name).cloned())
                .unwrap_or_default()
        }),
        error,
    };
    Ok(Html(template.render()?).into_response())
}

fn render_edit(
    portal: Portal,
    resource: Resource,
    id: String,
    value_of: impl Fn(&str) -> String,
    error: Option<String>,
) -> Result<Response, AppError> {
    let template = EditTemplate {
        title: resource.title(),
        base: base_path(portal, resource),
        path_id: urlencoding::encode(&id).into_owned(),
        id,
        nav: portal.nav(),
        fields: form_fields(resource, value_of),
        error,
    };
    Ok(Html(template.render()?).into_response())
}

async fn read_form(mut multipart: Multipart) -> Result<RecordForm, AppError> {
    let mut form = RecordForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if field.file_name().is_some() {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid upload: {e}")))?;
            // Browsers send an empty part when no file was chosen
            if name == "image" && !file_name.is_empty() && !bytes.is_empty() {
                form.image = Some(Upload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid form data: {e}")))?;
        form.fields.insert(name, text);
    }

    Ok(form)
}

pub async fn list(
    State(state): State<SharedState>,
    Extension(portal): Extension<Portal>,
    auth: AuthContext,
    Path(slug): Path<String>,
) -> Result<Response, AppError> {
    let Some(resource) = portal.resource(&slug) else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };
    render_list(&state, portal, &auth, resource, None, None).await
}

pub async fn create(
    State(state): State<SharedState>,
    Extension(portal): Extension<Portal>,
    auth: AuthContext,
    Path(slug): Path<String>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(resource) = portal.resource(&slug) else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };
    let form = read_form(multipart).await?;

    if let Err(e) = validation::validate_record(resource, FormMode::Create, &form) {
        return render_list(&state, portal, &auth, resource, Some(&form), Some(e.to_string())).await;
    }

    match state.api.with_session(&auth).create(resource, &form).await {
        Ok(_) => {
            tracing::info!(resource = resource.slug(), "Record created");
            Ok(Redirect::to(&base_path(portal, resource)).into_response())
        }
        Err(e) => {
            render_list(&state, portal, &auth, resource, Some(&form), Some(e.user_message())).await
        }
    }
}

pub async fn edit(
    State(state): State<SharedState>,
    Extension(portal): Extension<Portal>,
    auth: AuthContext,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(resource) = portal.resource(&slug) else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    match state.api.with_session(&auth).fetch(resource, &id).await {
        Ok(record) => render_edit(
            portal,
            resource,
            id,
            |name| record.get(name).map(table::display_value).unwrap_or_default(),
            None,
        ),
        Err(e) => render_edit(portal, resource, id, |_| String::new(), Some(e.user_message())),
    }
}

pub async fn update(
    State(state): State<SharedState>,
    Extension(portal): Extension<Portal>,
    auth: AuthContext,
    Path((slug, id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(resource) = portal.resource(&slug) else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };
    let form = read_form(multipart).await?;
    let draft = |name: &str| form.fields.get(name).cloned().unwrap_or_default();

    if let Err(e) = validation::validate_record(resource, FormMode::Update, &form) {
        return render_edit(portal, resource, id, draft, Some(e.to_string()));
    }

    match state.api.with_session(&auth).update(resource, &id, &form).await {
        Ok(_) => {
            tracing::info!(resource = resource.slug(), %id, "Record updated");
            Ok(Redirect::to(&base_path(portal, resource)).into_response())
        }
        Err(e) => render_edit(portal, resource, id, draft, Some(e.user_message())),
    }
}

pub async fn delete(
    State(state): State<SharedState>,
    Extension(portal): Extension<Portal>,
    auth: AuthContext,
    Path((slug, id)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let Some(resource) = portal.resource(&slug) else {
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    match state.api.with_session(&auth).remove(resource, &id).await {
        Ok(_) => {
            tracing::info!(resource = resource.slug(), %id, "Record deleted");
            Ok(Redirect::to(&base_path(portal, resource)).into_response())
        }
        Err(e) => render_list(&state, portal, &auth, resource, None, Some(e.user_message())).await,
    }
}
