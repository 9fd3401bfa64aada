use std::collections::BTreeMap;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde_json::{Map, Number, Value};

use crate::api::{Api, ApiError, TokenSource};
use crate::auth::Role;
use crate::resources::{FieldKind, Resource};
use crate::validation::FormMode;

/// An uploaded file forwarded with a record.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Submitted record fields, as entered in a form.
#[derive(Debug, Clone, Default)]
pub struct RecordForm {
    pub fields: BTreeMap<String, String>,
    pub image: Option<Upload>,
}

impl RecordForm {
    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// JSON body for the backend. Numeric fields are sent as numbers.
    ///
    /// Blank fields are left out on create. On update a blank field is sent
    /// empty so the backend clears it, except write-only passwords.
    pub fn to_json(&self, resource: Resource, mode: FormMode) -> Value {
        let mut body = Map::new();
        for name in self.fields.keys() {
            let kind = resource.field(name).map(|f| f.kind);
            let Some(value) = self.value(name) else {
                if let Some(cleared) = cleared_value(kind, mode) {
                    body.insert(name.clone(), cleared);
                }
                continue;
            };
            let json = match kind {
                Some(FieldKind::Number) => parse_number(value)
                    .map(Value::Number)
                    .unwrap_or_else(|| Value::String(value.to_string())),
                Some(FieldKind::Role) => match value.parse::<Role>() {
                    Ok(role) => Value::String(role.as_str().to_string()),
                    Err(_) => Value::String(value.to_string()),
                },
                _ => Value::String(value.to_string()),
            };
            body.insert(name.clone(), json);
        }
        Value::Object(body)
    }

    fn to_multipart(&self, resource: Resource, mode: FormMode) -> Result<Form, ApiError> {
        let mut form = Form::new();
        if let Value::Object(fields) = self.to_json(resource, mode) {
            for (name, value) in fields {
                let text = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                form = form.text(name, text);
            }
        }
        if let Some(upload) = &self.image {
            let mut part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
            if let Some(mime) = &upload.content_type {
                part = part.mime_str(mime)?;
            }
            form = form.part("image", part);
        }
        Ok(form)
    }
}

/// What a blank field becomes in an update body. Known fields other than
/// passwords and images are cleared; unknown ones are dropped.
fn cleared_value(kind: Option<FieldKind>, mode: FormMode) -> Option<Value> {
    if mode == FormMode::Create {
        return None;
    }
    match kind? {
        FieldKind::Password | FieldKind::Image => None,
        FieldKind::Number | FieldKind::Date => Some(Value::Null),
        _ => Some(Value::String(String::new())),
    }
}

/// Parse a numeric form value without losing precision. Integers outside
/// the 64-bit range and non-finite floats are rejected.
pub fn parse_number(value: &str) -> Option<Number> {
    if let Ok(int) = value.parse::<i64>() {
        return Some(int.into());
    }
    if let Ok(int) = value.parse::<u64>() {
        return Some(int.into());
    }
    if value.bytes().all(|b| b.is_ascii_digit() || b == b'-' || b == b'+') {
        return None;
    }
    value
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .and_then(Number::from_f64)
}

/// Pull the row list out of a collection response. Accepts a bare array or
/// an object wrapping it under `data`. A null or scalar payload is empty.
pub fn rows(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            Some(record @ Value::Object(_)) => vec![record],
            Some(_) => Vec::new(),
            None => vec![Value::Object(obj)],
        },
        _ => Vec::new(),
    }
}

fn item_path(resource: Resource, id: &str) -> String {
    format!("{}/{}", resource.api_path(), urlencoding::encode(id))
}

impl<T: TokenSource> Api<'_, T> {
    pub async fn list(&self, resource: Resource) -> Result<Vec<Value>, ApiError> {
        self.get(resource.api_path()).await.map(rows)
    }

    pub async fn fetch(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        let body = self.get(&item_path(resource, id)).await?;
        Ok(match body {
            Value::Object(mut obj) if obj.contains_key("data") => {
                obj.remove("data").unwrap_or(Value::Null)
            }
            other => other,
        })
    }

    pub async fn create(&self, resource: Resource, form: &RecordForm) -> Result<Value, ApiError> {
        self.write(Method::POST, resource.api_path(), resource, FormMode::Create, form)
            .await
    }

    pub async fn update(
        &self,
        resource: Resource,
        id: &str,
        form: &RecordForm,
    ) -> Result<Value, ApiError> {
        self.write(Method::PUT, &item_path(resource, id), resource, FormMode::Update, form)
            .await
    }

    pub async fn remove(&self, resource: Resource, id: &str) -> Result<Value, ApiError> {
        self.delete(&item_path(resource, id)).await
    }

    async fn write(
        &self,
        method: Method,
        path: &str,
        resource: Resource,
        mode: FormMode,
        form: &RecordForm,
    ) -> Result<Value, ApiError> {
        if resource.accepts_image() && form.image.is_some() {
            let multipart = form.to_multipart(resource, mode)?;
            return self.send_multipart(method, path, multipart).await;
        }

        let body = form.to_json(resource, mode);
        if method == Method::PUT {
            self.put_json(path, &body).await
        } else {
            self.post_json(path, &body).await
        }
    }
}
