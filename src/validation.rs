use std::sync::LazyLock;

use regex::Regex;

use crate::api::records::{self, RecordForm};
use crate::auth::Role;
use crate::resources::{FieldKind, Resource};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value.trim())
}

/// Check login input before any request is made.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError(
            "Email and password are required".to_string(),
        ));
    }
    if !is_valid_email(email) {
        return Err(ValidationError("Email format is invalid".to_string()));
    }
    Ok(())
}

/// Check a record form against the resource's field rules. Passwords are
/// write-only, so an update may leave them blank.
pub fn validate_record(
    resource: Resource,
    mode: FormMode,
    form: &RecordForm,
) -> Result<(), ValidationError> {
    for field in resource.fields() {
        if field.kind == FieldKind::Image {
            continue;
        }

        let Some(value) = form.value(field.name) else {
            let optional_on_update = mode == FormMode::Update && field.kind == FieldKind::Password;
            if field.required && !optional_on_update {
                return Err(ValidationError(format!("{} is required", field.label)));
            }
            continue;
        };

        match field.kind {
            FieldKind::Email if !is_valid_email(value) => {
                return Err(ValidationError(format!("{} format is invalid", field.label)));
            }
            FieldKind::Number if records::parse_number(value).is_none() => {
                return Err(ValidationError(format!("{} must be a number", field.label)));
            }
            FieldKind::Role if value.parse::<Role>().is_err() => {
                return Err(ValidationError(format!(
                    "{} must be one of: admin, senior leader, leader, member",
                    field.label
                )));
            }
            _ => {}
        }
    }

    if let Some(upload) = &form.image {
        let is_image = upload
            .content_type
            .as_deref()
            .is_none_or(|mime| mime.starts_with("image/"));
        if !is_image {
            return Err(ValidationError("Image must be an image file".to_string()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::records::Upload;

    fn form(pairs: &[(&str, &str)]) -> RecordForm {
        RecordForm {
            fields: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            image: None,
        }
    }

    #[test]
    fn login_requires_both_fields_and_valid_email() {
        assert!(validate_login("", "pw").is_err());
        assert!(validate_login("a@b.co", "").is_err());
        assert_eq!(
            validate_login("not-an-email", "pw"),
            Err(ValidationError("Email format is invalid".to_string()))
        );
        assert!(validate_login(" a@b.co ", "pw").is_ok());
    }

    #[test]
    fn reports_first_missing_required_field() {
        let err = validate_record(Resource::Cabuy, FormMode::Create, &form(&[("name", "  ")]))
            .unwrap_err();
        assert_eq!(err.0, "Name is required");

        let err = validate_record(Resource::Cabuy, FormMode::Create, &form(&[("name", "Sari")]))
            .unwrap_err();
        assert_eq!(err.0, "Phone is required");
    }

    #[test]
    fn optional_email_is_checked_only_when_present() {
        let ok = form(&[("name", "Sari"), ("phone", "0812")]);
        assert!(validate_record(Resource::Cabuy, FormMode::Create, &ok).is_ok());

        let bad = form(&[("name", "Sari"), ("phone", "0812"), ("email", "sari@")]);
        assert_eq!(
            validate_record(Resource::Cabuy, FormMode::Create, &bad).unwrap_err().0,
            "Email format is invalid"
        );
    }

    #[test]
    fn numbers_and_roles_are_checked() {
        let house = form(&[("property_id", "x1"), ("type", "36"), ("price", "100")]);
        assert_eq!(
            validate_record(Resource::Houses, FormMode::Create, &house).unwrap_err().0,
            "Property ID must be a number"
        );

        let member = form(&[("name", "A"), ("email", "a@b.co"), ("password", "pw"), ("role", "boss")]);
        assert!(validate_record(Resource::Members, FormMode::Create, &member).is_err());
    }

    #[test]
    fn non_finite_and_oversized_numbers_are_rejected() {
        for price in ["NaN", "inf", "1e400", "99999999999999999999999"] {
            let house = form(&[("property_id", "1"), ("type", "36"), ("price", price)]);
            assert_eq!(
                validate_record(Resource::Houses, FormMode::Create, &house).unwrap_err().0,
                "Price must be a number",
                "{price}"
            );
        }
        let house = form(&[("property_id", "1"), ("type", "36"), ("price", "350000000.5")]);
        assert!(validate_record(Resource::Houses, FormMode::Create, &house).is_ok());
    }

    #[test]
    fn member_password_only_required_on_create() {
        let member = form(&[("name", "A"), ("email", "a@b.co"), ("role", "Leader")]);
        assert_eq!(
            validate_record(Resource::Members, FormMode::Create, &member).unwrap_err().0,
            "Password is required"
        );
        assert!(validate_record(Resource::Members, FormMode::Update, &member).is_ok());
    }

    #[test]
    fn uploads_must_be_images() {
        let mut property = form(&[("name", "Griya Asri"), ("location", "Bogor")]);
        property.image = Some(Upload {
            file_name: "notes.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            bytes: vec![1, 2, 3],
        });
        assert!(validate_record(Resource::Properties, FormMode::Create, &property).is_err());

        property.image.as_mut().unwrap().content_type = Some("image/png".to_string());
        assert!(validate_record(Resource::Properties, FormMode::Create, &property).is_ok());
    }
}
