use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use super::dto::{LoginInput, LoginPayload, SignupInput, SignupPayload};
use crate::error::{AppError, FieldError};

/// A request body that is checked and normalized after deserialization.
pub trait Validate: Sized {
    type Raw: DeserializeOwned + Send;

    fn validate(raw: Self::Raw) -> Result<Self, Vec<FieldError>>;
}

/// JSON extractor that runs [`Validate`] and rejects with field-level errors.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<T::Raw>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(error = %rejection, "unreadable request body");
                AppError::BadRequest("Invalid request".into())
            })?;
        T::validate(raw).map(ValidatedJson).map_err(AppError::Validation)
    }
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

const REQUIRED: &str = "Required";

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Unwraps a string field, recording `Required` or a type mismatch otherwise.
fn string_field(field: &str, raw: Option<Value>, errors: &mut Vec<FieldError>) -> Option<String> {
    match raw {
        None => {
            errors.push(FieldError::new(field, REQUIRED));
            None
        }
        Some(Value::String(s)) => Some(s),
        Some(other) => {
            errors.push(FieldError::new(
                field,
                format!("Expected string, received {}", type_name(&other)),
            ));
            None
        }
    }
}

fn check_email(raw: Option<Value>, errors: &mut Vec<FieldError>) -> String {
    let Some(raw) = string_field("email", raw, errors) else {
        return String::new();
    };
    let email = normalize_email(&raw);
    if !is_valid_email(&email) {
        errors.push(FieldError::new("email", "Invalid email address"));
    }
    email
}

fn check_min_len(
    field: &str,
    value: Option<String>,
    min: usize,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> String {
    let Some(value) = value else {
        return String::new();
    };
    if value.chars().count() < min {
        errors.push(FieldError::new(field, message));
    }
    value
}

impl Validate for SignupInput {
    type Raw = SignupPayload;

    fn validate(raw: SignupPayload) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = check_min_len(
            "name",
            string_field("name", raw.name, &mut errors).map(|n| n.trim().to_string()),
            2,
            "Name must be at least 2 characters",
            &mut errors,
        );
        let email = check_email(raw.email, &mut errors);
        let password = check_min_len(
            "password",
            string_field("password", raw.password, &mut errors),
            6,
            "Password must be at least 6 characters",
            &mut errors,
        );

        if errors.is_empty() {
            Ok(Self {
                name,
                email,
                password,
            })
        } else {
            Err(errors)
        }
    }
}

impl Validate for LoginInput {
    type Raw = LoginPayload;

    fn validate(raw: LoginPayload) -> Result<Self, Vec<FieldError>> {
        let mut errors = Vec::new();
        let email = check_email(raw.email, &mut errors);
        let password = check_min_len(
            "password",
            string_field("password", raw.password, &mut errors),
            1,
            "Password is required",
            &mut errors,
        );

        if errors.is_empty() {
            Ok(Self { email, password })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(name: Option<&str>, email: Option<&str>, password: Option<&str>) -> SignupPayload {
        SignupPayload {
            name: name.map(Value::from),
            email: email.map(Value::from),
            password: password.map(Value::from),
        }
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("a.b+c@sub.example.org"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn signup_normalizes_name_and_email() {
        let input = SignupInput::validate(signup(
            Some("  Ada Lovelace "),
            Some("  Ada@Example.COM "),
            Some("secret1"),
        ))
        .unwrap();
        assert_eq!(input.name, "Ada Lovelace");
        assert_eq!(input.email, "ada@example.com");
        assert_eq!(input.password, "secret1");
    }

    #[test]
    fn signup_reports_every_failing_field_in_order() {
        let errors =
            SignupInput::validate(signup(Some(" A "), Some("nope"), Some("12345"))).unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("name", "Name must be at least 2 characters"),
                FieldError::new("email", "Invalid email address"),
                FieldError::new("password", "Password must be at least 6 characters"),
            ]
        );
    }

    #[test]
    fn signup_missing_fields_are_required() {
        let errors = SignupInput::validate(SignupPayload::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| e.message == "Required"));
    }

    #[test]
    fn password_length_counts_characters() {
        // Six characters, more than six bytes.
        let input =
            SignupInput::validate(signup(Some("Zoë"), Some("z@example.com"), Some("ééééé€")))
                .unwrap();
        assert_eq!(input.password, "ééééé€");
    }

    #[test]
    fn mistyped_fields_are_reported_per_field() {
        let errors = SignupInput::validate(SignupPayload {
            name: Some("Ada".into()),
            email: Some(Value::from(42)),
            password: Some(Value::Null),
        })
        .unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::new("email", "Expected string, received number"),
                FieldError::new("password", "Expected string, received null"),
            ]
        );
    }

    #[test]
    fn login_requires_password() {
        let errors = LoginInput::validate(LoginPayload {
            email: Some("ada@example.com".into()),
            password: Some("".into()),
        })
        .unwrap_err();
        assert_eq!(errors, vec![FieldError::new("password", "Password is required")]);
    }

    #[test]
    fn login_normalizes_email() {
        let input = LoginInput::validate(LoginPayload {
            email: Some(" ADA@example.com".into()),
            password: Some("x".into()),
        })
        .unwrap();
        assert_eq!(input.email, "ada@example.com");
    }
}
