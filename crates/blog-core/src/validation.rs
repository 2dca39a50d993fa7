//! Validation rules applied before any record is written.
//!
//! Every rule is a plain function; forms compose them explicitly and collect
//! failures into [`FormErrors`] keyed by field name.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Group;

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const INVALID_CHOICE_MESSAGE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

const USERNAME_MAX_CHARS: usize = 150;
const PASSWORD_MIN_CHARS: usize = 8;

/// A single failed rule, attributed to a form field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Field-level errors for a rejected form, in stable field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<&'static str, Vec<String>>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.entry(error.field).or_default().push(error.message);
    }

    /// Record the outcome of a rule, keeping only failures.
    pub fn check(&mut self, result: Result<(), ValidationError>) {
        if let Err(error) = result {
            self.push(error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        self.0.iter().map(|(field, messages)| (*field, messages.as_slice()))
    }

    /// `Ok(value)` when nothing failed, the collected errors otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<ValidationError> for FormErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.push(error);
        errors
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Fails when `value` is empty after trimming surrounding whitespace.
pub fn validate_not_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, REQUIRED_MESSAGE));
    }
    Ok(())
}

pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    validate_not_empty("username", value)?;

    if value.chars().count() > USERNAME_MAX_CHARS {
        return Err(ValidationError::new(
            "username",
            format!("Ensure this value has at most {} characters.", USERNAME_MAX_CHARS),
        ));
    }

    let allowed = |c: char| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_');
    if !value.chars().all(allowed) {
        return Err(ValidationError::new(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        ));
    }

    Ok(())
}

pub fn validate_password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() < PASSWORD_MIN_CHARS {
        return Err(ValidationError::new(
            "password",
            format!("Password must be at least {} characters.", PASSWORD_MIN_CHARS),
        ));
    }
    Ok(())
}

/// Raw post submission, exactly as received from the client.
#[derive(Debug, Clone, Default)]
pub struct PostForm {
    pub text: String,
    pub group: Option<String>,
}

/// A post submission that passed every rule and may be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub text: String,
    pub group_id: Option<Uuid>,
}

impl PostForm {
    pub fn new(text: impl Into<String>, group: Option<String>) -> Self {
        Self {
            text: text.into(),
            group,
        }
    }

    /// The group choice, with a blank selection treated as "no group".
    pub fn group_choice(&self) -> Option<&str> {
        self.group
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
    }

    /// Validate against the available groups and produce a writable draft.
    pub fn clean(&self, groups: &[Group]) -> Result<PostDraft, FormErrors> {
        let mut errors = FormErrors::new();
        errors.check(validate_not_empty("text", &self.text));

        let group_id = match self.group_choice() {
            None => None,
            Some(raw) => {
                let known = Uuid::parse_str(raw)
                    .ok()
                    .filter(|id| groups.iter().any(|group| group.id == *id));
                if known.is_none() {
                    errors.push(ValidationError::new("group", INVALID_CHOICE_MESSAGE));
                }
                known
            }
        };

        errors.into_result(PostDraft {
            text: self.text.trim().to_string(),
            group_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group() -> Group {
        Group::new("Test group", "test-slug", "Test description")
    }

    #[test]
    fn test_not_empty_rejects_blank_and_whitespace() {
        assert!(validate_not_empty("text", "").is_err());
        assert!(validate_not_empty("text", "  \n\t ").is_err());
        assert!(validate_not_empty("text", " hello ").is_ok());
    }

    #[test]
    fn test_clean_trims_text_and_resolves_group() {
        let group = group();
        let form = PostForm::new("  hello  ", Some(group.id.to_string()));

        let draft = form.clean(std::slice::from_ref(&group)).unwrap();

        assert_eq!(draft.text, "hello");
        assert_eq!(draft.group_id, Some(group.id));
    }

    #[test]
    fn test_clean_blank_group_means_none() {
        let draft = PostForm::new("hello", Some("".to_string())).clean(&[]).unwrap();
        assert_eq!(draft.group_id, None);
    }

    #[test]
    fn test_clean_unknown_group_is_field_error() {
        let errors = PostForm::new("hello", Some(uuid::Uuid::new_v4().to_string()))
            .clean(&[group()])
            .unwrap_err();

        assert_eq!(errors.field("group"), Some(&[INVALID_CHOICE_MESSAGE.to_string()][..]));
        assert!(errors.field("text").is_none());
    }

    #[test]
    fn test_clean_collects_every_failure() {
        let errors = PostForm::new("   ", Some("not-an-id".to_string()))
            .clean(&[group()])
            .unwrap_err();

        assert!(errors.field("text").is_some());
        assert!(errors.field("group").is_some());
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("NameTest").is_ok());
        assert!(validate_username("user.name+tag@host-x_y").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"a".repeat(151)).is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("long enough").is_ok());
    }
}
