//! Declarative field validation for inbound payloads.
//!
//! Each payload type publishes a table of [`FieldRule`]s; [`validate`] walks the table once and
//! collects every failure into the payload's typed error collection, so adding a constraint is
//! a one-line change to the table.

use crate::api::models::users::{UpdateValidationErrors, UserUpdate};

pub const EMAIL_MESSAGE: &str = "Invalid email format!";

/// Constraint applied to a present, non-empty string field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Inclusive bounds on the length in characters
    Length { min: usize, max: usize },
    /// Syntactically valid email address
    Email,
}

impl Rule {
    /// Returns the failure message if `value` violates the rule.
    pub fn check(&self, value: &str) -> Option<String> {
        match *self {
            Rule::Length { min, max } => {
                let len = value.chars().count();
                (len < min || len > max).then(|| format!("Must be between {min} and {max} characters"))
            }
            Rule::Email => (!is_valid_email(value)).then(|| EMAIL_MESSAGE.to_string()),
        }
    }
}

/// Binds a [`Rule`] to one field of payload `T`, writing failures into error collection `E`.
pub struct FieldRule<T, E> {
    pub field: &'static str,
    pub rule: Rule,
    pub value: fn(&T) -> Option<&str>,
    pub record: fn(&mut E, String),
}

/// Evaluate every rule against `payload`; absent values are skipped.
pub fn validate<T, E: Default + PartialEq>(payload: &T, rules: &[FieldRule<T, E>]) -> Result<(), E> {
    let mut errors = E::default();
    for rule in rules {
        let Some(value) = (rule.value)(payload) else {
            continue;
        };
        // First failure per field wins
        if let Some(message) = rule.rule.check(value) {
            tracing::debug!(field = rule.field, %message, "field validation failed");
            (rule.record)(&mut errors, message);
        }
    }

    if errors == E::default() { Ok(()) } else { Err(errors) }
}

pub static USER_UPDATE_RULES: &[FieldRule<UserUpdate, UpdateValidationErrors>] = &[
    FieldRule {
        field: "name",
        rule: Rule::Length { min: 2, max: 100 },
        value: |u| u.name.as_deref(),
        record: |e, m| {
            e.name_error.get_or_insert(m);
        },
    },
    FieldRule {
        field: "last_name",
        rule: Rule::Length { min: 2, max: 100 },
        value: |u| u.last_name.as_deref(),
        record: |e, m| {
            e.last_name_error.get_or_insert(m);
        },
    },
    FieldRule {
        field: "email",
        rule: Rule::Email,
        value: |u| u.email.as_deref(),
        record: |e, m| {
            e.email_error.get_or_insert(m);
        },
    },
    FieldRule {
        field: "phone",
        rule: Rule::Length { min: 7, max: 15 },
        value: |u| u.phone.as_deref(),
        record: |e, m| {
            e.phone_error.get_or_insert(m);
        },
    },
];

/// Validate a (normalized) profile update.
pub fn validate_user_update(update: &UserUpdate) -> Result<(), UpdateValidationErrors> {
    validate(update, USER_UPDATE_RULES)
}

/// Structural email check: one `@`, a dot-atom local part (RFC 5322 `atext` segments), and a
/// dotted domain whose labels are alphanumeric or hyphens and do not start or end with a hyphen.
pub fn is_valid_email(value: &str) -> bool {
    if value.len() > 254 || value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > 64 || domain.contains('@') {
        return false;
    }
    if !local.split('.').all(|segment| !segment.is_empty() && segment.chars().all(is_atext)) {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

fn is_atext(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~-".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_syntax() {
        for ok in [
            "a@b.co",
            "first.last+tag@example.com",
            "x@sub.domain-name.org",
            "o'brien@example.ie",
            "a{b}|c~d@example.com",
        ] {
            assert!(is_valid_email(ok), "{ok} should be valid");
        }
        for bad in [
            "not-an-email",
            "@example.com",
            "user@",
            "user@localhost",
            "user@@example.com",
            "us er@example.com",
            "user@exa_mple.com",
            "user@-example.com",
            ".user@example.com",
            "user@example..com",
            "user.@example.com",
            "us..er@example.com",
            "a<b>@example.com",
            "x,y;z@example.com",
            "(c)\"@example.com",
            "[a]@example.com",
            "a\\b@example.com",
        ] {
            assert!(!is_valid_email(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn test_length_bounds_are_inclusive_and_count_chars() {
        let rule = Rule::Length { min: 2, max: 100 };
        assert!(rule.check("A").is_some());
        assert!(rule.check("Al").is_none());
        assert!(rule.check(&"x".repeat(100)).is_none());
        assert!(rule.check(&"x".repeat(101)).is_some());
        // Two characters, four bytes
        assert!(rule.check("Éé").is_none());
    }

    #[test]
    fn test_user_update_collects_every_failure() {
        let update = UserUpdate {
            name: Some("A".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("not-an-email".to_string()),
            phone: Some("123".to_string()),
            photo_url: Some("anything goes".to_string()),
        };

        let errors = validate_user_update(&update).unwrap_err();
        assert_eq!(errors.name_error.as_deref(), Some("Must be between 2 and 100 characters"));
        assert_eq!(errors.email_error.as_deref(), Some(EMAIL_MESSAGE));
        assert_eq!(errors.phone_error.as_deref(), Some("Must be between 7 and 15 characters"));
        assert!(errors.last_name_error.is_none());
        assert!(errors.password_error.is_none());
    }

    #[test]
    fn test_absent_fields_are_not_validated() {
        assert!(validate_user_update(&UserUpdate::default()).is_ok());
        let update = UserUpdate {
            phone: Some("5551234567".to_string()),
            ..Default::default()
        };
        assert!(validate_user_update(&update).is_ok());
    }
}
