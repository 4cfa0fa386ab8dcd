use std::fmt;

use cancha_core::BookingRequest;
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Form fields a validation error can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingField {
    Date,
    Time,
    Players,
    ContactName,
    ContactPhone,
    ContactEmail,
    TermsAccepted,
}

impl BookingField {
    /// Every field, in form order. Validation walks this table.
    pub const ALL: [BookingField; 7] = [
        BookingField::Date,
        BookingField::Time,
        BookingField::Players,
        BookingField::ContactName,
        BookingField::ContactPhone,
        BookingField::ContactEmail,
        BookingField::TermsAccepted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingField::Date => "date",
            BookingField::Time => "time",
            BookingField::Players => "players",
            BookingField::ContactName => "contact_name",
            BookingField::ContactPhone => "contact_phone",
            BookingField::ContactEmail => "contact_email",
            BookingField::TermsAccepted => "terms_accepted",
        }
    }
}

impl fmt::Display for BookingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationErrorKind {
    Required,
    OutOfRange,
    InvalidFormat,
    NotAccepted,
}

/// One user-correctable problem with a booking form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: BookingField,
    pub kind: ValidationErrorKind,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: BookingField, kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            field,
            kind,
            message: message.into(),
        }
    }
}

/// Checks a booking form before any slot is touched.
///
/// Every failing field is reported, not just the first.
#[derive(Debug, Clone)]
pub struct BookingRequestValidator {
    min_players: i32,
    max_players: i32,
}

impl Default for BookingRequestValidator {
    fn default() -> Self {
        Self {
            min_players: 1,
            max_players: 22,
        }
    }
}

impl BookingRequestValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validate(&self, request: &BookingRequest) -> Result<(), Vec<ValidationError>> {
        let errors: Vec<ValidationError> = BookingField::ALL
            .iter()
            .filter_map(|field| {
                self.check(*field, request)
                    .err()
                    .map(|kind| ValidationError::new(*field, kind, self.message(*field, kind)))
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn check(&self, field: BookingField, request: &BookingRequest) -> Result<(), ValidationErrorKind> {
        match field {
            BookingField::Date => required(&request.date),
            BookingField::Time => required(&request.time),
            BookingField::Players => {
                if (self.min_players..=self.max_players).contains(&request.players) {
                    Ok(())
                } else {
                    Err(ValidationErrorKind::OutOfRange)
                }
            }
            BookingField::ContactName => required(&request.contact_name),
            BookingField::ContactPhone => {
                required(&request.contact_phone)?;
                if is_phone_number(&request.contact_phone) {
                    Ok(())
                } else {
                    Err(ValidationErrorKind::InvalidFormat)
                }
            }
            BookingField::ContactEmail => {
                required(&request.contact_email)?;
                if request.contact_email.validate_email() {
                    Ok(())
                } else {
                    Err(ValidationErrorKind::InvalidFormat)
                }
            }
            BookingField::TermsAccepted => {
                if request.terms_accepted {
                    Ok(())
                } else {
                    Err(ValidationErrorKind::NotAccepted)
                }
            }
        }
    }

    fn message(&self, field: BookingField, kind: ValidationErrorKind) -> String {
        match (field, kind) {
            (BookingField::Date, _) => "Select a date".to_string(),
            (BookingField::Time, _) => "Select a time".to_string(),
            (BookingField::Players, _) => format!(
                "Number of players must be between {} and {}",
                self.min_players, self.max_players
            ),
            (BookingField::ContactName, _) => "Name is required".to_string(),
            (BookingField::ContactPhone, ValidationErrorKind::Required) => "Phone is required".to_string(),
            (BookingField::ContactPhone, _) => "Invalid phone number".to_string(),
            (BookingField::ContactEmail, ValidationErrorKind::Required) => "Email is required".to_string(),
            (BookingField::ContactEmail, _) => "Invalid email address".to_string(),
            (BookingField::TermsAccepted, _) => "You must accept the terms and conditions".to_string(),
        }
    }
}

/// Blank counts as missing
fn required(value: &str) -> Result<(), ValidationErrorKind> {
    if value.trim().is_empty() {
        Err(ValidationErrorKind::Required)
    } else {
        Ok(())
    }
}

/// Digits, `+`, `-` and whitespace only
fn is_phone_number(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || c == '+' || c == '-' || c.is_whitespace())
}
