//! Domain models that mirror the `students` table. These stay plain data
//! holders; validation of user input happens once, when a `NewStudent` is
//! built, so the persistence layer can trust what it receives.

use std::fmt;

use thiserror::Error;

/// A single student row as stored in SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    /// Primary key. Edit and delete flows hand this back to the database.
    pub id: i64,
    pub name: String,
    pub course: String,
    /// Kept as text so leading zeros and `+` prefixes survive.
    pub mobile: String,
}

impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.course)
    }
}

/// Validated payload for inserts and updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub course: String,
    pub mobile: String,
}

/// Reasons a student form can be rejected. The messages are rendered
/// verbatim in the dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Student name is required.")]
    MissingName,
    #[error("Course is required.")]
    MissingCourse,
    #[error("Mobile number is required.")]
    MissingMobile,
    #[error("Mobile number may only contain digits, spaces, '-', '(', ')' and a leading '+'.")]
    InvalidMobile,
}

impl NewStudent {
    /// Trim and validate raw form input.
    pub fn new(name: &str, course: &str, mobile: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        let course = course.trim();
        if course.is_empty() {
            return Err(ValidationError::MissingCourse);
        }
        let mobile = mobile.trim();
        if mobile.is_empty() {
            return Err(ValidationError::MissingMobile);
        }
        if !is_valid_mobile(mobile) {
            return Err(ValidationError::InvalidMobile);
        }

        Ok(Self {
            name: name.to_string(),
            course: course.to_string(),
            mobile: mobile.to_string(),
        })
    }
}

fn is_valid_mobile(mobile: &str) -> bool {
    let body = mobile.strip_prefix('+').unwrap_or(mobile);
    body.chars().any(|ch| ch.is_ascii_digit())
        && body
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, ' ' | '-' | '(' | ')'))
}
