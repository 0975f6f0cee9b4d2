//! # Password Strength
//!
//! Sign up and password reset share one fixed rule set:
//!
//! - At least 8 characters
//! - At least one lowercase letter
//! - At least one uppercase letter
//! - At least one digit
//! - At least one symbol out of `@$!%*?&`
//!
//! Characters outside these classes are allowed, they just do not count
//! towards any requirement. The message shown to the user is fixed and
//! bilingual, the UI does not build its own from the missing requirements.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const MIN_LENGTH: usize = 8;
pub const SYMBOLS: &str = "@$!%*?&";

pub const PASSWORD_MESSAGE: &str = "A senha deve ter no mínimo 8 caracteres, incluindo letra maiúscula, \
letra minúscula, número e caractere especial (@$!%*?&). / Password must be at least 8 characters long \
and include an uppercase letter, a lowercase letter, a number and a special character (@$!%*?&).";

static LOWERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-z]").unwrap());
static UPPERCASE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Z]").unwrap());
static DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").unwrap());
static SYMBOL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[@$!%*?&]").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    MinLength,
    Lowercase,
    Uppercase,
    Digit,
    Symbol,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{PASSWORD_MESSAGE}")]
pub struct WeakPassword {
    pub missing: Vec<Requirement>,
}

impl WeakPassword {
    pub fn message(&self) -> &'static str {
        PASSWORD_MESSAGE
    }
}

pub fn validate_password(password: &str) -> Result<(), WeakPassword> {
    let missing: Vec<Requirement> = [
        (password.chars().count() >= MIN_LENGTH, Requirement::MinLength),
        (LOWERCASE.is_match(password), Requirement::Lowercase),
        (UPPERCASE.is_match(password), Requirement::Uppercase),
        (DIGIT.is_match(password), Requirement::Digit),
        (SYMBOL.is_match(password), Requirement::Symbol),
    ]
    .into_iter()
    .filter_map(|(met, requirement)| (!met).then_some(requirement))
    .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(WeakPassword { missing })
    }
}
