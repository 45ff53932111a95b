//! Strongly-typed value objects and normalisation helpers.
//!
//! Values read from the registry or parsed from a match response are wrapped
//! here so that the rest of the crate can compare them without re-checking
//! their shape. The `normalize_*` helpers produce the lookup keys both the
//! registry and the matcher agree on.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use phonenumber::{Mode, country, parse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::ValidateEmail;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided email failed format validation.
    #[error("invalid email address")]
    InvalidEmail,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Client numbers are at most eight ASCII digits.
    #[error("invalid client number: {0}")]
    InvalidClientNumber(String),
    /// Phone number did not meet expected format.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

const CLIENT_NUMBER_WIDTH: usize = 8;

/// Identifier of a client already present in the registry.
///
/// Stored zero-padded to eight digits, which is how client numbers are shown
/// to users and returned by the matching endpoint.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ClientNumber(String);

impl ClientNumber {
    /// Validates the digits and pads them to the canonical width.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if trimmed.len() > CLIENT_NUMBER_WIDTH || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(TypeConstraintError::InvalidClientNumber(trimmed.to_string()));
        }
        Ok(Self(format!(
            "{:0>width$}",
            trimmed,
            width = CLIENT_NUMBER_WIDTH
        )))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ClientNumber {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ClientNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientNumber> for String {
    fn from(value: ClientNumber) -> Self {
        value.0
    }
}

/// Stable identity of a repeatable wizard section (a location or a contact).
///
/// Display indexes shift when a section is removed; ids never do.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SectionId(u32);

impl SectionId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Display for SectionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of client as registered in the ministry registry.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ClientType {
    #[serde(rename = "I")]
    Individual,
    #[serde(rename = "C")]
    Corporation,
    #[serde(rename = "S")]
    Society,
    #[serde(rename = "P")]
    Partnership,
    #[serde(rename = "RSP")]
    SoleProprietorship,
    #[serde(rename = "U")]
    Unregistered,
}

impl ClientType {
    pub fn code(self) -> &'static str {
        match self {
            ClientType::Individual => "I",
            ClientType::Corporation => "C",
            ClientType::Society => "S",
            ClientType::Partnership => "P",
            ClientType::SoleProprietorship => "RSP",
            ClientType::Unregistered => "U",
        }
    }
}

impl FromStr for ClientType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "I" => Ok(ClientType::Individual),
            "C" => Ok(ClientType::Corporation),
            "S" => Ok(ClientType::Society),
            "P" => Ok(ClientType::Partnership),
            "RSP" => Ok(ClientType::SoleProprietorship),
            "U" => Ok(ClientType::Unregistered),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown client type `{other}`"
            ))),
        }
    }
}

/// Normalizes and validates an email string.
pub fn normalize_email(email: &str) -> Result<String, TypeConstraintError> {
    let normalized = email.trim().to_lowercase();
    if normalized.validate_email() {
        Ok(normalized)
    } else {
        Err(TypeConstraintError::InvalidEmail)
    }
}

/// Normalizes a phone number to E.164, assuming a Canadian number when no
/// country code is given. Numbers the parser rejects fall back to their digits
/// so that partially formatted input still compares.
pub fn normalize_phone(value: &str) -> Result<String, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    if let Ok(parsed) = parse(Some(country::Id::CA), trimmed) {
        return Ok(parsed.format().mode(Mode::E164).to_string());
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        Err(TypeConstraintError::InvalidPhone)
    } else {
        Ok(digits)
    }
}

/// Lower-cases, drops punctuation and collapses whitespace.
pub fn normalize_name(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() {
                c.to_lowercase().next().unwrap_or(c)
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Upper-cases and strips whitespace from a postal or zip code.
pub fn normalize_postal_code(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Upper-cases and strips whitespace from a registration or identification
/// number.
pub fn normalize_identifier(value: &str) -> String {
    normalize_postal_code(value)
}

/// Returns the trimmed value when it carries any content.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
