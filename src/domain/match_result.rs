//! Entries returned by the matching endpoint.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::fields::WizardStep;
use crate::domain::types::{ClientNumber, TypeConstraintError};

/// Reasons reported against the business information step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BusinessReason {
    /// Same individual name and birthdate.
    Individual,
    ClientIdentification,
    RegistrationNumber,
    BusinessName,
    ClientAcronym,
    DoingBusinessAs,
}

/// Reasons reported against one location section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressReason {
    /// The full address, reported on `streetAddress`.
    Address,
    EmailAddress,
    BusinessPhoneNumber,
    SecondaryPhoneNumber,
    FaxNumber,
}

/// Reasons reported against one contact section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContactReason {
    /// First and last name, reported on `firstName`.
    Name,
    Email,
    PhoneNumber,
    SecondaryPhoneNumber,
    FaxNumber,
}

/// Parsed `field` path of a [`MatchResult`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum MatchField {
    Business(BusinessReason),
    Address { index: usize, reason: AddressReason },
    Contact { index: usize, reason: ContactReason },
}

impl BusinessReason {
    fn as_str(self) -> &'static str {
        match self {
            BusinessReason::Individual => "individual",
            BusinessReason::ClientIdentification => "clientIdentification",
            BusinessReason::RegistrationNumber => "registrationNumber",
            BusinessReason::BusinessName => "businessName",
            BusinessReason::ClientAcronym => "clientAcronym",
            BusinessReason::DoingBusinessAs => "doingBusinessAs",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [
            BusinessReason::Individual,
            BusinessReason::ClientIdentification,
            BusinessReason::RegistrationNumber,
            BusinessReason::BusinessName,
            BusinessReason::ClientAcronym,
            BusinessReason::DoingBusinessAs,
        ]
        .into_iter()
        .find(|reason| reason.as_str() == value)
    }
}

impl AddressReason {
    fn as_str(self) -> &'static str {
        match self {
            AddressReason::Address => "streetAddress",
            AddressReason::EmailAddress => "emailAddress",
            AddressReason::BusinessPhoneNumber => "businessPhoneNumber",
            AddressReason::SecondaryPhoneNumber => "secondaryPhoneNumber",
            AddressReason::FaxNumber => "faxNumber",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [
            AddressReason::Address,
            AddressReason::EmailAddress,
            AddressReason::BusinessPhoneNumber,
            AddressReason::SecondaryPhoneNumber,
            AddressReason::FaxNumber,
        ]
        .into_iter()
        .find(|reason| reason.as_str() == value)
    }
}

impl ContactReason {
    fn as_str(self) -> &'static str {
        match self {
            ContactReason::Name => "firstName",
            ContactReason::Email => "email",
            ContactReason::PhoneNumber => "phoneNumber",
            ContactReason::SecondaryPhoneNumber => "secondaryPhoneNumber",
            ContactReason::FaxNumber => "faxNumber",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        [
            ContactReason::Name,
            ContactReason::Email,
            ContactReason::PhoneNumber,
            ContactReason::SecondaryPhoneNumber,
            ContactReason::FaxNumber,
        ]
        .into_iter()
        .find(|reason| reason.as_str() == value)
    }
}

impl MatchField {
    /// The wizard step whose inputs this reason points at.
    pub fn step(&self) -> WizardStep {
        match self {
            MatchField::Business(_) => WizardStep::BusinessInformation,
            MatchField::Address { .. } => WizardStep::Locations,
            MatchField::Contact { .. } => WizardStep::Contacts,
        }
    }

    /// Display index of the section the reason belongs to, if any.
    pub fn section_index(&self) -> Option<usize> {
        match self {
            MatchField::Business(_) => None,
            MatchField::Address { index, .. } | MatchField::Contact { index, .. } => Some(*index),
        }
    }
}

/// Splits `addresses[3].emailAddress` into `(3, "emailAddress")`.
fn indexed(rest: &str, collection: &str) -> Option<(usize, String)> {
    let rest = rest.strip_prefix(collection)?.strip_prefix('[')?;
    let (index, tail) = rest.split_once(']')?;
    let name = tail.strip_prefix('.')?;
    Some((index.parse().ok()?, name.to_string()))
}

impl FromStr for MatchField {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || TypeConstraintError::InvalidValue(format!("unknown match field `{s}`"));

        if let Some(name) = s.strip_prefix("businessInformation.") {
            return BusinessReason::parse(name)
                .map(MatchField::Business)
                .ok_or_else(unknown);
        }

        let rest = s.strip_prefix("location.").ok_or_else(unknown)?;
        if let Some((index, name)) = indexed(rest, "addresses") {
            let reason = AddressReason::parse(&name).ok_or_else(unknown)?;
            return Ok(MatchField::Address { index, reason });
        }
        if let Some((index, name)) = indexed(rest, "contacts") {
            let reason = ContactReason::parse(&name).ok_or_else(unknown)?;
            return Ok(MatchField::Contact { index, reason });
        }
        Err(unknown())
    }
}

impl Display for MatchField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchField::Business(reason) => write!(f, "businessInformation.{}", reason.as_str()),
            MatchField::Address { index, reason } => {
                write!(f, "location.addresses[{index}].{}", reason.as_str())
            }
            MatchField::Contact { index, reason } => {
                write!(f, "location.contacts[{index}].{}", reason.as_str())
            }
        }
    }
}

impl TryFrom<String> for MatchField {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MatchField> for String {
    fn from(value: MatchField) -> Self {
        value.to_string()
    }
}

/// One matched reason against one or more existing clients.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchResult {
    pub field: MatchField,
    /// Comma-separated client numbers on the wire.
    #[serde(rename = "match", with = "client_number_list")]
    pub client_numbers: Vec<ClientNumber>,
    /// `true` for a similar value, `false` for an identical one.
    pub fuzzy: bool,
}

impl MatchResult {
    pub fn new(field: MatchField, client_numbers: Vec<ClientNumber>, fuzzy: bool) -> Self {
        Self {
            field,
            client_numbers,
            fuzzy,
        }
    }

    pub fn exact(field: MatchField, client_numbers: Vec<ClientNumber>) -> Self {
        Self::new(field, client_numbers, false)
    }

    pub fn fuzzy(field: MatchField, client_numbers: Vec<ClientNumber>) -> Self {
        Self::new(field, client_numbers, true)
    }
}

mod client_number_list {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::domain::types::ClientNumber;

    pub fn serialize<S: Serializer>(numbers: &[ClientNumber], serializer: S) -> Result<S::Ok, S::Error> {
        let joined = numbers
            .iter()
            .map(ClientNumber::as_str)
            .collect::<Vec<_>>()
            .join(",");
        serializer.serialize_str(&joined)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<ClientNumber>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let numbers = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| ClientNumber::new(s).map_err(D::Error::custom))
            .collect::<Result<Vec<_>, _>>()?;
        if numbers.is_empty() {
            return Err(D::Error::custom("match entry without client numbers"));
        }
        Ok(numbers)
    }
}
