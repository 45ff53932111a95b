//! Classification of single match entries.

use std::collections::BTreeMap;

use crate::domain::fields::{AddressField, BusinessField, ContactField, FieldKey, FieldMatchState};
use crate::domain::match_result::{AddressReason, BusinessReason, ContactReason, MatchField, MatchResult};

/// Inputs implicated by one entry and the severity they receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldClassification {
    pub fields: Vec<FieldKey<usize>>,
    pub severity: FieldMatchState,
}

/// Severity of a single entry: exact matches block, similar ones warn.
pub fn severity(entry: &MatchResult) -> FieldMatchState {
    if entry.fuzzy {
        FieldMatchState::Warning
    } else {
        FieldMatchState::Error
    }
}

/// Every input a reported reason marks as one unit.
pub fn implicated_fields(field: &MatchField) -> Vec<FieldKey<usize>> {
    match *field {
        MatchField::Business(reason) => {
            let fields: &[BusinessField] = match reason {
                BusinessReason::Individual => &[
                    BusinessField::FirstName,
                    BusinessField::LastName,
                    BusinessField::BirthdateYear,
                    BusinessField::BirthdateMonth,
                    BusinessField::BirthdateDay,
                ],
                BusinessReason::ClientIdentification => &[BusinessField::ClientIdentification],
                BusinessReason::RegistrationNumber => &[BusinessField::RegistrationNumber],
                BusinessReason::BusinessName => &[BusinessField::BusinessName],
                BusinessReason::ClientAcronym => &[BusinessField::ClientAcronym],
                BusinessReason::DoingBusinessAs => &[BusinessField::DoingBusinessAs],
            };
            fields.iter().copied().map(FieldKey::Business).collect()
        }
        MatchField::Address { index, reason } => {
            let fields: &[AddressField] = match reason {
                AddressReason::Address => &[
                    AddressField::StreetAddress,
                    AddressField::City,
                    AddressField::Province,
                    AddressField::Country,
                    AddressField::PostalCode,
                ],
                AddressReason::EmailAddress => &[AddressField::EmailAddress],
                AddressReason::BusinessPhoneNumber => &[AddressField::BusinessPhoneNumber],
                AddressReason::SecondaryPhoneNumber => &[AddressField::SecondaryPhoneNumber],
                AddressReason::FaxNumber => &[AddressField::FaxNumber],
            };
            fields
                .iter()
                .map(|&f| FieldKey::Address(index, f))
                .collect()
        }
        MatchField::Contact { index, reason } => {
            let fields: &[ContactField] = match reason {
                ContactReason::Name => &[ContactField::FirstName, ContactField::LastName],
                ContactReason::Email => &[ContactField::Email],
                ContactReason::PhoneNumber => &[ContactField::PhoneNumber],
                ContactReason::SecondaryPhoneNumber => &[ContactField::SecondaryPhoneNumber],
                ContactReason::FaxNumber => &[ContactField::FaxNumber],
            };
            fields
                .iter()
                .map(|&f| FieldKey::Contact(index, f))
                .collect()
        }
    }
}

pub fn classify(entry: &MatchResult) -> FieldClassification {
    FieldClassification {
        fields: implicated_fields(&entry.field),
        severity: severity(entry),
    }
}

/// Rendered state of every implicated input. The most severe entry wins.
pub fn field_states<'a, I>(entries: I) -> BTreeMap<FieldKey<usize>, FieldMatchState>
where
    I: IntoIterator<Item = &'a MatchResult>,
{
    let mut states = BTreeMap::new();
    for entry in entries {
        let classification = classify(entry);
        for key in classification.fields {
            let state = states.entry(key).or_insert(FieldMatchState::Clean);
            *state = (*state).max(classification.severity);
        }
    }
    states
}
