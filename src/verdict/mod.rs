//! Turns the entries of one match response into what the wizard renders:
//! per-field states, a step verdict and per-section notifications.

use thiserror::Error;

use crate::domain::fields::WizardStep;
use crate::domain::match_result::MatchField;

pub mod field;
pub mod step;

pub use field::{FieldClassification, classify, field_states};
pub use step::{SectionVerdict, StepMatchReport, StepVerdict, VerdictKind, aggregate};

/// A response that does not fit the step it was requested for.
///
/// Treated exactly like a failed request: the step stays blocked.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("match on `{field}` does not belong to step {step:?}")]
    OutOfScope { field: MatchField, step: WizardStep },

    #[error("match on `{field}` points past the {count} submitted sections")]
    SectionOutOfRange { field: MatchField, count: usize },
}

/// Human readable name of the input a reason was reported on.
pub(crate) fn reason_label(field: &MatchField) -> &'static str {
    use crate::domain::match_result::{AddressReason, BusinessReason, ContactReason};

    match field {
        MatchField::Business(reason) => match reason {
            BusinessReason::Individual => "name and birthdate",
            BusinessReason::ClientIdentification => "identification number",
            BusinessReason::RegistrationNumber => "registration number",
            BusinessReason::BusinessName => "business name",
            BusinessReason::ClientAcronym => "acronym",
            BusinessReason::DoingBusinessAs => "doing business as name",
        },
        MatchField::Address { reason, .. } => match reason {
            AddressReason::Address => "address",
            AddressReason::EmailAddress => "email address",
            AddressReason::BusinessPhoneNumber => "primary phone number",
            AddressReason::SecondaryPhoneNumber => "secondary phone number",
            AddressReason::FaxNumber => "fax number",
        },
        MatchField::Contact { reason, .. } => match reason {
            ContactReason::Name => "contact name",
            ContactReason::Email => "contact email address",
            ContactReason::PhoneNumber => "contact phone number",
            ContactReason::SecondaryPhoneNumber => "contact secondary phone number",
            ContactReason::FaxNumber => "contact fax number",
        },
    }
}

