//! Wizard steps and the identifiers of every matchable form input.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::types::TypeConstraintError;

/// One page of the registration wizard.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WizardStep {
    BusinessInformation,
    Locations,
    Contacts,
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::BusinessInformation,
        WizardStep::Locations,
        WizardStep::Contacts,
        WizardStep::Review,
    ];

    /// One-based step number used on the matching endpoint.
    pub fn number(self) -> u8 {
        match self {
            WizardStep::BusinessInformation => 1,
            WizardStep::Locations => 2,
            WizardStep::Contacts => 3,
            WizardStep::Review => 4,
        }
    }

    pub fn from_number(number: u8) -> Result<Self, TypeConstraintError> {
        Self::ALL
            .into_iter()
            .find(|step| step.number() == number)
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown step {number}")))
    }

    /// Whether advancing from this step requires a match check.
    pub fn is_matchable(self) -> bool {
        !matches!(self, WizardStep::Review)
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1).ok()
    }

    pub fn previous(self) -> Option<Self> {
        self.number()
            .checked_sub(1)
            .and_then(|n| Self::from_number(n).ok())
    }

    /// Whether a field belongs to the inputs rendered on this step.
    pub fn owns<S>(self, key: &FieldKey<S>) -> bool {
        matches!(
            (self, key),
            (WizardStep::BusinessInformation, FieldKey::Business(_))
                | (WizardStep::Locations, FieldKey::Address(..))
                | (WizardStep::Contacts, FieldKey::Contact(..))
        )
    }
}

/// Matching severity rendered on a single input.
///
/// Ordered so that the most severe state wins when results overlap.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldMatchState {
    #[default]
    Clean,
    Warning,
    Error,
}

macro_rules! field_enum {
    ($name:ident, $doc:expr, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// camelCase name used in dotted field paths.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

field_enum!(BusinessField, "Inputs of the business information step.", {
    ClientType => "clientType",
    FirstName => "firstName",
    LastName => "lastName",
    BirthdateYear => "birthdateYear",
    BirthdateMonth => "birthdateMonth",
    BirthdateDay => "birthdateDay",
    IdentificationType => "identificationType",
    IdentificationProvince => "identificationProvince",
    ClientIdentification => "clientIdentification",
    RegistrationNumber => "registrationNumber",
    BusinessName => "businessName",
    ClientAcronym => "clientAcronym",
    DoingBusinessAs => "doingBusinessAs",
});

field_enum!(AddressField, "Inputs of one location section.", {
    LocationName => "locationName",
    StreetAddress => "streetAddress",
    City => "city",
    Province => "province",
    Country => "country",
    PostalCode => "postalCode",
    EmailAddress => "emailAddress",
    BusinessPhoneNumber => "businessPhoneNumber",
    SecondaryPhoneNumber => "secondaryPhoneNumber",
    FaxNumber => "faxNumber",
    Notes => "notes",
});

field_enum!(ContactField, "Inputs of one contact section.", {
    ContactType => "contactType",
    FirstName => "firstName",
    LastName => "lastName",
    Email => "email",
    PhoneNumber => "phoneNumber",
    SecondaryPhoneNumber => "secondaryPhoneNumber",
    FaxNumber => "faxNumber",
});

/// Identifier of one rendered input.
///
/// `S` is how a repeatable section is referenced: the display index while a
/// key travels with a match response, the stable [`SectionId`] once it lands
/// in the wizard store.
///
/// [`SectionId`]: crate::domain::types::SectionId
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldKey<S> {
    Business(BusinessField),
    Address(S, AddressField),
    Contact(S, ContactField),
}

impl<S: Copy> FieldKey<S> {
    /// The section reference carried by the key, if any.
    pub fn section(&self) -> Option<S> {
        match self {
            FieldKey::Business(_) => None,
            FieldKey::Address(section, _) | FieldKey::Contact(section, _) => Some(*section),
        }
    }

    /// Rewrites the section reference, failing when `f` cannot resolve it.
    pub fn try_map_section<T>(self, f: impl FnOnce(S) -> Option<T>) -> Option<FieldKey<T>> {
        match self {
            FieldKey::Business(field) => Some(FieldKey::Business(field)),
            FieldKey::Address(section, field) => f(section).map(|s| FieldKey::Address(s, field)),
            FieldKey::Contact(section, field) => f(section).map(|s| FieldKey::Contact(s, field)),
        }
    }
}

impl Display for FieldKey<usize> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKey::Business(field) => write!(f, "businessInformation.{field}"),
            FieldKey::Address(index, field) => write!(f, "location.addresses[{index}].{field}"),
            FieldKey::Contact(index, field) => write!(f, "location.contacts[{index}].{field}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_navigate_in_order() {
        assert_eq!(
            WizardStep::BusinessInformation.next(),
            Some(WizardStep::Locations)
        );
        assert_eq!(WizardStep::Review.next(), None);
        assert_eq!(WizardStep::BusinessInformation.previous(), None);
        assert_eq!(WizardStep::Contacts.previous(), Some(WizardStep::Locations));
        assert!(!WizardStep::Review.is_matchable());
        assert!(WizardStep::from_number(0).is_err());
    }

    #[test]
    fn field_states_order_by_severity() {
        assert!(FieldMatchState::Error > FieldMatchState::Warning);
        assert!(FieldMatchState::Warning > FieldMatchState::Clean);
        assert_eq!(
            [FieldMatchState::Warning, FieldMatchState::Error]
                .into_iter()
                .max(),
            Some(FieldMatchState::Error)
        );
    }

    #[test]
    fn field_key_displays_dotted_path() {
        let key: FieldKey<usize> = FieldKey::Address(1, AddressField::EmailAddress);
        assert_eq!(key.to_string(), "location.addresses[1].emailAddress");
        let key: FieldKey<usize> = FieldKey::Business(BusinessField::BirthdateDay);
        assert_eq!(key.to_string(), "businessInformation.birthdateDay");
    }

    #[test]
    fn step_owns_only_its_fields() {
        let contact: FieldKey<usize> = FieldKey::Contact(0, ContactField::Email);
        assert!(WizardStep::Contacts.owns(&contact));
        assert!(!WizardStep::Locations.owns(&contact));
    }
}
