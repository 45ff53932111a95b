//! Raw values the user typed into the wizard.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::candidate::{
    AddressInput, BusinessInformation, ContactInput, LocationInformation, MatchCandidateInput,
};
use crate::domain::fields::{AddressField, BusinessField, ContactField, FieldKey, WizardStep};
use crate::domain::types::{SectionId, non_blank};
use crate::wizard::arena::SectionArena;

pub type SectionValues<F> = BTreeMap<F, String>;

/// Form state of one registration, including every repeatable section.
///
/// Values are kept exactly as typed; blanks are dropped only when a match
/// candidate is built.
#[derive(Debug, Clone, Default)]
pub struct ClientForm {
    business: SectionValues<BusinessField>,
    addresses: SectionArena<SectionValues<AddressField>>,
    contacts: SectionArena<SectionValues<ContactField>>,
}

impl ClientForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, key: &FieldKey<SectionId>) -> Option<&str> {
        match key {
            FieldKey::Business(field) => self.business.get(field),
            FieldKey::Address(id, field) => self.addresses.get(*id)?.get(field),
            FieldKey::Contact(id, field) => self.contacts.get(*id)?.get(field),
        }
        .map(String::as_str)
    }

    /// Stores a value. Returns `false` when the key points at a removed
    /// section.
    pub fn set(&mut self, key: FieldKey<SectionId>, value: impl Into<String>) -> bool {
        let value = value.into();
        match key {
            FieldKey::Business(field) => {
                self.business.insert(field, value);
                true
            }
            FieldKey::Address(id, field) => match self.addresses.get_mut(id) {
                Some(section) => {
                    section.insert(field, value);
                    true
                }
                None => false,
            },
            FieldKey::Contact(id, field) => match self.contacts.get_mut(id) {
                Some(section) => {
                    section.insert(field, value);
                    true
                }
                None => false,
            },
        }
    }

    pub fn add_address(&mut self) -> SectionId {
        self.addresses.add(SectionValues::new())
    }

    pub fn remove_address(&mut self, id: SectionId) -> bool {
        self.addresses.remove(id).is_some()
    }

    pub fn add_contact(&mut self) -> SectionId {
        self.contacts.add(SectionValues::new())
    }

    pub fn remove_contact(&mut self, id: SectionId) -> bool {
        self.contacts.remove(id).is_some()
    }

    pub fn addresses(&self) -> &SectionArena<SectionValues<AddressField>> {
        &self.addresses
    }

    pub fn contacts(&self) -> &SectionArena<SectionValues<ContactField>> {
        &self.contacts
    }

    /// Ids of the repeatable sections rendered on `step`, in display order.
    pub fn section_ids(&self, step: WizardStep) -> Vec<SectionId> {
        match step {
            WizardStep::Locations => self.addresses.ids(),
            WizardStep::Contacts => self.contacts.ids(),
            WizardStep::BusinessInformation | WizardStep::Review => Vec::new(),
        }
    }

    /// Maps a display index of `step` to the section currently shown there.
    pub fn resolve(&self, key: FieldKey<usize>) -> Option<FieldKey<SectionId>> {
        key.try_map_section(|index| match key {
            FieldKey::Address(..) => self.addresses.id_at(index),
            FieldKey::Contact(..) => self.contacts.id_at(index),
            FieldKey::Business(_) => None,
        })
    }

    fn business_value(&self, field: BusinessField) -> Option<String> {
        non_blank(self.business.get(&field).map(String::as_str)).map(str::to_string)
    }

    /// Birthdate assembled from its year, month and day inputs.
    pub fn birthdate(&self) -> Option<NaiveDate> {
        let year: i32 = self.business_value(BusinessField::BirthdateYear)?.parse().ok()?;
        let month: u32 = self.business_value(BusinessField::BirthdateMonth)?.parse().ok()?;
        let day: u32 = self.business_value(BusinessField::BirthdateDay)?.parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn business_information(&self) -> BusinessInformation {
        let value = |field| self.business_value(field);
        BusinessInformation {
            client_type: value(BusinessField::ClientType).and_then(|code| code.parse().ok()),
            first_name: value(BusinessField::FirstName),
            last_name: value(BusinessField::LastName),
            birthdate: self.birthdate(),
            identification_type: value(BusinessField::IdentificationType),
            identification_province: value(BusinessField::IdentificationProvince),
            client_identification: value(BusinessField::ClientIdentification),
            registration_number: value(BusinessField::RegistrationNumber),
            business_name: value(BusinessField::BusinessName),
            client_acronym: value(BusinessField::ClientAcronym),
            doing_business_as: value(BusinessField::DoingBusinessAs),
        }
    }

    /// Builds a fresh candidate holding only what `step` matches on, together
    /// with the section ids behind each submitted display index.
    pub fn candidate_for(&self, step: WizardStep) -> (MatchCandidateInput, Vec<SectionId>) {
        let addresses = self
            .addresses
            .iter()
            .map(|(_, values)| address_input(values))
            .collect();
        let contacts = self
            .contacts
            .iter()
            .map(|(_, values)| contact_input(values))
            .collect();
        let candidate = MatchCandidateInput {
            business_information: self.business_information(),
            location: LocationInformation {
                addresses,
                contacts,
            },
        };
        (candidate.subset_for(step), self.section_ids(step))
    }
}

fn text<F: Ord>(values: &SectionValues<F>, field: F) -> Option<String> {
    non_blank(values.get(&field).map(String::as_str)).map(str::to_string)
}

fn address_input(values: &SectionValues<AddressField>) -> AddressInput {
    AddressInput {
        location_name: text(values, AddressField::LocationName),
        street_address: text(values, AddressField::StreetAddress),
        city: text(values, AddressField::City),
        province: text(values, AddressField::Province),
        country: text(values, AddressField::Country),
        postal_code: text(values, AddressField::PostalCode),
        email_address: text(values, AddressField::EmailAddress),
        business_phone_number: text(values, AddressField::BusinessPhoneNumber),
        secondary_phone_number: text(values, AddressField::SecondaryPhoneNumber),
        fax_number: text(values, AddressField::FaxNumber),
    }
}

fn contact_input(values: &SectionValues<ContactField>) -> ContactInput {
    ContactInput {
        contact_type: text(values, ContactField::ContactType),
        first_name: text(values, ContactField::FirstName),
        last_name: text(values, ContactField::LastName),
        email: text(values, ContactField::Email),
        phone_number: text(values, ContactField::PhoneNumber),
        secondary_phone_number: text(values, ContactField::SecondaryPhoneNumber),
        fax_number: text(values, ContactField::FaxNumber),
    }
}
