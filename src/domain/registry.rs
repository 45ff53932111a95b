//! Existing clients the matcher compares a candidate against.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    ClientNumber, ClientType, normalize_email, normalize_identifier, normalize_name,
    normalize_phone, normalize_postal_code,
};

/// Normalised lookup key of an optional identifier column.
fn identifier_key(value: Option<&str>) -> Option<String> {
    value.map(normalize_identifier).filter(|s| !s.is_empty())
}

/// Normalised lookup key of an optional phone column.
pub fn phone_key(value: Option<&str>) -> Option<String> {
    value.and_then(|phone| normalize_phone(phone).ok())
}

/// Normalised lookup key of an optional email column.
pub fn email_key(value: Option<&str>) -> Option<String> {
    value.and_then(|email| normalize_email(email).ok())
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisteredClient {
    pub client_number: ClientNumber,
    pub client_type: ClientType,
    /// Legal name for organisations, last name for individuals.
    pub client_name: String,
    pub legal_first_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub identification_type: Option<String>,
    pub client_identification: Option<String>,
    pub client_acronym: Option<String>,
    pub doing_business_as: Option<String>,
}

impl RegisteredClient {
    pub fn registration_key(&self) -> Option<String> {
        identifier_key(self.registration_number.as_deref())
    }

    pub fn identification_key(&self) -> Option<String> {
        identifier_key(self.client_identification.as_deref())
    }

    pub fn acronym_key(&self) -> Option<String> {
        identifier_key(self.client_acronym.as_deref())
    }

    pub fn doing_business_as_key(&self) -> Option<String> {
        self.doing_business_as
            .as_deref()
            .map(normalize_name)
            .filter(|s| !s.is_empty())
    }

    /// Normalised "first last" for individuals, normalised legal name otherwise.
    pub fn full_name_key(&self) -> String {
        match &self.legal_first_name {
            Some(first) => normalize_name(&format!("{first} {}", self.client_name)),
            None => normalize_name(&self.client_name),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisteredLocation {
    pub client_number: ClientNumber,
    pub location_name: String,
    pub street_address: String,
    pub city: String,
    pub province: Option<String>,
    pub country: String,
    pub postal_code: String,
    pub email_address: Option<String>,
    pub business_phone_number: Option<String>,
    pub secondary_phone_number: Option<String>,
    pub fax_number: Option<String>,
}

impl RegisteredLocation {
    pub fn email_key(&self) -> Option<String> {
        email_key(self.email_address.as_deref())
    }

    pub fn postal_code_key(&self) -> String {
        normalize_postal_code(&self.postal_code)
    }

    /// Phone keys of every number recorded for the location.
    pub fn phone_keys(&self) -> Vec<String> {
        [
            &self.business_phone_number,
            &self.secondary_phone_number,
            &self.fax_number,
        ]
        .into_iter()
        .filter_map(|phone| phone_key(phone.as_deref()))
        .collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisteredContact {
    pub client_number: ClientNumber,
    pub contact_type: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub secondary_phone_number: Option<String>,
    pub fax_number: Option<String>,
}

impl RegisteredContact {
    pub fn name_key(&self) -> String {
        normalize_name(&format!("{} {}", self.first_name, self.last_name))
    }

    pub fn email_key(&self) -> Option<String> {
        email_key(self.email.as_deref())
    }

    /// Phone keys of every number recorded for the contact.
    pub fn phone_keys(&self) -> Vec<String> {
        [
            &self.phone_number,
            &self.secondary_phone_number,
            &self.fax_number,
        ]
        .into_iter()
        .filter_map(|phone| phone_key(phone.as_deref()))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn individual() -> RegisteredClient {
        RegisteredClient {
            client_number: ClientNumber::new("1").unwrap(),
            client_type: ClientType::Individual,
            client_name: "BAXTER".to_string(),
            legal_first_name: Some("James".to_string()),
            birthdate: NaiveDate::from_ymd_opt(1959, 5, 18),
            registration_number: None,
            identification_type: Some("BCDL".to_string()),
            client_identification: Some(" 1234 567 ".to_string()),
            client_acronym: None,
            doing_business_as: None,
        }
    }

    #[test]
    fn full_name_key_joins_first_and_last() {
        assert_eq!(individual().full_name_key(), "james baxter");
    }

    #[test]
    fn client_keys_normalise_identifiers() {
        let client = individual();
        assert_eq!(client.identification_key().as_deref(), Some("1234567"));
        assert_eq!(client.registration_key(), None);
    }

    #[test]
    fn contact_phone_keys_skip_missing_numbers() {
        let contact = RegisteredContact {
            client_number: ClientNumber::new("1").unwrap(),
            contact_type: None,
            first_name: "Ann".to_string(),
            last_name: "Lee".to_string(),
            email: Some("ANN@example.com".to_string()),
            phone_number: Some("250 555 0101".to_string()),
            secondary_phone_number: None,
            fax_number: Some("   ".to_string()),
        };
        assert_eq!(contact.phone_keys().len(), 1);
        assert_eq!(contact.email_key().as_deref(), Some("ann@example.com"));
    }
}
