//! Payload submitted to the matching endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::fields::WizardStep;
use crate::domain::types::ClientType;

/// Everything the user has entered so far for the client being registered.
///
/// Built fresh from the wizard form before every match request.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidateInput {
    #[serde(default)]
    #[validate(nested)]
    pub business_information: BusinessInformation,
    #[serde(default)]
    #[validate(nested)]
    pub location: LocationInformation,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BusinessInformation {
    #[serde(default)]
    pub client_type: Option<ClientType>,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 60))]
    pub last_name: Option<String>,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 4))]
    pub identification_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub identification_province: Option<String>,
    #[serde(default)]
    #[validate(length(max = 40))]
    pub client_identification: Option<String>,
    #[serde(default)]
    #[validate(length(max = 13))]
    pub registration_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 60))]
    pub business_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 8))]
    pub client_acronym: Option<String>,
    #[serde(default)]
    #[validate(length(max = 120))]
    pub doing_business_as: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LocationInformation {
    #[serde(default)]
    #[validate(nested)]
    pub addresses: Vec<AddressInput>,
    #[serde(default)]
    #[validate(nested)]
    pub contacts: Vec<ContactInput>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(default)]
    #[validate(length(max = 40))]
    pub location_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 40))]
    pub street_address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub province: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub country: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email_address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub business_phone_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub secondary_phone_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub fax_number: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactInput {
    #[serde(default)]
    pub contact_type: Option<String>,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 30))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub secondary_phone_number: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub fax_number: Option<String>,
}

impl MatchCandidateInput {
    /// Keeps only the part of the candidate that the given step matches on.
    #[must_use]
    pub fn subset_for(&self, step: WizardStep) -> Self {
        match step {
            WizardStep::BusinessInformation => Self {
                business_information: self.business_information.clone(),
                location: LocationInformation::default(),
            },
            WizardStep::Locations => Self {
                business_information: BusinessInformation::default(),
                location: LocationInformation {
                    addresses: self.location.addresses.clone(),
                    contacts: Vec::new(),
                },
            },
            WizardStep::Contacts => Self {
                business_information: BusinessInformation::default(),
                location: LocationInformation {
                    addresses: Vec::new(),
                    contacts: self.location.contacts.clone(),
                },
            },
            WizardStep::Review => Self::default(),
        }
    }

    /// Number of repeatable sections the step submits.
    pub fn section_count(&self, step: WizardStep) -> usize {
        match step {
            WizardStep::Locations => self.location.addresses.len(),
            WizardStep::Contacts => self.location.contacts.len(),
            WizardStep::BusinessInformation | WizardStep::Review => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn deserializes_camel_case_payload_with_missing_parts() {
        let input: MatchCandidateInput = serde_json::from_value(json!({
            "businessInformation": {
                "clientType": "I",
                "firstName": "James",
                "lastName": "Baxter",
                "birthdate": "1959-05-18"
            }
        }))
        .unwrap();

        assert_eq!(
            input.business_information.client_type,
            Some(ClientType::Individual)
        );
        assert_eq!(
            input.business_information.birthdate,
            NaiveDate::from_ymd_opt(1959, 5, 18)
        );
        assert!(input.location.addresses.is_empty());
    }

    #[test]
    fn validation_rejects_malformed_email() {
        let input = MatchCandidateInput {
            location: LocationInformation {
                addresses: vec![AddressInput {
                    email_address: Some("nope".to_string()),
                    ..Default::default()
                }],
                contacts: vec![],
            },
            ..Default::default()
        };

        assert!(input.validate().is_err());
    }

    #[test]
    fn subset_keeps_only_step_data() {
        let input = MatchCandidateInput {
            business_information: BusinessInformation {
                business_name: Some("Acme".to_string()),
                ..Default::default()
            },
            location: LocationInformation {
                addresses: vec![AddressInput::default(), AddressInput::default()],
                contacts: vec![ContactInput::default()],
            },
        };

        let locations = input.subset_for(WizardStep::Locations);
        assert_eq!(locations.business_information, BusinessInformation::default());
        assert_eq!(locations.location.addresses.len(), 2);
        assert!(locations.location.contacts.is_empty());
        assert_eq!(input.section_count(WizardStep::Contacts), 1);
    }
}
