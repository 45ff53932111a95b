//! In-process registry backed by plain vectors.
//!
//! Mirrors the lookups of the Diesel registry so the matcher can run against a
//! fixed snapshot of clients, e.g. in tests or when replaying a registry
//! export.

use crate::domain::registry::{RegisteredClient, RegisteredContact, RegisteredLocation};
use crate::domain::types::ClientType;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientLookup, ClientRegistryReader, ContactLookup, LocationLookup};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    clients: Vec<RegisteredClient>,
    locations: Vec<RegisteredLocation>,
    contacts: Vec<RegisteredContact>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_client(mut self, client: RegisteredClient) -> Self {
        self.clients.push(client);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: RegisteredLocation) -> Self {
        self.locations.push(location);
        self
    }

    #[must_use]
    pub fn with_contact(mut self, contact: RegisteredContact) -> Self {
        self.contacts.push(contact);
        self
    }

    fn client_matches(client: &RegisteredClient, lookup: &ClientLookup) -> bool {
        match lookup {
            ClientLookup::Birthdate(date) => {
                client.client_type == ClientType::Individual && client.birthdate == Some(*date)
            }
            ClientLookup::RegistrationNumber(key) => {
                client.registration_key().as_ref() == Some(key)
            }
            ClientLookup::Identification {
                identification_type,
                number,
            } => {
                client.identification_key().as_ref() == Some(number)
                    && identification_type
                        .as_ref()
                        .is_none_or(|kind| client.identification_type.as_ref() == Some(kind))
            }
            ClientLookup::Acronym(key) => client.acronym_key().as_ref() == Some(key),
            ClientLookup::NameToken(token) => client.full_name_key().contains(token.as_str()),
            ClientLookup::DoingBusinessAsToken(token) => client
                .doing_business_as_key()
                .is_some_and(|dba| dba.contains(token.as_str())),
        }
    }
}

impl ClientRegistryReader for InMemoryRegistry {
    fn find_clients(&self, lookup: &ClientLookup) -> RepositoryResult<Vec<RegisteredClient>> {
        Ok(self
            .clients
            .iter()
            .filter(|client| Self::client_matches(client, lookup))
            .cloned()
            .collect())
    }

    fn find_locations(
        &self,
        lookup: &LocationLookup,
    ) -> RepositoryResult<Vec<RegisteredLocation>> {
        Ok(self
            .locations
            .iter()
            .filter(|location| match lookup {
                LocationLookup::PostalCode(key) => &location.postal_code_key() == key,
                LocationLookup::Email(key) => location.email_key().as_ref() == Some(key),
                LocationLookup::Phone(key) => location.phone_keys().contains(key),
            })
            .cloned()
            .collect())
    }

    fn find_contacts(&self, lookup: &ContactLookup) -> RepositoryResult<Vec<RegisteredContact>> {
        Ok(self
            .contacts
            .iter()
            .filter(|contact| match lookup {
                ContactLookup::Name(key) => &contact.name_key() == key,
                ContactLookup::Email(key) => contact.email_key().as_ref() == Some(key),
                ContactLookup::Phone(key) => contact.phone_keys().contains(key),
            })
            .cloned()
            .collect())
    }
}
