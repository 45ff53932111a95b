use chrono::NaiveDate;

use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::registry::{RegisteredClient, RegisteredContact, RegisteredLocation};
use crate::domain::types::ClientNumber;
use crate::repository::errors::RepositoryResult;

pub mod errors;
pub mod memory;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod registry;

/// Candidate pre-filters for existing clients. Every key is expected in its
/// normalised form (see [`crate::domain::types`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientLookup {
    /// Individuals born on the given date.
    Birthdate(NaiveDate),
    RegistrationNumber(String),
    Identification {
        identification_type: Option<String>,
        number: String,
    },
    Acronym(String),
    /// Clients whose normalised legal name contains the token.
    NameToken(String),
    /// Clients whose normalised doing-business-as name contains the token.
    DoingBusinessAsToken(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationLookup {
    PostalCode(String),
    Email(String),
    Phone(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactLookup {
    Name(String),
    Email(String),
    Phone(String),
}

/// Read access to the registry of existing clients.
pub trait ClientRegistryReader {
    fn find_clients(&self, lookup: &ClientLookup) -> RepositoryResult<Vec<RegisteredClient>>;
    fn find_locations(&self, lookup: &LocationLookup)
    -> RepositoryResult<Vec<RegisteredLocation>>;
    fn find_contacts(&self, lookup: &ContactLookup) -> RepositoryResult<Vec<RegisteredContact>>;
}

/// Write access used to seed and maintain the registry.
pub trait ClientRegistryWriter {
    fn create_client(&self, client: &RegisteredClient) -> RepositoryResult<()>;
    fn create_location(&self, location: &RegisteredLocation) -> RepositoryResult<()>;
    fn create_contact(&self, contact: &RegisteredContact) -> RepositoryResult<()>;
    fn delete_client(&self, client_number: &ClientNumber) -> RepositoryResult<()>;
}

/// Diesel-backed registry shared across request handlers.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}
