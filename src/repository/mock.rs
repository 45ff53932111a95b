//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::registry::{RegisteredClient, RegisteredContact, RegisteredLocation};
use crate::domain::types::ClientNumber;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ClientLookup, ClientRegistryReader, ClientRegistryWriter, ContactLookup, LocationLookup,
};

mock! {
    pub Registry {}

    impl ClientRegistryReader for Registry {
        fn find_clients(&self, lookup: &ClientLookup) -> RepositoryResult<Vec<RegisteredClient>>;
        fn find_locations(
            &self,
            lookup: &LocationLookup,
        ) -> RepositoryResult<Vec<RegisteredLocation>>;
        fn find_contacts(&self, lookup: &ContactLookup) -> RepositoryResult<Vec<RegisteredContact>>;
    }

    impl ClientRegistryWriter for Registry {
        fn create_client(&self, client: &RegisteredClient) -> RepositoryResult<()>;
        fn create_location(&self, location: &RegisteredLocation) -> RepositoryResult<()>;
        fn create_contact(&self, contact: &RegisteredContact) -> RepositoryResult<()>;
        fn delete_client(&self, client_number: &ClientNumber) -> RepositoryResult<()>;
    }
}
