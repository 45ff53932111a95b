use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::Sqlite;

use crate::domain::registry::{RegisteredClient, RegisteredContact, RegisteredLocation};
use crate::domain::types::{ClientNumber, ClientType};
use crate::models::registry::{
    ClientContact as DbContact, ClientLocation as DbLocation, NewClientContact,
    NewClientLocation, NewRegisteredClient, RegisteredClient as DbClient,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    ClientLookup, ClientRegistryReader, ClientRegistryWriter, ContactLookup, DieselRepository,
    LocationLookup,
};

fn contains(token: &str) -> String {
    format!("%{token}%")
}

impl ClientRegistryReader for DieselRepository {
    fn find_clients(&self, lookup: &ClientLookup) -> RepositoryResult<Vec<RegisteredClient>> {
        use crate::schema::registered_clients;

        let mut conn = self.conn()?;
        let query = registered_clients::table.into_boxed::<Sqlite>();

        let query = match lookup {
            ClientLookup::Birthdate(date) => query
                .filter(registered_clients::birthdate.eq(*date))
                .filter(registered_clients::client_type.eq(ClientType::Individual.code())),
            ClientLookup::RegistrationNumber(key) => {
                query.filter(registered_clients::registration_key.eq(key.as_str()))
            }
            ClientLookup::Identification {
                identification_type,
                number,
            } => {
                let query = query.filter(registered_clients::identification_key.eq(number.as_str()));
                match identification_type {
                    Some(kind) => {
                        query.filter(registered_clients::identification_type.eq(kind.as_str()))
                    }
                    None => query,
                }
            }
            ClientLookup::Acronym(key) => {
                query.filter(registered_clients::acronym_key.eq(key.as_str()))
            }
            ClientLookup::NameToken(token) => {
                query.filter(registered_clients::name_key.like(contains(token)))
            }
            ClientLookup::DoingBusinessAsToken(token) => {
                query.filter(registered_clients::doing_business_as_key.like(contains(token)))
            }
        };

        let rows = query
            .order(registered_clients::client_number.asc())
            .load::<DbClient>(&mut conn)?;

        rows.into_iter()
            .map(|row| RegisteredClient::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn find_locations(
        &self,
        lookup: &LocationLookup,
    ) -> RepositoryResult<Vec<RegisteredLocation>> {
        use crate::schema::client_locations;

        let mut conn = self.conn()?;
        let query = client_locations::table.into_boxed::<Sqlite>();

        let query = match lookup {
            LocationLookup::PostalCode(key) => {
                query.filter(client_locations::postal_code_key.eq(key.as_str()))
            }
            LocationLookup::Email(key) => query.filter(client_locations::email_key.eq(key.as_str())),
            LocationLookup::Phone(key) => query.filter(
                client_locations::business_phone_key
                    .eq(key.as_str())
                    .or(client_locations::secondary_phone_key.eq(key.as_str()))
                    .or(client_locations::fax_key.eq(key.as_str())),
            ),
        };

        let rows = query
            .order(client_locations::id.asc())
            .load::<DbLocation>(&mut conn)?;

        rows.into_iter()
            .map(|row| RegisteredLocation::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn find_contacts(&self, lookup: &ContactLookup) -> RepositoryResult<Vec<RegisteredContact>> {
        use crate::schema::client_contacts;

        let mut conn = self.conn()?;
        let query = client_contacts::table.into_boxed::<Sqlite>();

        let query = match lookup {
            ContactLookup::Name(key) => query.filter(client_contacts::name_key.eq(key.as_str())),
            ContactLookup::Email(key) => query.filter(client_contacts::email_key.eq(key.as_str())),
            ContactLookup::Phone(key) => query.filter(
                client_contacts::phone_key
                    .eq(key.as_str())
                    .or(client_contacts::secondary_phone_key.eq(key.as_str()))
                    .or(client_contacts::fax_key.eq(key.as_str())),
            ),
        };

        let rows = query
            .order(client_contacts::id.asc())
            .load::<DbContact>(&mut conn)?;

        rows.into_iter()
            .map(|row| RegisteredContact::try_from(row).map_err(RepositoryError::from))
            .collect()
    }
}

impl ClientRegistryWriter for DieselRepository {
    fn create_client(&self, client: &RegisteredClient) -> RepositoryResult<()> {
        use crate::schema::registered_clients;

        let mut conn = self.conn()?;
        diesel::insert_into(registered_clients::table)
            .values(&NewRegisteredClient::from(client))
            .execute(&mut conn)?;
        Ok(())
    }

    fn create_location(&self, location: &RegisteredLocation) -> RepositoryResult<()> {
        use crate::schema::client_locations;

        let mut conn = self.conn()?;
        diesel::insert_into(client_locations::table)
            .values(&NewClientLocation::from(location))
            .execute(&mut conn)?;
        Ok(())
    }

    fn create_contact(&self, contact: &RegisteredContact) -> RepositoryResult<()> {
        use crate::schema::client_contacts;

        let mut conn = self.conn()?;
        diesel::insert_into(client_contacts::table)
            .values(&NewClientContact::from(contact))
            .execute(&mut conn)?;
        Ok(())
    }

    fn delete_client(&self, client_number: &ClientNumber) -> RepositoryResult<()> {
        use crate::schema::{client_contacts, client_locations, registered_clients};

        let mut conn = self.conn()?;
        let number = client_number.as_str();

        let deleted = conn.transaction::<_, DieselError, _>(|conn| {
            diesel::delete(client_contacts::table.filter(client_contacts::client_number.eq(number)))
                .execute(conn)?;
            diesel::delete(
                client_locations::table.filter(client_locations::client_number.eq(number)),
            )
            .execute(conn)?;
            diesel::delete(registered_clients::table.find(number)).execute(conn)
        })?;

        if deleted == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
