use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::registry::{
    RegisteredClient as DomainClient, RegisteredContact as DomainContact,
    RegisteredLocation as DomainLocation, phone_key,
};
use crate::domain::types::{ClientNumber, TypeConstraintError};

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = crate::schema::registered_clients)]
/// Diesel model for [`crate::domain::registry::RegisteredClient`].
pub struct RegisteredClient {
    pub client_number: String,
    pub client_type: String,
    pub client_name: String,
    pub legal_first_name: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub registration_number: Option<String>,
    pub identification_type: Option<String>,
    pub client_identification: Option<String>,
    pub client_acronym: Option<String>,
    pub doing_business_as: Option<String>,
    pub name_key: String,
    pub registration_key: Option<String>,
    pub identification_key: Option<String>,
    pub acronym_key: Option<String>,
    pub doing_business_as_key: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::registered_clients)]
/// Insertable form of [`RegisteredClient`] carrying its lookup keys.
pub struct NewRegisteredClient<'a> {
    pub client_number: &'a str,
    pub client_type: &'a str,
    pub client_name: &'a str,
    pub legal_first_name: Option<&'a str>,
    pub birthdate: Option<NaiveDate>,
    pub registration_number: Option<&'a str>,
    pub identification_type: Option<&'a str>,
    pub client_identification: Option<&'a str>,
    pub client_acronym: Option<&'a str>,
    pub doing_business_as: Option<&'a str>,
    pub name_key: String,
    pub registration_key: Option<String>,
    pub identification_key: Option<String>,
    pub acronym_key: Option<String>,
    pub doing_business_as_key: Option<String>,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = crate::schema::client_locations)]
/// Diesel model for [`crate::domain::registry::RegisteredLocation`].
pub struct ClientLocation {
    pub id: i32,
    pub client_number: String,
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
    pub postal_code_key: String,
    pub email_key: Option<String>,
    pub business_phone_key: Option<String>,
    pub secondary_phone_key: Option<String>,
    pub fax_key: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::client_locations)]
pub struct NewClientLocation<'a> {
    pub client_number: &'a str,
    pub location_name: &'a str,
    pub street_address: &'a str,
    pub city: &'a str,
    pub province: Option<&'a str>,
    pub country: &'a str,
    pub postal_code: &'a str,
    pub email_address: Option<&'a str>,
    pub business_phone_number: Option<&'a str>,
    pub secondary_phone_number: Option<&'a str>,
    pub fax_number: Option<&'a str>,
    pub postal_code_key: String,
    pub email_key: Option<String>,
    pub business_phone_key: Option<String>,
    pub secondary_phone_key: Option<String>,
    pub fax_key: Option<String>,
}

#[derive(Debug, Clone, Queryable)]
#[diesel(table_name = crate::schema::client_contacts)]
/// Diesel model for [`crate::domain::registry::RegisteredContact`].
pub struct ClientContact {
    pub id: i32,
    pub client_number: String,
    pub contact_type: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub secondary_phone_number: Option<String>,
    pub fax_number: Option<String>,
    pub name_key: String,
    pub email_key: Option<String>,
    pub phone_key: Option<String>,
    pub secondary_phone_key: Option<String>,
    pub fax_key: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::client_contacts)]
pub struct NewClientContact<'a> {
    pub client_number: &'a str,
    pub contact_type: Option<&'a str>,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub secondary_phone_number: Option<&'a str>,
    pub fax_number: Option<&'a str>,
    pub name_key: String,
    pub email_key: Option<String>,
    pub phone_key: Option<String>,
    pub secondary_phone_key: Option<String>,
    pub fax_key: Option<String>,
}

impl TryFrom<RegisteredClient> for DomainClient {
    type Error = TypeConstraintError;

    fn try_from(row: RegisteredClient) -> Result<Self, Self::Error> {
        Ok(Self {
            client_number: ClientNumber::new(row.client_number)?,
            client_type: row.client_type.parse()?,
            client_name: row.client_name,
            legal_first_name: row.legal_first_name,
            birthdate: row.birthdate,
            registration_number: row.registration_number,
            identification_type: row.identification_type,
            client_identification: row.client_identification,
            client_acronym: row.client_acronym,
            doing_business_as: row.doing_business_as,
        })
    }
}

impl TryFrom<ClientLocation> for DomainLocation {
    type Error = TypeConstraintError;

    fn try_from(row: ClientLocation) -> Result<Self, Self::Error> {
        Ok(Self {
            client_number: ClientNumber::new(row.client_number)?,
            location_name: row.location_name,
            street_address: row.street_address,
            city: row.city,
            province: row.province,
            country: row.country,
            postal_code: row.postal_code,
            email_address: row.email_address,
            business_phone_number: row.business_phone_number,
            secondary_phone_number: row.secondary_phone_number,
            fax_number: row.fax_number,
        })
    }
}

impl TryFrom<ClientContact> for DomainContact {
    type Error = TypeConstraintError;

    fn try_from(row: ClientContact) -> Result<Self, Self::Error> {
        Ok(Self {
            client_number: ClientNumber::new(row.client_number)?,
            contact_type: row.contact_type,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone_number: row.phone_number,
            secondary_phone_number: row.secondary_phone_number,
            fax_number: row.fax_number,
        })
    }
}

impl<'a> From<&'a DomainClient> for NewRegisteredClient<'a> {
    fn from(client: &'a DomainClient) -> Self {
        Self {
            client_number: client.client_number.as_str(),
            client_type: client.client_type.code(),
            client_name: client.client_name.as_str(),
            legal_first_name: client.legal_first_name.as_deref(),
            birthdate: client.birthdate,
            registration_number: client.registration_number.as_deref(),
            identification_type: client.identification_type.as_deref(),
            client_identification: client.client_identification.as_deref(),
            client_acronym: client.client_acronym.as_deref(),
            doing_business_as: client.doing_business_as.as_deref(),
            name_key: client.full_name_key(),
            registration_key: client.registration_key(),
            identification_key: client.identification_key(),
            acronym_key: client.acronym_key(),
            doing_business_as_key: client.doing_business_as_key(),
        }
    }
}

impl<'a> From<&'a DomainLocation> for NewClientLocation<'a> {
    fn from(location: &'a DomainLocation) -> Self {
        Self {
            client_number: location.client_number.as_str(),
            location_name: location.location_name.as_str(),
            street_address: location.street_address.as_str(),
            city: location.city.as_str(),
            province: location.province.as_deref(),
            country: location.country.as_str(),
            postal_code: location.postal_code.as_str(),
            email_address: location.email_address.as_deref(),
            business_phone_number: location.business_phone_number.as_deref(),
            secondary_phone_number: location.secondary_phone_number.as_deref(),
            fax_number: location.fax_number.as_deref(),
            postal_code_key: location.postal_code_key(),
            email_key: location.email_key(),
            business_phone_key: phone_key(location.business_phone_number.as_deref()),
            secondary_phone_key: phone_key(location.secondary_phone_number.as_deref()),
            fax_key: phone_key(location.fax_number.as_deref()),
        }
    }
}

impl<'a> From<&'a DomainContact> for NewClientContact<'a> {
    fn from(contact: &'a DomainContact) -> Self {
        Self {
            client_number: contact.client_number.as_str(),
            contact_type: contact.contact_type.as_deref(),
            first_name: contact.first_name.as_str(),
            last_name: contact.last_name.as_str(),
            email: contact.email.as_deref(),
            phone_number: contact.phone_number.as_deref(),
            secondary_phone_number: contact.secondary_phone_number.as_deref(),
            fax_number: contact.fax_number.as_deref(),
            name_key: contact.name_key(),
            email_key: contact.email_key(),
            phone_key: phone_key(contact.phone_number.as_deref()),
            secondary_phone_key: phone_key(contact.secondary_phone_number.as_deref()),
            fax_key: phone_key(contact.fax_number.as_deref()),
        }
    }
}
