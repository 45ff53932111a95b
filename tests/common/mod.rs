#![allow(dead_code)]

use chrono::NaiveDate;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use forest_client_match::db::{DbPool, establish_connection_pool};
use forest_client_match::domain::registry::{
    RegisteredClient, RegisteredContact, RegisteredLocation,
};
use forest_client_match::domain::types::{ClientNumber, ClientType};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("./migrations");

/// SQLite registry in a temporary directory, removed on drop.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 temp path").to_string();
        let pool = establish_connection_pool(&url).expect("create pool");
        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");
        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn number(value: &str) -> ClientNumber {
    ClientNumber::new(value).unwrap()
}

pub fn individual(
    client_number: &str,
    first: &str,
    last: &str,
    birthdate: (i32, u32, u32),
    identification: &str,
) -> RegisteredClient {
    RegisteredClient {
        client_number: number(client_number),
        client_type: ClientType::Individual,
        client_name: last.to_string(),
        legal_first_name: Some(first.to_string()),
        birthdate: NaiveDate::from_ymd_opt(birthdate.0, birthdate.1, birthdate.2),
        registration_number: None,
        identification_type: Some("BCDL".to_string()),
        client_identification: Some(identification.to_string()),
        client_acronym: None,
        doing_business_as: None,
    }
}

pub fn corporation(client_number: &str, name: &str, registration: &str) -> RegisteredClient {
    RegisteredClient {
        client_number: number(client_number),
        client_type: ClientType::Corporation,
        client_name: name.to_string(),
        legal_first_name: None,
        birthdate: None,
        registration_number: Some(registration.to_string()),
        identification_type: None,
        client_identification: None,
        client_acronym: Some("ALC".to_string()),
        doing_business_as: None,
    }
}

pub fn location(client_number: &str, street: &str, postal: &str, email: &str) -> RegisteredLocation {
    RegisteredLocation {
        client_number: number(client_number),
        location_name: "Mailing address".to_string(),
        street_address: street.to_string(),
        city: "Victoria".to_string(),
        province: Some("BC".to_string()),
        country: "CA".to_string(),
        postal_code: postal.to_string(),
        email_address: Some(email.to_string()),
        business_phone_number: Some("250 387 6121".to_string()),
        secondary_phone_number: None,
        fax_number: None,
    }
}

pub fn contact(client_number: &str, first: &str, last: &str, email: &str) -> RegisteredContact {
    RegisteredContact {
        client_number: number(client_number),
        contact_type: Some("Billing".to_string()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: Some(email.to_string()),
        phone_number: Some("250 356 0000".to_string()),
        secondary_phone_number: None,
        fax_number: None,
    }
}
