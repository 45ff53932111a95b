//! Matchers of one location section. Locations are shared between related
//! clients often enough that every hit is reported as fuzzy.

use crate::domain::candidate::AddressInput;
use crate::domain::match_result::{AddressReason, MatchField};
use crate::domain::registry::{RegisteredLocation, email_key, phone_key};
use crate::domain::types::{non_blank, normalize_name, normalize_postal_code};
use crate::matching::MatchCollector;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientRegistryReader, LocationLookup};

pub fn match_address<R>(
    registry: &R,
    index: usize,
    address: &AddressInput,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let field = |reason| MatchField::Address { index, reason };

    if let Some(postal_code) = non_blank(address.postal_code.as_deref()) {
        let lookup = LocationLookup::PostalCode(normalize_postal_code(postal_code));
        for location in registry.find_locations(&lookup)? {
            if same_address(address, &location) {
                collector.record(field(AddressReason::Address), true, location.client_number);
            }
        }
    }

    if let Some(key) = email_key(address.email_address.as_deref()) {
        for location in registry.find_locations(&LocationLookup::Email(key))? {
            collector.record(field(AddressReason::EmailAddress), true, location.client_number);
        }
    }

    let phones = [
        (AddressReason::BusinessPhoneNumber, &address.business_phone_number),
        (AddressReason::SecondaryPhoneNumber, &address.secondary_phone_number),
        (AddressReason::FaxNumber, &address.fax_number),
    ];
    for (reason, phone) in phones {
        let Some(key) = phone_key(phone.as_deref()) else {
            continue;
        };
        for location in registry.find_locations(&LocationLookup::Phone(key))? {
            collector.record(field(reason), true, location.client_number);
        }
    }

    Ok(())
}

fn same_text(submitted: Option<&str>, registered: Option<&str>) -> bool {
    let submitted = normalize_name(submitted.unwrap_or_default());
    let registered = normalize_name(registered.unwrap_or_default());
    submitted == registered
}

/// Street, city, province and country agree once normalised. The postal code
/// already agrees through the lookup.
fn same_address(address: &AddressInput, location: &RegisteredLocation) -> bool {
    non_blank(address.street_address.as_deref()).is_some()
        && same_text(
            address.street_address.as_deref(),
            Some(&location.street_address),
        )
        && same_text(address.city.as_deref(), Some(&location.city))
        && same_text(address.province.as_deref(), location.province.as_deref())
        && same_text(address.country.as_deref(), Some(&location.country))
}
