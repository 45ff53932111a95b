//! Matchers of one contact section. Every hit is reported as fuzzy.

use crate::domain::candidate::ContactInput;
use crate::domain::match_result::{ContactReason, MatchField};
use crate::domain::registry::{email_key, phone_key};
use crate::domain::types::{non_blank, normalize_name};
use crate::matching::MatchCollector;
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientRegistryReader, ContactLookup};

pub fn match_contact<R>(
    registry: &R,
    index: usize,
    contact: &ContactInput,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let field = |reason| MatchField::Contact { index, reason };

    if let (Some(first), Some(last)) = (
        non_blank(contact.first_name.as_deref()),
        non_blank(contact.last_name.as_deref()),
    ) {
        let lookup = ContactLookup::Name(normalize_name(&format!("{first} {last}")));
        for existing in registry.find_contacts(&lookup)? {
            collector.record(field(ContactReason::Name), true, existing.client_number);
        }
    }

    if let Some(key) = email_key(contact.email.as_deref()) {
        for existing in registry.find_contacts(&ContactLookup::Email(key))? {
            collector.record(field(ContactReason::Email), true, existing.client_number);
        }
    }

    let phones = [
        (ContactReason::PhoneNumber, &contact.phone_number),
        (ContactReason::SecondaryPhoneNumber, &contact.secondary_phone_number),
        (ContactReason::FaxNumber, &contact.fax_number),
    ];
    for (reason, phone) in phones {
        let Some(key) = phone_key(phone.as_deref()) else {
            continue;
        };
        for existing in registry.find_contacts(&ContactLookup::Phone(key))? {
            collector.record(field(reason), true, existing.client_number);
        }
    }

    Ok(())
}
