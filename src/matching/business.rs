//! Matchers of the business information step.

use crate::domain::candidate::BusinessInformation;
use crate::domain::match_result::{BusinessReason, MatchField};
use crate::domain::types::{normalize_identifier, normalize_name, non_blank};
use crate::matching::{
    BUSINESS_NAME_THRESHOLD, INDIVIDUAL_NAME_THRESHOLD, MatchCollector, Similarity, compare_names,
};
use crate::repository::errors::RepositoryResult;
use crate::repository::{ClientLookup, ClientRegistryReader};

const INDIVIDUAL: MatchField = MatchField::Business(BusinessReason::Individual);
const IDENTIFICATION: MatchField = MatchField::Business(BusinessReason::ClientIdentification);
const REGISTRATION: MatchField = MatchField::Business(BusinessReason::RegistrationNumber);
const BUSINESS_NAME: MatchField = MatchField::Business(BusinessReason::BusinessName);
const ACRONYM: MatchField = MatchField::Business(BusinessReason::ClientAcronym);
const DOING_BUSINESS_AS: MatchField = MatchField::Business(BusinessReason::DoingBusinessAs);

pub fn match_business<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    match_individual(registry, info, collector)?;
    match_identification(registry, info, collector)?;
    match_registration_number(registry, info, collector)?;
    match_business_name(registry, info, collector)?;
    match_acronym(registry, info, collector)?;
    match_doing_business_as(registry, info, collector)
}

/// Same birthdate and an equal or similar full name. Two people may share
/// both, so this is never reported as exact.
fn match_individual<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let (Some(first), Some(last), Some(birthdate)) = (
        non_blank(info.first_name.as_deref()),
        non_blank(info.last_name.as_deref()),
        info.birthdate,
    ) else {
        return Ok(());
    };

    let name = normalize_name(&format!("{first} {last}"));
    for client in registry.find_clients(&ClientLookup::Birthdate(birthdate))? {
        if compare_names(&client.full_name_key(), &name, INDIVIDUAL_NAME_THRESHOLD)
            != Similarity::Different
        {
            collector.record(INDIVIDUAL, true, client.client_number);
        }
    }
    Ok(())
}

fn match_identification<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let Some(number) = non_blank(info.client_identification.as_deref()) else {
        return Ok(());
    };

    let lookup = ClientLookup::Identification {
        identification_type: non_blank(info.identification_type.as_deref()).map(str::to_string),
        number: normalize_identifier(number),
    };
    for client in registry.find_clients(&lookup)? {
        collector.record(IDENTIFICATION, false, client.client_number);
    }
    Ok(())
}

fn match_registration_number<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let Some(number) = non_blank(info.registration_number.as_deref()) else {
        return Ok(());
    };

    let lookup = ClientLookup::RegistrationNumber(normalize_identifier(number));
    for client in registry.find_clients(&lookup)? {
        collector.record(REGISTRATION, false, client.client_number);
    }
    Ok(())
}

fn match_business_name<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let name = normalize_name(info.business_name.as_deref().unwrap_or_default());
    let Some(token) = name.split_whitespace().next() else {
        return Ok(());
    };

    for client in registry.find_clients(&ClientLookup::NameToken(token.to_string()))? {
        match compare_names(&client.full_name_key(), &name, BUSINESS_NAME_THRESHOLD) {
            Similarity::Identical => collector.record(BUSINESS_NAME, false, client.client_number),
            Similarity::Similar => collector.record(BUSINESS_NAME, true, client.client_number),
            Similarity::Different => {}
        }
    }
    Ok(())
}

fn match_acronym<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let Some(acronym) = non_blank(info.client_acronym.as_deref()) else {
        return Ok(());
    };

    let lookup = ClientLookup::Acronym(normalize_identifier(acronym));
    for client in registry.find_clients(&lookup)? {
        collector.record(ACRONYM, false, client.client_number);
    }
    Ok(())
}

fn match_doing_business_as<R>(
    registry: &R,
    info: &BusinessInformation,
    collector: &mut MatchCollector,
) -> RepositoryResult<()>
where
    R: ClientRegistryReader + ?Sized,
{
    let name = normalize_name(info.doing_business_as.as_deref().unwrap_or_default());
    let Some(token) = name.split_whitespace().next() else {
        return Ok(());
    };

    let lookup = ClientLookup::DoingBusinessAsToken(token.to_string());
    for client in registry.find_clients(&lookup)? {
        let Some(existing) = client.doing_business_as_key() else {
            continue;
        };
        if compare_names(&existing, &name, BUSINESS_NAME_THRESHOLD) != Similarity::Different {
            collector.record(DOING_BUSINESS_AS, true, client.client_number);
        }
    }
    Ok(())
}
