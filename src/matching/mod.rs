//! Server-side field matcher.
//!
//! Compares a [`MatchCandidateInput`] against the registry and reports, per
//! submitted field, which existing clients hold an identical (`fuzzy: false`)
//! or similar (`fuzzy: true`) value.

use std::collections::BTreeSet;

use crate::domain::candidate::MatchCandidateInput;
use crate::domain::fields::WizardStep;
use crate::domain::match_result::{MatchField, MatchResult};
use crate::domain::types::ClientNumber;
use crate::repository::ClientRegistryReader;
use crate::repository::errors::RepositoryResult;

pub mod business;
pub mod contact;
pub mod location;

/// Jaro-Winkler score at which two individual names are considered similar.
pub const INDIVIDUAL_NAME_THRESHOLD: f64 = 0.92;
/// Jaro-Winkler score at which two organisation names are considered similar.
pub const BUSINESS_NAME_THRESHOLD: f64 = 0.90;

/// Outcome of comparing one normalised value with another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Similarity {
    Identical,
    Similar,
    Different,
}

/// Classifies two already normalised names.
pub fn compare_names(left: &str, right: &str, threshold: f64) -> Similarity {
    if left.is_empty() || right.is_empty() {
        return Similarity::Different;
    }
    if left == right {
        return Similarity::Identical;
    }
    if strsim::jaro_winkler(left, right) >= threshold {
        Similarity::Similar
    } else {
        Similarity::Different
    }
}

/// Groups matched clients per `(field, fuzzy)` while keeping the order in
/// which reasons were first seen.
#[derive(Debug, Default)]
pub struct MatchCollector {
    entries: Vec<(MatchField, bool, BTreeSet<ClientNumber>)>,
}

impl MatchCollector {
    pub fn record(&mut self, field: MatchField, fuzzy: bool, client_number: ClientNumber) {
        match self
            .entries
            .iter_mut()
            .find(|(f, z, _)| *f == field && *z == fuzzy)
        {
            Some((_, _, numbers)) => {
                numbers.insert(client_number);
            }
            None => self
                .entries
                .push((field, fuzzy, BTreeSet::from([client_number]))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_results(self) -> Vec<MatchResult> {
        self.entries
            .into_iter()
            .map(|(field, fuzzy, numbers)| MatchResult::new(field, numbers.into_iter().collect(), fuzzy))
            .collect()
    }
}

/// Runs every matcher of `step` against the registry.
pub fn find_matches<R>(
    registry: &R,
    step: WizardStep,
    input: &MatchCandidateInput,
) -> RepositoryResult<Vec<MatchResult>>
where
    R: ClientRegistryReader + ?Sized,
{
    let mut collector = MatchCollector::default();

    match step {
        WizardStep::BusinessInformation => {
            business::match_business(registry, &input.business_information, &mut collector)?;
        }
        WizardStep::Locations => {
            for (index, address) in input.location.addresses.iter().enumerate() {
                location::match_address(registry, index, address, &mut collector)?;
            }
        }
        WizardStep::Contacts => {
            for (index, contact) in input.location.contacts.iter().enumerate() {
                contact::match_contact(registry, index, contact, &mut collector)?;
            }
        }
        WizardStep::Review => {}
    }

    if !collector.is_empty() {
        log::info!("Step {step:?} matched existing clients");
    }
    Ok(collector.into_results())
}
