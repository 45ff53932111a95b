//! Step and section verdicts.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::fields::{FieldKey, FieldMatchState, WizardStep};
use crate::domain::match_result::{MatchField, MatchResult};
use crate::domain::types::ClientNumber;
use crate::verdict::field::field_states;
use crate::verdict::{MatchError, reason_label};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictKind {
    #[default]
    None,
    Warning,
    Error,
}

/// Aggregated outcome of a set of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepVerdict {
    pub kind: VerdictKind,
    /// Describes the dominant reason; absent when nothing matched.
    pub message: Option<String>,
    /// Only set for warning-only verdicts. Errors are never acknowledgeable.
    pub requires_acknowledgement: bool,
    /// Clients behind the entries of the dominant severity.
    pub client_numbers: Vec<ClientNumber>,
}

/// Notification of one repeatable section that has at least one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionVerdict {
    pub index: usize,
    /// Element id the section notification is rendered under.
    pub anchor: String,
    pub verdict: StepVerdict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StepMatchReport {
    pub verdict: StepVerdict,
    pub fields: BTreeMap<FieldKey<usize>, FieldMatchState>,
    /// Sections without entries are left out.
    pub sections: Vec<SectionVerdict>,
}

impl StepMatchReport {
    pub fn is_clean(&self) -> bool {
        self.verdict.kind == VerdictKind::None
    }
}

fn numbers_sentence(numbers: &[ClientNumber]) -> String {
    let joined = numbers
        .iter()
        .map(ClientNumber::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if numbers.len() == 1 {
        format!("client number {joined}")
    } else {
        format!("client numbers {joined}")
    }
}

/// Verdict over any group of entries, in response order.
pub fn verdict_of(entries: &[&MatchResult]) -> StepVerdict {
    let exact = entries.iter().any(|entry| !entry.fuzzy);
    let fuzzy = !exact;
    let dominant: Vec<&MatchResult> = entries
        .iter()
        .copied()
        .filter(|entry| entry.fuzzy == fuzzy)
        .collect();

    let Some(first) = dominant.first() else {
        return StepVerdict::default();
    };

    let client_numbers: Vec<ClientNumber> = dominant
        .iter()
        .flat_map(|entry| entry.client_numbers.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let label = reason_label(&first.field);
    let numbers = numbers_sentence(&first.client_numbers);
    if exact {
        StepVerdict {
            kind: VerdictKind::Error,
            message: Some(format!("The {label} has {numbers}")),
            requires_acknowledgement: false,
            client_numbers,
        }
    } else {
        StepVerdict {
            kind: VerdictKind::Warning,
            message: Some(format!("The {label} is similar to {numbers}")),
            requires_acknowledgement: true,
            client_numbers,
        }
    }
}

fn anchor(field: &MatchField, index: usize) -> String {
    match field {
        MatchField::Contact { .. } => format!("location-contacts-{index}"),
        _ => format!("location-addresses-{index}"),
    }
}

fn check_scope(
    step: WizardStep,
    entry: &MatchResult,
    section_count: usize,
) -> Result<(), MatchError> {
    if entry.field.step() != step {
        return Err(MatchError::OutOfScope {
            field: entry.field,
            step,
        });
    }
    match entry.field.section_index() {
        Some(index) if index >= section_count => Err(MatchError::SectionOutOfRange {
            field: entry.field,
            count: section_count,
        }),
        _ => Ok(()),
    }
}

/// Builds the report of `step` from the response to its match request.
///
/// `section_count` is the number of repeatable sections that were submitted;
/// entries outside the step or past the submitted sections reject the whole
/// response.
pub fn aggregate(
    step: WizardStep,
    entries: &[MatchResult],
    section_count: usize,
) -> Result<StepMatchReport, MatchError> {
    for entry in entries {
        check_scope(step, entry, section_count)?;
    }

    let all: Vec<&MatchResult> = entries.iter().collect();
    let mut per_section: BTreeMap<usize, Vec<&MatchResult>> = BTreeMap::new();
    for entry in entries {
        if let Some(index) = entry.field.section_index() {
            per_section.entry(index).or_default().push(entry);
        }
    }

    let sections = per_section
        .into_iter()
        .map(|(index, group)| SectionVerdict {
            index,
            anchor: anchor(&group[0].field, index),
            verdict: verdict_of(&group),
        })
        .collect();

    Ok(StepMatchReport {
        verdict: verdict_of(&all),
        fields: field_states(entries),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{AddressField, BusinessField};
    use crate::domain::match_result::{AddressReason, BusinessReason, ContactReason};

    fn number(value: &str) -> ClientNumber {
        ClientNumber::new(value).unwrap()
    }

    fn business(reason: BusinessReason, fuzzy: bool, numbers: &[&str]) -> MatchResult {
        MatchResult::new(
            MatchField::Business(reason),
            numbers.iter().map(|n| number(n)).collect(),
            fuzzy,
        )
    }

    #[test]
    fn empty_response_is_clean() {
        let report = aggregate(WizardStep::BusinessInformation, &[], 0).unwrap();
        assert!(report.is_clean());
        assert!(!report.verdict.requires_acknowledgement);
        assert!(report.verdict.message.is_none());
        assert!(report.fields.is_empty());
        assert!(report.sections.is_empty());
    }

    #[test]
    fn fuzzy_only_requires_acknowledgement() {
        let entries = [
            business(BusinessReason::BusinessName, true, &["5"]),
            business(BusinessReason::DoingBusinessAs, true, &["9", "5"]),
        ];
        let report = aggregate(WizardStep::BusinessInformation, &entries, 0).unwrap();

        assert_eq!(report.verdict.kind, VerdictKind::Warning);
        assert!(report.verdict.requires_acknowledgement);
        assert_eq!(
            report.verdict.message.as_deref(),
            Some("The business name is similar to client number 00000005")
        );
        assert_eq!(report.verdict.client_numbers, vec![number("5"), number("9")]);
    }

    #[test]
    fn any_exact_entry_is_an_error_without_acknowledgement() {
        let entries = [
            business(BusinessReason::Individual, true, &["1"]),
            business(BusinessReason::ClientIdentification, false, &["2", "3"]),
        ];
        let report = aggregate(WizardStep::BusinessInformation, &entries, 0).unwrap();

        assert_eq!(report.verdict.kind, VerdictKind::Error);
        assert!(!report.verdict.requires_acknowledgement);
        assert_eq!(
            report.verdict.message.as_deref(),
            Some("The identification number has client numbers 00000002, 00000003")
        );
        assert_eq!(report.verdict.client_numbers, vec![number("2"), number("3")]);
        assert_eq!(
            report.fields[&FieldKey::Business(BusinessField::FirstName)],
            FieldMatchState::Warning
        );
        assert_eq!(
            report.fields[&FieldKey::Business(BusinessField::ClientIdentification)],
            FieldMatchState::Error
        );
    }

    #[test]
    fn sections_only_report_indexes_with_entries() {
        let entries = [MatchResult::fuzzy(
            MatchField::Address {
                index: 1,
                reason: AddressReason::EmailAddress,
            },
            vec![number("4")],
        )];
        let report = aggregate(WizardStep::Locations, &entries, 2).unwrap();

        assert_eq!(report.sections.len(), 1);
        assert_eq!(report.sections[0].index, 1);
        assert_eq!(report.sections[0].anchor, "location-addresses-1");
        assert_eq!(report.sections[0].verdict.kind, VerdictKind::Warning);
        assert_eq!(
            report.fields.keys().collect::<Vec<_>>(),
            vec![&FieldKey::Address(1, AddressField::EmailAddress)]
        );
    }

    #[test]
    fn entries_outside_the_request_are_rejected() {
        let wrong_step = [business(BusinessReason::BusinessName, true, &["1"])];
        assert!(matches!(
            aggregate(WizardStep::Contacts, &wrong_step, 1),
            Err(MatchError::OutOfScope { .. })
        ));

        let past_end = [MatchResult::exact(
            MatchField::Contact {
                index: 2,
                reason: ContactReason::Email,
            },
            vec![number("1")],
        )];
        assert_eq!(
            aggregate(WizardStep::Contacts, &past_end, 2),
            Err(MatchError::SectionOutOfRange {
                field: past_end[0].field,
                count: 2
            })
        );
    }

    #[test]
    fn aggregation_is_deterministic() {
        let entries = [
            business(BusinessReason::BusinessName, true, &["7"]),
            business(BusinessReason::ClientAcronym, false, &["8"]),
        ];
        assert_eq!(
            aggregate(WizardStep::BusinessInformation, &entries, 0),
            aggregate(WizardStep::BusinessInformation, &entries, 0)
        );
    }
}
