//! Owned state of the registration wizard.
//!
//! Every change goes through a named mutation on [`WizardStore`]. Matching
//! state is kept per step and keyed by [`SectionId`], so removing a section
//! never shifts another section's highlights.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::fields::{FieldKey, FieldMatchState, WizardStep};
use crate::domain::match_result::MatchResult;
use crate::domain::types::SectionId;
use crate::validation::FieldIssue;
use crate::verdict::{StepMatchReport, StepVerdict, VerdictKind, aggregate};

pub mod arena;
pub mod form;

pub use arena::SectionArena;
pub use form::ClientForm;

/// Tag of one issued match request. Only the latest tag of a step is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RequestVersion(u64);

impl RequestVersion {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl Display for RequestVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MatchStatus {
    /// Never checked.
    #[default]
    Unchecked,
    Pending(RequestVersion),
    Checked,
    /// Edited since the last check.
    Stale,
    /// The last request failed; pressing Next retries.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct StepState {
    pub status: MatchStatus,
    pub report: Option<StepMatchReport>,
    pub field_states: BTreeMap<FieldKey<SectionId>, FieldMatchState>,
    /// Per-section notifications, only for sections with entries.
    pub notifications: BTreeMap<SectionId, StepVerdict>,
    pub acknowledged: bool,
    pub expanded: BTreeSet<SectionId>,
    /// Local validation issues of the last advance attempt.
    pub issues: Vec<FieldIssue>,
    /// Sections submitted with the pending request, by display index.
    sections: Vec<SectionId>,
}

impl StepState {
    fn clear_derived(&mut self) {
        self.report = None;
        self.field_states.clear();
        self.notifications.clear();
        self.acknowledged = false;
    }

    pub fn verdict_kind(&self) -> VerdictKind {
        self.report
            .as_ref()
            .map(|report| report.verdict.kind)
            .unwrap_or_default()
    }

    /// Whether a checked step may be left.
    fn passable(&self) -> bool {
        self.status == MatchStatus::Checked
            && match self.verdict_kind() {
                VerdictKind::None => true,
                VerdictKind::Warning => self.acknowledged,
                VerdictKind::Error => false,
            }
    }
}

/// What [`WizardStore::apply_outcome`] did with a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The response belonged to a superseded request.
    Discarded,
    /// Matches were found and the step stays put.
    Blocked(VerdictKind),
    Advanced(WizardStep),
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct WizardStore {
    form: ClientForm,
    current: WizardStep,
    steps: BTreeMap<WizardStep, StepState>,
    next_version: u64,
}

impl Default for WizardStore {
    fn default() -> Self {
        Self::new(ClientForm::new())
    }
}

impl WizardStore {
    pub fn new(form: ClientForm) -> Self {
        Self {
            form,
            current: WizardStep::BusinessInformation,
            steps: WizardStep::ALL
                .into_iter()
                .map(|step| (step, StepState::default()))
                .collect(),
            next_version: 0,
        }
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn current_step(&self) -> WizardStep {
        self.current
    }

    pub fn state(&self, step: WizardStep) -> &StepState {
        // Every step is inserted in `new`.
        &self.steps[&step]
    }

    fn state_mut(&mut self, step: WizardStep) -> &mut StepState {
        self.steps.entry(step).or_default()
    }

    pub fn field_state(&self, key: &FieldKey<SectionId>) -> FieldMatchState {
        WizardStep::ALL
            .into_iter()
            .find(|step| step.owns(key))
            .and_then(|step| self.state(step).field_states.get(key).copied())
            .unwrap_or_default()
    }

    pub fn notification(&self, step: WizardStep, section: SectionId) -> Option<&StepVerdict> {
        self.state(step).notifications.get(&section)
    }

    pub fn is_expanded(&self, step: WizardStep, section: SectionId) -> bool {
        self.state(step).expanded.contains(&section)
    }

    /// Drops everything derived from the last check of `step`. Returns the
    /// step when a request was in flight.
    fn invalidate(&mut self, step: WizardStep) -> Option<WizardStep> {
        let state = self.state_mut(step);
        state.clear_derived();
        let was_pending = matches!(state.status, MatchStatus::Pending(_));
        if state.status != MatchStatus::Unchecked {
            state.status = MatchStatus::Stale;
        }
        was_pending.then_some(step)
    }

    /// Stores a value and invalidates the step that renders it. Returns the
    /// step whose in-flight request must be cancelled, if any.
    pub fn set_field(&mut self, key: FieldKey<SectionId>, value: impl Into<String>) -> Option<WizardStep> {
        if !self.form.set(key, value) {
            log::warn!("Ignoring edit of removed section field {key:?}");
            return None;
        }
        let step = WizardStep::ALL.into_iter().find(|step| step.owns(&key))?;
        self.state_mut(step).issues.retain(|issue| issue.field != Some(key));
        self.invalidate(step)
    }

    pub fn add_address(&mut self) -> (SectionId, Option<WizardStep>) {
        let id = self.form.add_address();
        self.state_mut(WizardStep::Locations)
            .issues
            .retain(|issue| issue.field.is_some());
        (id, self.invalidate(WizardStep::Locations))
    }

    pub fn remove_address(&mut self, id: SectionId) -> Option<WizardStep> {
        if !self.form.remove_address(id) {
            return None;
        }
        self.forget_section(WizardStep::Locations, id);
        self.invalidate(WizardStep::Locations)
    }

    pub fn add_contact(&mut self) -> (SectionId, Option<WizardStep>) {
        let id = self.form.add_contact();
        (id, self.invalidate(WizardStep::Contacts))
    }

    pub fn remove_contact(&mut self, id: SectionId) -> Option<WizardStep> {
        if !self.form.remove_contact(id) {
            return None;
        }
        self.forget_section(WizardStep::Contacts, id);
        self.invalidate(WizardStep::Contacts)
    }

    fn forget_section(&mut self, step: WizardStep, id: SectionId) {
        let state = self.state_mut(step);
        state.expanded.remove(&id);
        state.issues
            .retain(|issue| issue.field.and_then(|field| field.section()) != Some(id));
    }

    /// Checks or unchecks the review statement of the current step.
    pub fn set_acknowledgement(&mut self, checked: bool) {
        let step = self.current;
        self.state_mut(step).acknowledged = checked;
    }

    pub fn toggle_section(&mut self, step: WizardStep, id: SectionId) {
        let expanded = &mut self.state_mut(step).expanded;
        if !expanded.remove(&id) {
            expanded.insert(id);
        }
    }

    pub fn record_issues(&mut self, step: WizardStep, issues: Vec<FieldIssue>) {
        self.state_mut(step).issues = issues;
    }

    /// Marks `step` as waiting for the response to a new request and returns
    /// its tag. Any earlier request of the step is superseded.
    pub fn begin_check(&mut self, step: WizardStep, sections: Vec<SectionId>) -> RequestVersion {
        self.next_version += 1;
        let version = RequestVersion(self.next_version);
        let state = self.state_mut(step);
        state.status = MatchStatus::Pending(version);
        state.report = None;
        state.field_states.clear();
        state.notifications.clear();
        state.sections = sections;
        version
    }

    /// Applies the response to request `version` of `step`.
    ///
    /// Responses to superseded requests are discarded. A clean verdict, or a
    /// warning that is already acknowledged, moves the wizard on.
    pub fn apply_outcome(
        &mut self,
        step: WizardStep,
        version: RequestVersion,
        outcome: Result<Vec<MatchResult>, String>,
    ) -> Applied {
        if self.state(step).status != MatchStatus::Pending(version) {
            log::debug!("Discarding stale response {version} for {step:?}");
            return Applied::Discarded;
        }

        let entries = match outcome {
            Ok(entries) => entries,
            Err(reason) => return self.fail(step, reason),
        };
        let sections = self.state(step).sections.clone();
        let report = match aggregate(step, &entries, sections.len()) {
            Ok(report) => report,
            Err(err) => return self.fail(step, err.to_string()),
        };

        let resolve = |index: usize| sections.get(index).copied();
        let field_states = report
            .fields
            .iter()
            .filter_map(|(key, state)| Some((key.try_map_section(resolve)?, *state)))
            .collect();
        let notifications: BTreeMap<SectionId, StepVerdict> = report
            .sections
            .iter()
            .filter_map(|section| Some((resolve(section.index)?, section.verdict.clone())))
            .collect();
        let kind = report.verdict.kind;

        let state = self.state_mut(step);
        state.expanded.extend(notifications.keys().copied());
        state.field_states = field_states;
        state.notifications = notifications;
        state.report = Some(report);
        state.status = MatchStatus::Checked;

        if self.current == step && self.go_next() {
            return Applied::Advanced(self.current);
        }
        Applied::Blocked(kind)
    }

    fn fail(&mut self, step: WizardStep, reason: String) -> Applied {
        log::error!("Match check for {step:?} failed: {reason}");
        let state = self.state_mut(step);
        state.clear_derived();
        state.status = MatchStatus::Failed(reason.clone());
        Applied::Failed(reason)
    }

    fn enter(&mut self, step: WizardStep) {
        self.current = step;
        self.state_mut(step).acknowledged = false;
    }

    /// Moves forward when the current step has passed its check.
    pub fn go_next(&mut self) -> bool {
        let leaving = self.current;
        let Some(next) = leaving.next() else {
            return false;
        };
        if leaving.is_matchable() && !self.state(leaving).passable() {
            return false;
        }
        self.enter(next);
        true
    }

    /// Moves back one step. Returns the step left behind when it still had
    /// a request in flight.
    pub fn go_back(&mut self) -> Option<WizardStep> {
        let leaving = self.current;
        let previous = leaving.previous()?;
        let state = self.state_mut(leaving);
        let cancelled = matches!(state.status, MatchStatus::Pending(_));
        if cancelled {
            state.status = MatchStatus::Stale;
        }
        self.enter(previous);
        cancelled.then_some(leaving)
    }

    /// Whether the Next control is enabled on the current step.
    pub fn next_enabled(&self) -> bool {
        if self.current.next().is_none() {
            return false;
        }
        let state = self.state(self.current);
        match state.status {
            MatchStatus::Pending(_) => false,
            MatchStatus::Checked => match state.verdict_kind() {
                VerdictKind::None => true,
                VerdictKind::Warning => state.acknowledged,
                VerdictKind::Error => false,
            },
            MatchStatus::Unchecked | MatchStatus::Stale | MatchStatus::Failed(_) => true,
        }
    }

    /// Whether the review statement is shown on the current step.
    pub fn acknowledgement_visible(&self) -> bool {
        let state = self.state(self.current);
        state.status == MatchStatus::Checked
            && state
                .report
                .as_ref()
                .is_some_and(|report| report.verdict.requires_acknowledgement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{AddressField, BusinessField};
    use crate::domain::match_result::{AddressReason, BusinessReason, MatchField};
    use crate::domain::types::ClientNumber;

    fn fuzzy(field: MatchField) -> MatchResult {
        MatchResult::fuzzy(field, vec![ClientNumber::new("42").unwrap()])
    }

    fn exact(field: MatchField) -> MatchResult {
        MatchResult::exact(field, vec![ClientNumber::new("42").unwrap()])
    }

    fn warn_on_business(store: &mut WizardStore) -> RequestVersion {
        let version = store.begin_check(WizardStep::BusinessInformation, vec![]);
        let applied = store.apply_outcome(
            WizardStep::BusinessInformation,
            version,
            Ok(vec![fuzzy(MatchField::Business(BusinessReason::Individual))]),
        );
        assert_eq!(applied, Applied::Blocked(VerdictKind::Warning));
        version
    }

    #[test]
    fn clean_response_advances() {
        let mut store = WizardStore::default();
        let version = store.begin_check(WizardStep::BusinessInformation, vec![]);
        assert!(!store.next_enabled());

        let applied = store.apply_outcome(WizardStep::BusinessInformation, version, Ok(vec![]));
        assert_eq!(applied, Applied::Advanced(WizardStep::Locations));
        assert!(!store.state(WizardStep::Locations).acknowledged);
    }

    #[test]
    fn warning_marks_the_individual_unit_and_requires_acknowledgement() {
        let mut store = WizardStore::default();
        warn_on_business(&mut store);

        assert!(store.acknowledgement_visible());
        assert!(!store.next_enabled());
        for field in [
            BusinessField::FirstName,
            BusinessField::LastName,
            BusinessField::BirthdateYear,
            BusinessField::BirthdateMonth,
            BusinessField::BirthdateDay,
        ] {
            assert_eq!(
                store.field_state(&FieldKey::Business(field)),
                FieldMatchState::Warning
            );
        }

        store.set_acknowledgement(true);
        assert!(store.next_enabled());
    }

    #[test]
    fn error_is_never_bypassed_by_acknowledgement() {
        let mut store = WizardStore::default();
        let version = store.begin_check(WizardStep::BusinessInformation, vec![]);
        store.apply_outcome(
            WizardStep::BusinessInformation,
            version,
            Ok(vec![exact(MatchField::Business(
                BusinessReason::ClientIdentification,
            ))]),
        );

        assert!(!store.acknowledgement_visible());
        store.set_acknowledgement(true);
        assert!(!store.next_enabled());
        assert!(!store.go_next());
        assert_eq!(store.current_step(), WizardStep::BusinessInformation);
    }

    #[test]
    fn acknowledgement_resets_when_the_step_is_entered_again() {
        let mut store = WizardStore::default();
        warn_on_business(&mut store);
        store.set_acknowledgement(true);

        let version = store.begin_check(WizardStep::BusinessInformation, vec![]);
        let applied = store.apply_outcome(
            WizardStep::BusinessInformation,
            version,
            Ok(vec![fuzzy(MatchField::Business(BusinessReason::Individual))]),
        );
        assert_eq!(applied, Applied::Advanced(WizardStep::Locations));

        assert_eq!(store.go_back(), None);
        assert_eq!(store.current_step(), WizardStep::BusinessInformation);
        assert!(!store.state(WizardStep::BusinessInformation).acknowledged);
        assert!(!store.next_enabled());
    }

    #[test]
    fn superseded_responses_are_discarded() {
        let mut store = WizardStore::default();
        let first = store.begin_check(WizardStep::BusinessInformation, vec![]);
        let second = store.begin_check(WizardStep::BusinessInformation, vec![]);

        assert_eq!(
            store.apply_outcome(
                WizardStep::BusinessInformation,
                first,
                Ok(vec![exact(MatchField::Business(BusinessReason::BusinessName))]),
            ),
            Applied::Discarded
        );
        assert_eq!(
            store.apply_outcome(WizardStep::BusinessInformation, second, Ok(vec![])),
            Applied::Advanced(WizardStep::Locations)
        );
    }

    #[test]
    fn edits_clear_derived_state_and_cancel_pending_requests() {
        let mut store = WizardStore::default();
        warn_on_business(&mut store);
        store.set_acknowledgement(true);

        let cancelled = store.set_field(FieldKey::Business(BusinessField::FirstName), "Jim");
        assert_eq!(cancelled, None);
        let state = store.state(WizardStep::BusinessInformation);
        assert_eq!(state.status, MatchStatus::Stale);
        assert!(state.field_states.is_empty());
        assert!(!state.acknowledged);
        assert!(store.next_enabled());

        let version = store.begin_check(WizardStep::BusinessInformation, vec![]);
        let cancelled = store.set_field(FieldKey::Business(BusinessField::LastName), "Baxter");
        assert_eq!(cancelled, Some(WizardStep::BusinessInformation));
        assert_eq!(
            store.apply_outcome(WizardStep::BusinessInformation, version, Ok(vec![])),
            Applied::Discarded
        );
    }

    #[test]
    fn failures_block_until_retried() {
        let mut store = WizardStore::default();
        let version = store.begin_check(WizardStep::BusinessInformation, vec![]);
        let applied = store.apply_outcome(
            WizardStep::BusinessInformation,
            version,
            Err("connection refused".to_string()),
        );

        assert_eq!(applied, Applied::Failed("connection refused".to_string()));
        assert_eq!(store.current_step(), WizardStep::BusinessInformation);
        assert!(!store.go_next());
        assert!(store.next_enabled());
    }

    #[test]
    fn out_of_range_sections_fail_closed() {
        let mut store = WizardStore::default();
        let (only, _) = store.add_address();
        let version = store.begin_check(WizardStep::Locations, vec![only]);
        let applied = store.apply_outcome(
            WizardStep::Locations,
            version,
            Ok(vec![fuzzy(MatchField::Address {
                index: 3,
                reason: AddressReason::EmailAddress,
            })]),
        );
        assert!(matches!(applied, Applied::Failed(_)));
    }

    #[test]
    fn adding_an_address_clears_the_missing_location_issue() {
        let mut store = WizardStore::default();
        let issues = crate::validation::validate_step(
            store.form(),
            WizardStep::Locations,
            chrono::NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        );
        store.record_issues(WizardStep::Locations, issues);
        assert_eq!(store.state(WizardStep::Locations).issues.len(), 1);

        store.add_address();
        assert!(store.state(WizardStep::Locations).issues.is_empty());
    }

    #[test]
    fn only_sections_with_entries_are_notified_and_expanded() {
        let mut store = WizardStore::default();
        let (first, _) = store.add_address();
        let (second, _) = store.add_address();
        let version = store.begin_check(WizardStep::Locations, vec![first, second]);
        store.apply_outcome(
            WizardStep::Locations,
            version,
            Ok(vec![fuzzy(MatchField::Address {
                index: 1,
                reason: AddressReason::EmailAddress,
            })]),
        );

        assert!(store.notification(WizardStep::Locations, first).is_none());
        assert!(!store.is_expanded(WizardStep::Locations, first));
        assert!(store.notification(WizardStep::Locations, second).is_some());
        assert!(store.is_expanded(WizardStep::Locations, second));
        assert_eq!(
            store.field_state(&FieldKey::Address(second, AddressField::EmailAddress)),
            FieldMatchState::Warning
        );

        store.remove_address(first);
        assert_eq!(
            store.state(WizardStep::Locations).status,
            MatchStatus::Stale
        );
        assert!(store.notification(WizardStep::Locations, second).is_none());
    }
}
