//! Wizard store and orchestrator wired together.

use chrono::NaiveDate;

use crate::domain::fields::{FieldKey, WizardStep};
use crate::domain::types::SectionId;
use crate::orchestrator::{MatchGateway, MatchOrchestrator, MatchRequest, RetryPolicy};
use crate::validation::{FieldIssue, validate_step};
use crate::wizard::{Applied, RequestVersion, WizardStore};

/// Result of pressing Next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The step had nothing to match and the wizard moved on.
    Moved(WizardStep),
    /// A match request was issued; call [`MatchSession::settle`].
    Submitted(RequestVersion),
    /// Local validation failed; nothing was sent.
    Invalid(Vec<FieldIssue>),
    /// Next is disabled on the current step.
    Blocked,
}

pub struct MatchSession<G> {
    store: WizardStore,
    orchestrator: MatchOrchestrator<G>,
}

impl<G> MatchSession<G>
where
    G: MatchGateway + 'static,
{
    pub fn new(store: WizardStore, gateway: G, policy: RetryPolicy) -> Self {
        Self::with_orchestrator(store, MatchOrchestrator::new(gateway, policy))
    }

    pub fn with_orchestrator(store: WizardStore, orchestrator: MatchOrchestrator<G>) -> Self {
        Self {
            store,
            orchestrator,
        }
    }

    pub fn store(&self) -> &WizardStore {
        &self.store
    }

    fn cancel(&mut self, step: Option<WizardStep>) {
        if let Some(step) = step {
            self.orchestrator.cancel(step);
        }
    }

    pub fn set_field(&mut self, key: FieldKey<SectionId>, value: impl Into<String>) {
        let stale = self.store.set_field(key, value);
        self.cancel(stale);
    }

    pub fn add_address(&mut self) -> SectionId {
        let (id, stale) = self.store.add_address();
        self.cancel(stale);
        id
    }

    pub fn remove_address(&mut self, id: SectionId) {
        let stale = self.store.remove_address(id);
        self.cancel(stale);
    }

    pub fn add_contact(&mut self) -> SectionId {
        let (id, stale) = self.store.add_contact();
        self.cancel(stale);
        id
    }

    pub fn remove_contact(&mut self, id: SectionId) {
        let stale = self.store.remove_contact(id);
        self.cancel(stale);
    }

    pub fn set_acknowledgement(&mut self, checked: bool) {
        self.store.set_acknowledgement(checked);
    }

    pub fn toggle_section(&mut self, step: WizardStep, id: SectionId) {
        self.store.toggle_section(step, id);
    }

    /// Presses Next: validates the step locally, then asks for a fresh match
    /// check. Every attempt goes to the endpoint, even without edits.
    pub fn advance(&mut self, today: NaiveDate) -> Advance {
        if !self.store.next_enabled() {
            return Advance::Blocked;
        }
        let step = self.store.current_step();
        if !step.is_matchable() {
            return if self.store.go_next() {
                Advance::Moved(self.store.current_step())
            } else {
                Advance::Blocked
            };
        }

        let issues = validate_step(self.store.form(), step, today);
        self.store.record_issues(step, issues.clone());
        if !issues.is_empty() {
            log::debug!("Step {step:?} has {} validation issues", issues.len());
            return Advance::Invalid(issues);
        }

        let (input, sections) = self.store.form().candidate_for(step);
        let version = self.store.begin_check(step, sections);
        self.orchestrator.submit(MatchRequest {
            step,
            version,
            input,
        });
        Advance::Submitted(version)
    }

    /// Waits for the current response of any step and applies it.
    ///
    /// Returns `None` when no request is in flight.
    pub async fn settle(&mut self) -> Option<Applied> {
        let outcome = self.orchestrator.next_outcome().await?;
        let result = outcome.result.map_err(|err| err.to_string());
        Some(
            self.store
                .apply_outcome(outcome.step, outcome.version, result),
        )
    }

    pub fn go_back(&mut self) {
        let left = self.store.go_back();
        self.cancel(left);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{BusinessField, FieldMatchState};
    use crate::domain::match_result::{BusinessReason, MatchField, MatchResult};
    use crate::domain::types::ClientNumber;
    use crate::orchestrator::GatewayError;
    use crate::orchestrator::fake::{PanickingGateway, ScriptedGateway};
    use crate::verdict::VerdictKind;
    use crate::wizard::{ClientForm, MatchStatus};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
    }

    fn company_store() -> WizardStore {
        let mut form = ClientForm::new();
        form.set(FieldKey::Business(BusinessField::ClientType), "U");
        form.set(FieldKey::Business(BusinessField::BusinessName), "Acme Logging");
        WizardStore::new(form)
    }

    fn similar_name() -> Vec<MatchResult> {
        vec![MatchResult::fuzzy(
            MatchField::Business(BusinessReason::BusinessName),
            vec![ClientNumber::new("77").unwrap()],
        )]
    }

    #[tokio::test]
    async fn edited_field_is_rechecked_and_clean_result_moves_on() {
        let gateway = ScriptedGateway::default()
            .then(0, Ok(similar_name()))
            .then(0, Ok(Vec::new()));
        let mut session = MatchSession::new(company_store(), gateway, RetryPolicy::none());

        assert!(matches!(session.advance(today()), Advance::Submitted(_)));
        assert_eq!(
            session.settle().await,
            Some(Applied::Blocked(VerdictKind::Warning))
        );
        assert_eq!(
            session
                .store()
                .field_state(&FieldKey::Business(BusinessField::BusinessName)),
            FieldMatchState::Warning
        );

        session.set_field(
            FieldKey::Business(BusinessField::BusinessName),
            "Acme Forestry Services",
        );
        assert_eq!(
            session
                .store()
                .field_state(&FieldKey::Business(BusinessField::BusinessName)),
            FieldMatchState::Clean
        );

        assert!(matches!(session.advance(today()), Advance::Submitted(_)));
        assert_eq!(
            session.settle().await,
            Some(Applied::Advanced(WizardStep::Locations))
        );
        assert!(!session.store().state(WizardStep::BusinessInformation).acknowledged);
    }

    #[tokio::test]
    async fn invalid_step_is_not_sent() {
        let gateway = ScriptedGateway::default();
        let mut session = MatchSession::new(WizardStore::default(), gateway, RetryPolicy::none());

        let Advance::Invalid(issues) = session.advance(today()) else {
            panic!("expected validation issues");
        };
        assert_eq!(
            issues[0].field,
            Some(FieldKey::Business(BusinessField::ClientType))
        );
        assert_eq!(session.settle().await, None);
    }

    #[tokio::test]
    async fn failed_request_blocks_then_retries_on_next() {
        let gateway = ScriptedGateway::default()
            .then(0, Err(GatewayError::Status(500)))
            .then(0, Ok(Vec::new()));
        let mut session = MatchSession::new(company_store(), gateway, RetryPolicy::none());

        session.advance(today());
        assert!(matches!(session.settle().await, Some(Applied::Failed(_))));
        assert!(matches!(
            session.store().state(WizardStep::BusinessInformation).status,
            MatchStatus::Failed(_)
        ));
        assert_eq!(
            session.store().current_step(),
            WizardStep::BusinessInformation
        );

        session.advance(today());
        assert_eq!(
            session.settle().await,
            Some(Applied::Advanced(WizardStep::Locations))
        );
    }

    #[tokio::test]
    async fn panicking_gateway_leaves_a_retryable_failure() {
        let mut session =
            MatchSession::new(company_store(), PanickingGateway, RetryPolicy::none());

        assert!(matches!(session.advance(today()), Advance::Submitted(_)));
        let applied = tokio::time::timeout(std::time::Duration::from_secs(2), session.settle())
            .await
            .expect("settle returns after a panicked request");
        assert!(matches!(applied, Some(Applied::Failed(_))));
        assert!(session.store().next_enabled());
        assert!(matches!(session.advance(today()), Advance::Submitted(_)));
    }

    #[tokio::test]
    async fn edit_during_request_drops_its_response() {
        let gateway = ScriptedGateway::default().then(30, Ok(similar_name()));
        let mut session = MatchSession::new(company_store(), gateway, RetryPolicy::none());

        session.advance(today());
        session.set_field(FieldKey::Business(BusinessField::ClientAcronym), "ALC");
        assert_eq!(session.settle().await, None);
        assert_eq!(
            session.store().state(WizardStep::BusinessInformation).status,
            MatchStatus::Stale
        );
    }
}
