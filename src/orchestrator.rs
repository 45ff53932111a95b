//! Issues match requests for wizard steps and reconciles their responses.
//!
//! Each step has at most one request in flight. Submitting a new request for
//! a step aborts the previous task, and any response that still slips through
//! is dropped by comparing its [`RequestVersion`] with the current one.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

use crate::domain::candidate::MatchCandidateInput;
use crate::domain::fields::WizardStep;
use crate::domain::match_result::MatchResult;
use crate::wizard::RequestVersion;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("matching endpoint answered with status {0}")]
    Status(u16),

    #[error("malformed match response: {0}")]
    Malformed(String),
}

impl GatewayError {
    /// Failures worth retrying: transport errors, 5xx and 429.
    pub fn is_transient(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Status(code) => *code >= 500 || *code == 429,
            GatewayError::Malformed(_) => false,
        }
    }
}

/// Source of match results for a step.
#[async_trait]
pub trait MatchGateway: Send + Sync {
    async fn find_matches(
        &self,
        step: WizardStep,
        input: &MatchCandidateInput,
    ) -> Result<Vec<MatchResult>, GatewayError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    /// Delay before the first retry; each further retry waits one more step.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub step: WizardStep,
    pub version: RequestVersion,
    pub input: MatchCandidateInput,
}

#[derive(Debug)]
pub struct MatchOutcome {
    pub step: WizardStep,
    pub version: RequestVersion,
    pub result: Result<Vec<MatchResult>, GatewayError>,
}

async fn find_with_retry<G>(
    gateway: &G,
    step: WizardStep,
    input: &MatchCandidateInput,
    policy: RetryPolicy,
) -> Result<Vec<MatchResult>, GatewayError>
where
    G: MatchGateway + ?Sized,
{
    let mut attempt = 0;
    loop {
        match gateway.find_matches(step, input).await {
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                attempt += 1;
                log::warn!("Match request for {step:?} failed ({err}), retry {attempt}");
                tokio::time::sleep(policy.backoff * attempt).await;
            }
            result => return result,
        }
    }
}

/// Reports the outcome of one request task exactly once.
///
/// A task that panics or is aborted drops its reporter unsent, which reports
/// a transport failure instead so the step never stays pending.
struct OutcomeReporter {
    step: WizardStep,
    version: RequestVersion,
    sender: mpsc::UnboundedSender<MatchOutcome>,
    sent: bool,
}

impl OutcomeReporter {
    fn send(&mut self, result: Result<Vec<MatchResult>, GatewayError>) {
        self.sent = true;
        let (step, version) = (self.step, self.version);
        if self
            .sender
            .send(MatchOutcome {
                step,
                version,
                result,
            })
            .is_err()
        {
            log::debug!("Orchestrator dropped before {step:?} {version} completed");
        }
    }
}

impl Drop for OutcomeReporter {
    fn drop(&mut self) {
        if !self.sent {
            log::debug!(
                "Match request {} for {:?} stopped without a response",
                self.version,
                self.step
            );
            self.send(Err(GatewayError::Transport(
                "match request stopped without a response".to_string(),
            )));
        }
    }
}

pub struct MatchOrchestrator<G> {
    gateway: Arc<G>,
    policy: RetryPolicy,
    in_flight: HashMap<WizardStep, (RequestVersion, AbortHandle)>,
    sender: mpsc::UnboundedSender<MatchOutcome>,
    receiver: mpsc::UnboundedReceiver<MatchOutcome>,
}

impl<G> MatchOrchestrator<G>
where
    G: MatchGateway + 'static,
{
    pub fn new(gateway: G, policy: RetryPolicy) -> Self {
        Self::with_shared(Arc::new(gateway), policy)
    }

    pub fn with_shared(gateway: Arc<G>, policy: RetryPolicy) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            gateway,
            policy,
            in_flight: HashMap::new(),
            sender,
            receiver,
        }
    }

    /// Starts `request`, aborting any earlier request of the same step.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self, request: MatchRequest) {
        let MatchRequest {
            step,
            version,
            input,
        } = request;
        self.cancel(step);

        let gateway = Arc::clone(&self.gateway);
        let mut reporter = OutcomeReporter {
            step,
            version,
            sender: self.sender.clone(),
            sent: false,
        };
        let policy = self.policy;
        let task = tokio::spawn(async move {
            let result = find_with_retry(gateway.as_ref(), step, &input, policy).await;
            reporter.send(result);
        });
        log::debug!("Submitted match request {version} for {step:?}");
        self.in_flight.insert(step, (version, task.abort_handle()));
    }

    /// Aborts the in-flight request of `step`. Returns whether one existed.
    pub fn cancel(&mut self, step: WizardStep) -> bool {
        match self.in_flight.remove(&step) {
            Some((version, handle)) => {
                handle.abort();
                log::debug!("Cancelled match request {version} for {step:?}");
                true
            }
            None => false,
        }
    }

    pub fn is_pending(&self, step: WizardStep) -> bool {
        self.in_flight.contains_key(&step)
    }

    /// Waits for the next response that is still current.
    ///
    /// Returns `None` when nothing is in flight.
    pub async fn next_outcome(&mut self) -> Option<MatchOutcome> {
        while !self.in_flight.is_empty() {
            let outcome = self.receiver.recv().await?;
            let current = self
                .in_flight
                .get(&outcome.step)
                .is_some_and(|(version, _)| *version == outcome.version);
            if current {
                self.in_flight.remove(&outcome.step);
                return Some(outcome);
            }
            log::debug!(
                "Discarding stale response {} for {:?}",
                outcome.version,
                outcome.step
            );
        }
        None
    }
}

impl<G> Drop for MatchOrchestrator<G> {
    fn drop(&mut self) {
        for (_, handle) in self.in_flight.values() {
            handle.abort();
        }
    }
}
