use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::domain::candidate::MatchCandidateInput;
use crate::domain::fields::WizardStep;
use crate::domain::match_result::MatchResult;
use crate::models::config::MatchClientConfig;
use crate::orchestrator::{GatewayError, MatchGateway, RetryPolicy};

/// Calls `POST {base_url}/api/clients/matches/{step}`.
#[derive(Debug, Clone)]
pub struct HttpMatchGateway {
    client: Client,
    base_url: String,
}

impl HttpMatchGateway {
    pub fn new(config: &MatchClientConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, step: WizardStep) -> String {
        format!("{}/api/clients/matches/{}", self.base_url, step.number())
    }
}

/// Retry policy described by the client configuration.
pub fn retry_policy(config: &MatchClientConfig) -> RetryPolicy {
    RetryPolicy {
        max_retries: config.max_retries,
        backoff: Duration::from_millis(config.retry_backoff_ms),
    }
}

/// Decodes a successful response body.
fn decode(body: &[u8]) -> Result<Vec<MatchResult>, GatewayError> {
    serde_json::from_slice(body).map_err(|e| GatewayError::Malformed(e.to_string()))
}

#[async_trait]
impl MatchGateway for HttpMatchGateway {
    async fn find_matches(
        &self,
        step: WizardStep,
        input: &MatchCandidateInput,
    ) -> Result<Vec<MatchResult>, GatewayError> {
        let response = self
            .client
            .post(self.endpoint(step))
            .json(input)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            log::error!("Matching endpoint answered {status} for {step:?}");
            return Err(GatewayError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        decode(&body)
    }
}
