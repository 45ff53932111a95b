use validator::Validate;

use crate::domain::candidate::MatchCandidateInput;
use crate::domain::fields::WizardStep;
use crate::domain::match_result::MatchResult;
use crate::matching;
use crate::repository::ClientRegistryReader;
use crate::services::{ServiceError, ServiceResult};

/// Matches the part of `input` that belongs to step `step_number` against
/// the registry.
pub fn find_matches<R>(
    repo: &R,
    step_number: u8,
    input: MatchCandidateInput,
) -> ServiceResult<Vec<MatchResult>>
where
    R: ClientRegistryReader + ?Sized,
{
    let step = WizardStep::from_number(step_number)?;
    if !step.is_matchable() {
        return Err(ServiceError::Form(format!(
            "Step {step_number} has no matchable fields"
        )));
    }

    if let Err(e) = input.validate() {
        return Err(ServiceError::Form(e.to_string()));
    }

    let input = input.subset_for(step);
    let results = matching::find_matches(repo, step, &input)?;
    log::debug!("Step {step_number} produced {} match entries", results.len());
    Ok(results)
}
