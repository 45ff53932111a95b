use actix_web::{HttpResponse, Responder, post, web};

use crate::domain::candidate::MatchCandidateInput;
use crate::repository::DieselRepository;
use crate::services::{ServiceError, matches as matches_service};

#[derive(serde::Serialize)]
struct ErrorBody {
    message: String,
}

#[post("/clients/matches/{step}")]
pub async fn find_client_matches(
    step: web::Path<u8>,
    repo: web::Data<DieselRepository>,
    web::Json(input): web::Json<MatchCandidateInput>,
) -> impl Responder {
    let step = step.into_inner();
    let repo = repo.into_inner();

    // Registry lookups are blocking Diesel calls.
    let result =
        web::block(move || matches_service::find_matches(repo.as_ref(), step, input)).await;

    match result {
        Ok(Ok(results)) => HttpResponse::Ok().json(results),
        Ok(Err(ServiceError::Form(message) | ServiceError::TypeConstraint(message))) => {
            HttpResponse::BadRequest().json(ErrorBody { message })
        }
        Ok(Err(err)) => {
            log::error!("Failed to match step {step}: {err}");
            HttpResponse::InternalServerError().finish()
        }
        Err(err) => {
            log::error!("Match worker for step {step} failed: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
