use actix_web::{HttpResponse, web};

pub mod matches;

/// Registers every endpoint under `/api`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .service(matches::find_client_matches),
    );
}

/// Malformed JSON bodies are answered with 400 and the parser message.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = err.to_string();
        log::warn!("Rejected match payload: {message}");
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({ "message": message })),
        )
        .into()
    })
}
