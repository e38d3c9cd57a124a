use actix_web::{Responder, get, web};
use serde::Serialize;

use crate::repository::DieselRepository;
use crate::routes::respond;
use crate::services::ServiceError;

#[derive(Debug, Serialize)]
struct Health {
    version: &'static str,
    database: &'static str,
}

/// Liveness probe. Unauthenticated.
#[get("/health")]
pub async fn health(repo: web::Data<DieselRepository>) -> impl Responder {
    let result = repo
        .ping()
        .map(|()| Health {
            version: env!("CARGO_PKG_VERSION"),
            database: "ok",
        })
        .map_err(|err| ServiceError::Internal(format!("Database unavailable: {err}")));
    respond(result)
}
