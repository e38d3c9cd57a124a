//! JSON handlers mounted under `/api`.
//!
//! Every handler answers with the [`ActionResponse`] envelope. Reads are served
//! from the [`TaggedCache`] when possible and mutations invalidate the tags
//! they touch once they succeed.

use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;

use crate::auth::AuthenticatedUser;
use crate::cache::{TaggedCache, tags};
use crate::dto::{ActionResponse, Refreshed};
use crate::repository::MemberReader;
use crate::services::access::require_member;
use crate::services::{ServiceError, ServiceResult};

pub mod address;
pub mod address_lookup;
pub mod category;
pub mod client;
pub mod contact;
pub mod fiscal_year;
pub mod health;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod product;
pub mod supplier;
pub mod tag;

/// Renders a failed operation. Internal details only reach the log.
pub fn failure(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::Internal(details) => log::error!("Request failed: {details}"),
        ServiceError::Upstream(details) => log::warn!("Upstream failure: {details}"),
        _ => {}
    }
    let (code, body) = ActionResponse::from_error(err);
    HttpResponse::build(code).json(body)
}

fn success<T: Serialize>(code: StatusCode, data: T) -> HttpResponse {
    HttpResponse::build(code).json(ActionResponse::success(data))
}

/// Renders an uncached read.
pub fn respond<T: Serialize>(result: ServiceResult<T>) -> HttpResponse {
    match result {
        Ok(data) => success(StatusCode::OK, data),
        Err(err) => failure(&err),
    }
}

/// Renders a mutation and, when it succeeded, drops the cache entries
/// carrying any of the tags computed from its result.
pub fn mutated<T, F>(
    cache: &TaggedCache,
    code: StatusCode,
    result: ServiceResult<T>,
    tags_of: F,
) -> HttpResponse
where
    T: Serialize,
    F: FnOnce(&T) -> Vec<String>,
{
    match result {
        Ok(data) => {
            let dropped = cache.invalidate(&tags_of(&data));
            if dropped > 0 {
                log::debug!("Invalidated {dropped} cached responses");
            }
            success(code, data)
        }
        Err(err) => failure(&err),
    }
}

/// Serves `key` from the cache or runs `load` and stores its result under
/// the tags computed from it. Failures are never cached.
pub fn cached<T, L, F>(cache: &TaggedCache, key: String, load: L, tags_of: F) -> HttpResponse
where
    T: Serialize,
    L: FnOnce() -> ServiceResult<T>,
    F: FnOnce(&T) -> Vec<String>,
{
    if let Some(hit) = cache.get(&key) {
        return success(StatusCode::OK, hit);
    }

    let data = match load() {
        Ok(data) => data,
        Err(err) => return failure(&err),
    };
    match serde_json::to_value(&data) {
        Ok(value) => {
            cache.insert(key, value.clone(), tags_of(&data));
            success(StatusCode::OK, value)
        }
        Err(err) => failure(&ServiceError::Internal(format!(
            "Failed to serialize response: {err}"
        ))),
    }
}

/// Cache key of a read. Keys are scoped to the caller so a hit never skips
/// another user's access check.
pub fn cache_key(user: &AuthenticatedUser, req: &HttpRequest, query: &str) -> String {
    format!("{}:{}?{}", user.sub, req.path(), query)
}

/// Tags of an organization-scoped read. Membership changes flush them too.
pub fn scoped(organization_id: i32, mut list: Vec<String>) -> Vec<String> {
    list.push(tags::members(organization_id));
    list
}

/// Drops cached reads of an organization on request of one of its members.
pub fn refresh<R>(
    repo: &R,
    cache: &TaggedCache,
    user: &AuthenticatedUser,
    organization_id: i32,
    list: Vec<String>,
) -> HttpResponse
where
    R: MemberReader + ?Sized,
{
    match require_member(repo, user, organization_id) {
        Ok(_) => {
            let invalidated = cache.invalidate(&list);
            log::info!(
                "Refreshed {invalidated} cached responses of organization {organization_id}"
            );
            success(StatusCode::OK, Refreshed { invalidated })
        }
        Err(err) => failure(&err),
    }
}

/// Malformed JSON bodies become validation failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = failure(&ServiceError::TypeConstraint(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Malformed query strings become validation failures.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = failure(&ServiceError::TypeConstraint(err.to_string()));
        InternalError::from_response(err, response).into()
    })
}

/// Path segments that are not ids resolve to nothing.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = failure(&ServiceError::NotFound);
        InternalError::from_response(err, response).into()
    })
}
