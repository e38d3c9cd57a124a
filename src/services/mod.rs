//! Business operations behind the HTTP routes.
//!
//! Every function authenticates through [`access`], converts forms into typed
//! payloads and talks to the repository through the narrowest trait bound it
//! needs.

pub mod access;
pub mod address;
pub mod address_lookup;
pub mod category;
pub mod client;
pub mod contact;
pub mod errors;
pub mod fiscal_year;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod product;
pub mod supplier;
pub mod tag;

pub use errors::{ServiceError, ServiceResult};

use crate::domain::types::TypeConstraintError;

/// Converts a path identifier, reporting a malformed one as missing.
pub(crate) fn path_id<T>(
    raw: i32,
    build: fn(i32) -> Result<T, TypeConstraintError>,
) -> ServiceResult<T> {
    build(raw).map_err(|_| ServiceError::NotFound)
}
