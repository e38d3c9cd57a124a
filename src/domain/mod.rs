//! Domain aggregates exposed by the business-management service layer.

pub mod address;
pub mod category;
pub mod client;
pub mod contact;
pub mod fiscal_year;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod party;
pub mod product;
pub mod supplier;
pub mod tag;
pub mod types;
