//! Database models mapped onto the SQLite schema.

pub mod address;
pub mod category;
pub mod client;
#[cfg(feature = "server")]
pub mod config;
pub mod contact;
pub mod fiscal_year;
pub mod invitation;
pub mod member;
pub mod organization;
pub mod product;
pub mod supplier;
pub mod tag;
