//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP classification
//! - JSON response envelopes used by every endpoint
//! - Phantom-typed UUID identifiers
//!
//! Nothing in here knows about users, roles or tokens.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod response;
