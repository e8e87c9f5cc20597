//! Platform Crate - Technical Infrastructure
//!
//! Domain-agnostic building blocks:
//! - Password policy and Argon2id hashing
//! - HS256 JSON Web Token encoding/decoding
//! - Client information (IP, User-Agent) extraction

pub mod client;
pub mod jwt;
pub mod password;
