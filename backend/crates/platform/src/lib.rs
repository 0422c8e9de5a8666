//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, signed tokens, Base64)
//! - Password hashing (Argon2id)
//! - Cookie and bearer-token extraction
//! - Ant-style path patterns used by the authentication exemption list
//! - Image format sniffing for uploads

pub mod cookie;
pub mod crypto;
pub mod image;
pub mod password;
pub mod path_pattern;
