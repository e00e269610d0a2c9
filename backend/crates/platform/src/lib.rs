//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random bytes, constant-time compare, Base64)
//! - Password hashing (Argon2id) with policy validation and zeroization
//! - Cookie building and extraction

pub mod cookie;
pub mod crypto;
pub mod password;
