//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Upstream HTTP client construction (timeout, User-Agent, rustls)
//! - Time-boxed in-memory caching with single-flight fetch coalescing

pub mod cache;
pub mod http;
