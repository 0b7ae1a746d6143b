//! Domain Layer - Business logic and entities
//!
//! This layer contains:
//! - Domain entities (PlayerRecord, RatingSnapshot, RankedEntry)
//! - Domain value objects (Category, Direction, TrendSummary)
//! - Domain services (ranking, trend and percentage calculators)
//! - Repository / provider traits (interfaces)

pub mod entities;
pub mod services;
pub mod repository;
pub mod value_objects;
