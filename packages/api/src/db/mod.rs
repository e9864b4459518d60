//! # Database module — PostgreSQL persistence
//!
//! Gated behind the `postgres` feature so the core and its tests build without
//! SQLx.
//!
//! - [`connect`] opens a pool (up to 5 connections) for an explicit URL.
//! - [`migrate`] applies the embedded migrations in `packages/api/migrations`.
//! - [`PgStore`] implements [`store::Store`] on that pool. Owner-guarded writes
//!   are single statements; unique and foreign-key violations are reported as
//!   [`store::StoreError::Duplicate`] and [`store::StoreError::MissingReference`].

mod pool;
mod postgres;

pub use pool::{connect, migrate};
pub use postgres::PgStore;
pub use sqlx::PgPool;
