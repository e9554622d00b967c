//! PostgreSQL persistence for the product catalog.
//!
//! [`PostgresProductRepository`] implements [`domain::ProductRepository`]
//! with sqlx. Schema migrations live in the workspace `migrations/` directory.

pub mod error;
pub mod postgres;

pub use error::{Result, StoreError};
pub use postgres::PostgresProductRepository;
