//! Persistencia en PostgreSQL

pub mod postgres;
pub mod schema;

pub use postgres::{PostgresProductoRepository, PostgresVentaRepository};
