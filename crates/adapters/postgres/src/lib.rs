//! pos-adapter-postgres - Adaptador de PostgreSQL
//!
//! Pool de conexiones, transacciones y migraciones de arranque.

mod connection;
mod migration;
mod transaction;

pub use connection::*;
pub use migration::*;
pub use transaction::*;
