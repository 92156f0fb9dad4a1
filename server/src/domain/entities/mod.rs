//! Entidades del dominio

pub mod producto;
pub mod venta;

pub use producto::*;
pub use venta::*;
