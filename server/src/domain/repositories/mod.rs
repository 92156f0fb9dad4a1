//! Contratos de los repositorios

pub mod producto_repository;
pub mod venta_repository;

pub use producto_repository::ProductoRepository;
pub use venta_repository::VentaRepository;

#[cfg(test)]
pub use producto_repository::MockProductoRepository;
#[cfg(test)]
pub use venta_repository::MockVentaRepository;
