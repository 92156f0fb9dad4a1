//! Contrato de persistencia de ventas

use async_trait::async_trait;
use pos_errors::AppResult;

use crate::domain::entities::{Venta, VentaConItems, VentaInput};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VentaRepository: Send + Sync {
    /// Registra la cabecera y todos sus items como una sola unidad de
    /// trabajo y devuelve el id de la venta.
    ///
    /// Una escritura parcial (cabecera sin items) nunca debe quedar
    /// visible para los lectores.
    async fn crear(&self, venta: &VentaInput) -> AppResult<i64>;

    /// Las 50 ventas más recientes, sin sus items
    async fn listar_recientes(&self) -> AppResult<Vec<Venta>>;

    /// Venta con su secuencia ordenada de items
    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<VentaConItems>>;
}
