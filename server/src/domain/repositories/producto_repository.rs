//! Contrato de persistencia de productos

use async_trait::async_trait;
use pos_errors::AppResult;

use crate::domain::entities::{CampoUnico, Producto, ProductoValidado};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductoRepository: Send + Sync {
    /// Todos los productos, del más reciente al más antiguo
    async fn listar(&self) -> AppResult<Vec<Producto>>;

    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Producto>>;

    /// Búsqueda por subcadena sobre nombre, descripción, SKU y código de
    /// barras; como máximo 20 resultados
    async fn buscar(&self, query: &str) -> AppResult<Vec<Producto>>;

    /// Indica si otro producto distinto de `excluir` ya usa `valor` en el
    /// campo dado
    async fn existe_campo(
        &self,
        campo: CampoUnico,
        valor: &str,
        excluir: Option<i64>,
    ) -> AppResult<bool>;

    /// Inserta el producto y devuelve el id asignado
    async fn crear(&self, producto: &ProductoValidado) -> AppResult<i64>;

    /// Sobrescribe todos los atributos mutables del producto
    async fn actualizar(&self, id: i64, producto: &ProductoValidado) -> AppResult<()>;

    /// Elimina por id; la ausencia del id no es un error
    async fn eliminar(&self, id: i64) -> AppResult<()>;
}
