//! Implementación PostgreSQL de los repositorios

use async_trait::async_trait;
use pos_adapter_postgres::{TransactionManager, unique_violation};
use pos_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::entities::{
    CampoUnico, ItemVenta, ItemVentaInput, Producto, ProductoValidado, Venta, VentaConItems,
    VentaInput,
};
use crate::domain::repositories::{ProductoRepository, VentaRepository};

const COLUMNAS_PRODUCTO: &str = "id, nombre, descripcion, codigo_interno_sku, codigo_barras, \
     img, stock_disponible, habilitar_stock, precio_unitario, created_at";

/// Traduce una violación de UNIQUE en el conflicto del campo afectado
fn mapear_error_escritura(err: sqlx::Error, contexto: &str) -> AppError {
    if let Some(restriccion) = unique_violation(&err) {
        if let Some(campo) = CampoUnico::desde_restriccion(&restriccion) {
            return AppError::conflict(campo.mensaje_conflicto());
        }
    }
    AppError::database(format!("{}: {}", contexto, err))
}

// ============================================================================
// ProductoRepository
// ============================================================================

pub struct PostgresProductoRepository {
    pool: PgPool,
}

impl PostgresProductoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductoRepository for PostgresProductoRepository {
    async fn listar(&self) -> AppResult<Vec<Producto>> {
        sqlx::query_as::<_, Producto>(&format!(
            "SELECT {} FROM productos ORDER BY created_at DESC",
            COLUMNAS_PRODUCTO
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("No se pudieron listar los productos: {}", e)))
    }

    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<Producto>> {
        sqlx::query_as::<_, Producto>(&format!(
            "SELECT {} FROM productos WHERE id = $1",
            COLUMNAS_PRODUCTO
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("No se pudo consultar el producto: {}", e)))
    }

    async fn buscar(&self, query: &str) -> AppResult<Vec<Producto>> {
        let patron = format!("%{}%", query);

        sqlx::query_as::<_, Producto>(&format!(
            r#"
            SELECT {}
            FROM productos
            WHERE nombre LIKE $1
               OR descripcion LIKE $1
               OR codigo_interno_sku LIKE $1
               OR codigo_barras LIKE $1
            LIMIT 20
            "#,
            COLUMNAS_PRODUCTO
        ))
        .bind(patron)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("No se pudo buscar productos: {}", e)))
    }

    async fn existe_campo(
        &self,
        campo: CampoUnico,
        valor: &str,
        excluir: Option<i64>,
    ) -> AppResult<bool> {
        let mut sql = format!(
            "SELECT EXISTS(SELECT 1 FROM productos WHERE {} = $1",
            campo.columna()
        );
        if excluir.is_some() {
            sql.push_str(" AND id != $2");
        }
        sql.push(')');

        let mut consulta = sqlx::query_scalar::<_, bool>(&sql).bind(valor);
        if let Some(id) = excluir {
            consulta = consulta.bind(id);
        }

        consulta
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("No se pudo verificar la unicidad: {}", e)))
    }

    async fn crear(&self, producto: &ProductoValidado) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO productos
            (
                nombre,
                descripcion,
                codigo_interno_sku,
                codigo_barras,
                img,
                stock_disponible,
                habilitar_stock,
                precio_unitario
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&producto.nombre)
        .bind(&producto.descripcion)
        .bind(&producto.codigo_interno_sku)
        .bind(&producto.codigo_barras)
        .bind(&producto.img)
        .bind(producto.stock_disponible)
        .bind(producto.habilitar_stock)
        .bind(producto.precio_unitario)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| mapear_error_escritura(e, "No se pudo crear el producto"))
    }

    async fn actualizar(&self, id: i64, producto: &ProductoValidado) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE productos
            SET
                nombre = $1,
                descripcion = $2,
                codigo_interno_sku = $3,
                codigo_barras = $4,
                img = $5,
                stock_disponible = $6,
                habilitar_stock = $7,
                precio_unitario = $8
            WHERE id = $9
            "#,
        )
        .bind(&producto.nombre)
        .bind(&producto.descripcion)
        .bind(&producto.codigo_interno_sku)
        .bind(&producto.codigo_barras)
        .bind(&producto.img)
        .bind(producto.stock_disponible)
        .bind(producto.habilitar_stock)
        .bind(producto.precio_unitario)
        .bind(id)
        .execute(&self.pool)
        .await
        .map(|_| ())
        .map_err(|e| mapear_error_escritura(e, "No se pudo actualizar el producto"))
    }

    async fn eliminar(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM productos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| AppError::database(format!("No se pudo eliminar el producto: {}", e)))
    }
}

// ============================================================================
// VentaRepository
// ============================================================================

pub struct PostgresVentaRepository {
    tx: TransactionManager,
}

impl PostgresVentaRepository {
    pub fn new(tx: TransactionManager) -> Self {
        Self { tx }
    }

    async fn insertar_item(
        tx: &mut Transaction<'static, Postgres>,
        venta_id: i64,
        item: &ItemVentaInput,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO items_ventas
            (
                venta_id,
                producto_id,
                producto_nombre,
                producto_sku,
                cantidad,
                precio_unitario,
                subtotal,
                es_personalizado
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(venta_id)
        .bind(item.producto_id)
        .bind(&item.nombre)
        .bind(&item.codigo_interno_sku)
        .bind(item.cantidad)
        .bind(item.precio_unitario)
        .bind(item.subtotal)
        .bind(item.es_personalizado)
        .execute(&mut **tx)
        .await
        .map(|_| ())
        .map_err(|e| AppError::database(format!("No se pudo registrar el item: {}", e)))
    }
}

#[async_trait]
impl VentaRepository for PostgresVentaRepository {
    async fn crear(&self, venta: &VentaInput) -> AppResult<i64> {
        // La cabecera y todos los items se confirman juntos o no queda nada.
        let mut tx = self.tx.begin().await?;

        let venta_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO ventas
            (
                tipo,
                subtotal,
                descuento,
                total,
                cliente_nombre,
                cliente_contacto
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&venta.tipo)
        .bind(venta.subtotal)
        .bind(venta.descuento)
        .bind(venta.total)
        .bind(&venta.cliente_nombre)
        .bind(&venta.cliente_contacto)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("No se pudo registrar la venta: {}", e)))?;

        for item in &venta.items {
            if let Err(e) = Self::insertar_item(&mut tx, venta_id, item).await {
                TransactionManager::rollback(tx).await.ok();
                return Err(e);
            }
        }

        TransactionManager::commit(tx).await?;
        Ok(venta_id)
    }

    async fn listar_recientes(&self) -> AppResult<Vec<Venta>> {
        sqlx::query_as::<_, Venta>(
            r#"
            SELECT id, tipo, subtotal, descuento, total,
                   cliente_nombre, cliente_contacto, fecha_creacion
            FROM ventas
            ORDER BY fecha_creacion DESC
            LIMIT 50
            "#,
        )
        .fetch_all(self.tx.pool())
        .await
        .map_err(|e| AppError::database(format!("No se pudieron listar las ventas: {}", e)))
    }

    async fn buscar_por_id(&self, id: i64) -> AppResult<Option<VentaConItems>> {
        let venta = sqlx::query_as::<_, Venta>(
            r#"
            SELECT id, tipo, subtotal, descuento, total,
                   cliente_nombre, cliente_contacto, fecha_creacion
            FROM ventas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.tx.pool())
        .await
        .map_err(|e| AppError::database(format!("No se pudo consultar la venta: {}", e)))?;

        let Some(venta) = venta else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, ItemVenta>(
            r#"
            SELECT id, venta_id, producto_id, producto_nombre, producto_sku,
                   cantidad, precio_unitario, subtotal, es_personalizado
            FROM items_ventas
            WHERE venta_id = $1
            ORDER BY id
            "#,
        )
        .bind(id)
        .fetch_all(self.tx.pool())
        .await
        .map_err(|e| AppError::database(format!("No se pudieron consultar los items: {}", e)))?;

        Ok(Some(VentaConItems { venta, items }))
    }
}
