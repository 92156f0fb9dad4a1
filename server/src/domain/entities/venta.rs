//! Venta y sus items

use chrono::{DateTime, Utc};
use pos_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Cabecera de una venta registrada
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Venta {
    pub id: i64,
    pub tipo: String,
    pub subtotal: f64,
    pub descuento: f64,
    pub total: f64,
    pub cliente_nombre: Option<String>,
    pub cliente_contacto: Option<String>,
    pub fecha_creacion: DateTime<Utc>,
}

/// Item persistido de una venta.
///
/// Guarda una instantánea del producto al momento de la venta;
/// `producto_id` queda en NULL para items personalizados.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ItemVenta {
    pub id: i64,
    pub venta_id: i64,
    pub producto_id: Option<i64>,
    pub producto_nombre: String,
    pub producto_sku: String,
    pub cantidad: i64,
    pub precio_unitario: f64,
    pub subtotal: f64,
    pub es_personalizado: bool,
}

/// Venta con sus items, tal como se expone al cliente
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentaConItems {
    #[serde(flatten)]
    pub venta: Venta,
    pub items: Vec<ItemVenta>,
}

/// Cuerpo de creación de una venta
#[derive(Debug, Clone, Deserialize)]
pub struct VentaInput {
    pub tipo: String,
    pub subtotal: f64,
    pub descuento: f64,
    pub total: f64,
    pub cliente_nombre: Option<String>,
    pub cliente_contacto: Option<String>,
    #[serde(default)]
    pub items: Vec<ItemVentaInput>,
}

/// Item dentro del cuerpo de creación de una venta
#[derive(Debug, Clone, Deserialize)]
pub struct ItemVentaInput {
    pub producto_id: Option<i64>,
    pub nombre: String,
    pub codigo_interno_sku: String,
    pub cantidad: i64,
    pub precio_unitario: f64,
    pub subtotal: f64,
    #[serde(default)]
    pub es_personalizado: bool,
}

impl VentaInput {
    /// Una venta sin items no puede existir.
    pub fn validar(&self) -> AppResult<()> {
        if self.items.is_empty() {
            return Err(AppError::validation("La venta debe incluir al menos un item"));
        }
        Ok(())
    }
}
