//! Producto del catálogo

use chrono::{DateTime, Utc};
use pos_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Entrada del catálogo de productos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Producto {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub codigo_interno_sku: String,
    pub codigo_barras: Option<String>,
    pub img: Option<String>,
    pub stock_disponible: i64,
    pub habilitar_stock: bool,
    pub precio_unitario: f64,
    pub created_at: DateTime<Utc>,
}

/// Campos de un producto sujetos a unicidad
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampoUnico {
    Nombre,
    Sku,
    CodigoBarras,
}

impl CampoUnico {
    /// Columna correspondiente en la tabla `productos`
    pub fn columna(&self) -> &'static str {
        match self {
            CampoUnico::Nombre => "nombre",
            CampoUnico::Sku => "codigo_interno_sku",
            CampoUnico::CodigoBarras => "codigo_barras",
        }
    }

    /// Nombre de la restricción UNIQUE en el esquema
    pub fn restriccion(&self) -> &'static str {
        match self {
            CampoUnico::Nombre => "productos_nombre_key",
            CampoUnico::Sku => "productos_codigo_interno_sku_key",
            CampoUnico::CodigoBarras => "productos_codigo_barras_key",
        }
    }

    /// Mensaje de conflicto que nombra el campo duplicado
    pub fn mensaje_conflicto(&self) -> &'static str {
        match self {
            CampoUnico::Nombre => "El nombre ya existe",
            CampoUnico::Sku => "El SKU ya existe",
            CampoUnico::CodigoBarras => "El código de barras ya existe",
        }
    }

    /// Campo a partir del nombre de la restricción violada
    pub fn desde_restriccion(nombre: &str) -> Option<Self> {
        [Self::Nombre, Self::Sku, Self::CodigoBarras]
            .into_iter()
            .find(|campo| campo.restriccion() == nombre)
    }
}

/// Cuerpo de creación/actualización de un producto.
///
/// Toda llamada debe traer el conjunto completo de atributos mutables; no
/// hay actualización parcial.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductoInput {
    pub nombre: Option<String>,
    pub descripcion: Option<String>,
    pub codigo_interno_sku: Option<String>,
    pub codigo_barras: Option<String>,
    pub img: Option<String>,
    pub stock_disponible: Option<i64>,
    #[serde(default)]
    pub habilitar_stock: bool,
    pub precio_unitario: Option<f64>,
}

/// Producto validado, listo para escribir en el almacenamiento
#[derive(Debug, Clone, PartialEq)]
pub struct ProductoValidado {
    pub nombre: String,
    pub descripcion: Option<String>,
    pub codigo_interno_sku: String,
    pub codigo_barras: Option<String>,
    pub img: Option<String>,
    pub stock_disponible: i64,
    pub habilitar_stock: bool,
    pub precio_unitario: f64,
}

impl ProductoInput {
    /// Valida campos obligatorios y rangos; normaliza los opcionales.
    ///
    /// Un texto vacío cuenta como ausente, igual que en las validaciones
    /// del cliente.
    pub fn validar(self) -> AppResult<ProductoValidado> {
        let nombre = normalizar(self.nombre);
        let codigo_interno_sku = normalizar(self.codigo_interno_sku);

        let (Some(nombre), Some(codigo_interno_sku), Some(precio_unitario)) =
            (nombre, codigo_interno_sku, self.precio_unitario)
        else {
            return Err(AppError::validation("Faltan campos obligatorios"));
        };

        if precio_unitario <= 0.0 {
            return Err(AppError::validation("El precio debe ser mayor a 0"));
        }

        let stock_disponible = self.stock_disponible.unwrap_or(0);
        if stock_disponible < 0 {
            return Err(AppError::validation("El stock no puede ser negativo"));
        }

        Ok(ProductoValidado {
            nombre,
            descripcion: normalizar(self.descripcion),
            codigo_interno_sku,
            codigo_barras: normalizar(self.codigo_barras),
            img: normalizar(self.img),
            stock_disponible,
            habilitar_stock: self.habilitar_stock,
            precio_unitario,
        })
    }
}

/// Texto recortado, con vacío tratado como ausente
pub fn normalizar(valor: Option<String>) -> Option<String> {
    valor
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entrada_valida() -> ProductoInput {
        ProductoInput {
            nombre: Some("Lápiz".to_string()),
            codigo_interno_sku: Some("LP-1".to_string()),
            precio_unitario: Some(5.0),
            ..Default::default()
        }
    }

    #[test]
    fn entrada_completa_es_valida() {
        let producto = entrada_valida().validar().unwrap();
        assert_eq!(producto.nombre, "Lápiz");
        assert_eq!(producto.codigo_interno_sku, "LP-1");
        assert_eq!(producto.stock_disponible, 0);
        assert!(!producto.habilitar_stock);
    }

    #[test]
    fn nombre_ausente_o_vacio_falla() {
        let mut input = entrada_valida();
        input.nombre = None;
        let err = input.validar().unwrap_err();
        assert_eq!(err.to_string(), "Faltan campos obligatorios");

        let mut input = entrada_valida();
        input.nombre = Some("   ".to_string());
        let err = input.validar().unwrap_err();
        assert_eq!(err.to_string(), "Faltan campos obligatorios");
    }

    #[test]
    fn precio_cero_o_negativo_falla() {
        let mut input = entrada_valida();
        input.precio_unitario = Some(0.0);
        let err = input.validar().unwrap_err();
        assert_eq!(err.to_string(), "El precio debe ser mayor a 0");

        let mut input = entrada_valida();
        input.precio_unitario = Some(-3.5);
        assert!(input.validar().is_err());
    }

    #[test]
    fn precio_ausente_es_campo_obligatorio() {
        let mut input = entrada_valida();
        input.precio_unitario = None;
        let err = input.validar().unwrap_err();
        assert_eq!(err.to_string(), "Faltan campos obligatorios");
    }

    #[test]
    fn stock_negativo_falla() {
        let mut input = entrada_valida();
        input.stock_disponible = Some(-1);
        let err = input.validar().unwrap_err();
        assert_eq!(err.to_string(), "El stock no puede ser negativo");
    }

    #[test]
    fn codigo_barras_vacio_queda_ausente() {
        let mut input = entrada_valida();
        input.codigo_barras = Some("".to_string());
        let producto = input.validar().unwrap();
        assert_eq!(producto.codigo_barras, None);
    }

    #[test]
    fn restriccion_a_campo() {
        assert_eq!(
            CampoUnico::desde_restriccion("productos_nombre_key"),
            Some(CampoUnico::Nombre)
        );
        assert_eq!(
            CampoUnico::desde_restriccion("productos_codigo_barras_key"),
            Some(CampoUnico::CodigoBarras)
        );
        assert_eq!(CampoUnico::desde_restriccion("otra_restriccion"), None);
    }
}
