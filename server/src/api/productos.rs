//! Operaciones sobre el catálogo de productos

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pos_errors::{AppError, AppResult};
use serde::Deserialize;

use super::{ApiJson, AppState, CreatedResponse, ExistsResponse, MessageResponse};
use crate::domain::entities::{CampoUnico, Producto, ProductoInput, ProductoValidado, normalizar};

pub async fn listar(State(state): State<AppState>) -> AppResult<Json<Vec<Producto>>> {
    Ok(Json(state.productos.listar().await?))
}

pub async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Producto>> {
    let producto = state
        .productos
        .buscar_por_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Producto no encontrado"))?;

    Ok(Json(producto))
}

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub query: String,
}

pub async fn buscar(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SearchRequest>,
) -> AppResult<Json<Vec<Producto>>> {
    Ok(Json(state.productos.buscar(&req.query).await?))
}

#[derive(Debug, Deserialize)]
pub struct ValidarNombreRequest {
    pub nombre: Option<String>,
    #[serde(rename = "excludeId")]
    pub exclude_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ValidarSkuRequest {
    pub sku: Option<String>,
    #[serde(rename = "excludeId")]
    pub exclude_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ValidarBarcodeRequest {
    pub barcode: Option<String>,
    #[serde(rename = "excludeId")]
    pub exclude_id: Option<i64>,
}

pub async fn validar_nombre(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ValidarNombreRequest>,
) -> AppResult<Json<ExistsResponse>> {
    let valor = req.nombre.unwrap_or_default();
    existe(&state, CampoUnico::Nombre, &valor, req.exclude_id).await
}

pub async fn validar_sku(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ValidarSkuRequest>,
) -> AppResult<Json<ExistsResponse>> {
    let valor = req.sku.unwrap_or_default();
    existe(&state, CampoUnico::Sku, &valor, req.exclude_id).await
}

pub async fn validar_barcode(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ValidarBarcodeRequest>,
) -> AppResult<Json<ExistsResponse>> {
    // Un código de barras vacío o ausente nunca entra en conflicto
    let Some(valor) = normalizar(req.barcode) else {
        return Ok(Json(ExistsResponse { exists: false }));
    };

    existe(&state, CampoUnico::CodigoBarras, &valor, req.exclude_id).await
}

async fn existe(
    state: &AppState,
    campo: CampoUnico,
    valor: &str,
    excluir: Option<i64>,
) -> AppResult<Json<ExistsResponse>> {
    let exists = state.productos.existe_campo(campo, valor, excluir).await?;
    Ok(Json(ExistsResponse { exists }))
}

pub async fn crear(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductoInput>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let producto = input.validar()?;
    verificar_unicidad(&state, &producto, None).await?;

    let id = state.productos.crear(&producto).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Producto creado".to_string(),
        }),
    ))
}

pub async fn actualizar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<ProductoInput>,
) -> AppResult<Json<MessageResponse>> {
    let producto = input.validar()?;
    verificar_unicidad(&state, &producto, Some(id)).await?;

    state.productos.actualizar(id, &producto).await?;

    Ok(Json(MessageResponse {
        message: "Producto actualizado".to_string(),
    }))
}

pub async fn eliminar(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    state.productos.eliminar(id).await?;

    Ok(Json(MessageResponse {
        message: "Producto eliminado".to_string(),
    }))
}

/// Verificación de unicidad previa a la escritura, en orden fijo: nombre,
/// SKU y código de barras (si viene). En una actualización se excluye el
/// propio registro.
///
/// La garantía final la dan las restricciones UNIQUE del esquema; esta
/// pasada anticipa el conflicto con el mensaje del campo afectado.
async fn verificar_unicidad(
    state: &AppState,
    producto: &ProductoValidado,
    excluir: Option<i64>,
) -> AppResult<()> {
    for (campo, valor) in [
        (CampoUnico::Nombre, Some(&producto.nombre)),
        (CampoUnico::Sku, Some(&producto.codigo_interno_sku)),
        (CampoUnico::CodigoBarras, producto.codigo_barras.as_ref()),
    ] {
        let Some(valor) = valor else {
            continue;
        };

        if state.productos.existe_campo(campo, valor, excluir).await? {
            return Err(AppError::conflict(campo.mensaje_conflicto()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use serde_json::json;

    use crate::api::test_support::{app_solo_productos, peticion};
    use crate::domain::repositories::MockProductoRepository;

    fn producto_de_prueba(id: i64) -> Producto {
        Producto {
            id,
            nombre: format!("Producto {}", id),
            descripcion: None,
            codigo_interno_sku: format!("SKU-{}", id),
            codigo_barras: None,
            img: None,
            stock_disponible: 0,
            habilitar_stock: false,
            precio_unitario: 5.0,
            created_at: Utc::now(),
        }
    }

    fn sin_conflictos(mock: &mut MockProductoRepository) {
        mock.expect_existe_campo().returning(|_, _, _| Ok(false));
    }

    #[tokio::test]
    async fn crear_devuelve_201_con_id() {
        let mut mock = MockProductoRepository::new();
        sin_conflictos(&mut mock);
        mock.expect_crear()
            .withf(|p| p.nombre == "Lápiz" && p.codigo_interno_sku == "LP-1")
            .returning(|_| Ok(42));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "POST",
            "/productos",
            Some(json!({"nombre": "Lápiz", "codigo_interno_sku": "LP-1", "precio_unitario": 5})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 42);
        assert_eq!(body["message"], "Producto creado");
    }

    #[tokio::test]
    async fn crear_con_precio_cero_devuelve_400() {
        // La validación rechaza antes de tocar el almacenamiento
        let app = app_solo_productos(MockProductoRepository::new());

        let (status, body) = peticion(
            app,
            "POST",
            "/productos",
            Some(json!({"nombre": "Lápiz", "codigo_interno_sku": "LP-1", "precio_unitario": 0})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "El precio debe ser mayor a 0");
    }

    #[tokio::test]
    async fn crear_sin_obligatorios_devuelve_400() {
        let app = app_solo_productos(MockProductoRepository::new());

        let (status, body) = peticion(
            app,
            "POST",
            "/productos",
            Some(json!({"precio_unitario": 5})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Faltan campos obligatorios");
    }

    #[tokio::test]
    async fn crear_con_nombre_duplicado_devuelve_409() {
        let mut mock = MockProductoRepository::new();
        mock.expect_existe_campo()
            .withf(|campo, valor, excluir| {
                *campo == CampoUnico::Nombre && valor == "Lápiz" && excluir.is_none()
            })
            .returning(|_, _, _| Ok(true));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "POST",
            "/productos",
            Some(json!({"nombre": "Lápiz", "codigo_interno_sku": "LP-1", "precio_unitario": 5})),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "El nombre ya existe");
    }

    #[tokio::test]
    async fn conflicto_de_barcode_se_detecta_al_final() {
        let mut mock = MockProductoRepository::new();
        mock.expect_existe_campo()
            .returning(|campo, _, _| Ok(campo == CampoUnico::CodigoBarras));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "POST",
            "/productos",
            Some(json!({
                "nombre": "Lápiz",
                "codigo_interno_sku": "LP-1",
                "codigo_barras": "7790001",
                "precio_unitario": 5
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "El código de barras ya existe");
    }

    #[tokio::test]
    async fn actualizar_excluye_su_propio_id() {
        let mut mock = MockProductoRepository::new();
        mock.expect_existe_campo()
            .withf(|_, _, excluir| *excluir == Some(7))
            .returning(|_, _, _| Ok(false));
        mock.expect_actualizar()
            .withf(|id, p| *id == 7 && p.nombre == "Lápiz")
            .returning(|_, _| Ok(()));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "PUT",
            "/productos/7",
            Some(json!({"nombre": "Lápiz", "codigo_interno_sku": "LP-1", "precio_unitario": 5})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Producto actualizado");
    }

    #[tokio::test]
    async fn obtener_inexistente_devuelve_404() {
        let mut mock = MockProductoRepository::new();
        mock.expect_buscar_por_id()
            .withf(|id| *id == 999999)
            .returning(|_| Ok(None));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(app, "GET", "/productos/999999", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Producto no encontrado");
    }

    #[tokio::test]
    async fn obtener_existente_devuelve_el_producto() {
        let mut mock = MockProductoRepository::new();
        mock.expect_buscar_por_id()
            .returning(|id| Ok(Some(producto_de_prueba(id))));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(app, "GET", "/productos/3", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);
        assert_eq!(body["codigo_interno_sku"], "SKU-3");
    }

    #[tokio::test]
    async fn listar_devuelve_todos() {
        let mut mock = MockProductoRepository::new();
        mock.expect_listar()
            .returning(|| Ok(vec![producto_de_prueba(2), producto_de_prueba(1)]));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(app, "GET", "/productos", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn buscar_pasa_la_consulta_al_repositorio() {
        let mut mock = MockProductoRepository::new();
        mock.expect_buscar()
            .withf(|q| q == "lápiz")
            .returning(|_| Ok(vec![producto_de_prueba(1)]));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "POST",
            "/productos/search",
            Some(json!({"query": "lápiz"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn validar_sku_existente() {
        let mut mock = MockProductoRepository::new();
        mock.expect_existe_campo()
            .withf(|campo, valor, excluir| {
                *campo == CampoUnico::Sku && valor == "LP-1" && excluir.is_none()
            })
            .returning(|_, _, _| Ok(true));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "POST",
            "/productos/validate/sku",
            Some(json!({"sku": "LP-1"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], true);
    }

    #[tokio::test]
    async fn validar_barcode_vacio_nunca_existe() {
        // Sin expectativas: el repositorio no debe consultarse
        let app = app_solo_productos(MockProductoRepository::new());

        let (status, body) = peticion(
            app,
            "POST",
            "/productos/validate/barcode",
            Some(json!({"barcode": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);

        let app = app_solo_productos(MockProductoRepository::new());
        let (status, body) =
            peticion(app, "POST", "/productos/validate/barcode", Some(json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);
    }

    #[tokio::test]
    async fn validar_nombre_con_exclusion() {
        let mut mock = MockProductoRepository::new();
        mock.expect_existe_campo()
            .withf(|campo, valor, excluir| {
                *campo == CampoUnico::Nombre && valor == "Lápiz" && *excluir == Some(4)
            })
            .returning(|_, _, _| Ok(false));

        let app = app_solo_productos(mock);
        let (status, body) = peticion(
            app,
            "POST",
            "/productos/validate/nombre",
            Some(json!({"nombre": "Lápiz", "excludeId": 4})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], false);
    }

    #[tokio::test]
    async fn eliminar_es_idempotente() {
        let mut mock = MockProductoRepository::new();
        mock.expect_eliminar()
            .withf(|id| *id == 5)
            .times(2)
            .returning(|_| Ok(()));

        let app = app_solo_productos(mock);

        let (status, body) = peticion(app.clone(), "DELETE", "/productos/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Producto eliminado");

        // La segunda llamada tampoco es un error
        let (status, _) = peticion(app, "DELETE", "/productos/5", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
