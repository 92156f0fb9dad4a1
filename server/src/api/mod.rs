//! API HTTP
//!
//! Despachador: arma el router, la capa CORS (que resuelve el pre-flight
//! `OPTIONS` antes de la autenticación) y la respuesta uniforme para
//! rutas no registradas.

pub mod productos;
pub mod ventas;

use std::sync::Arc;

use axum::extract::{FromRequest, Request};
use axum::http::{Method, header};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use pos_errors::AppError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{Authenticator, auth_middleware};
use crate::domain::repositories::{ProductoRepository, VentaRepository};

/// Estado compartido del despachador
#[derive(Clone)]
pub struct AppState {
    pub productos: Arc<dyn ProductoRepository>,
    pub ventas: Arc<dyn VentaRepository>,
}

/// Extractor JSON que convierte un cuerpo malformado en un error de
/// validación con el cuerpo `{"error": ...}` habitual
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(valor)) => Ok(ApiJson(valor)),
            Err(rechazo) => Err(AppError::validation(format!(
                "Cuerpo de la petición inválido: {}",
                rechazo
            ))),
        }
    }
}

/// Respuesta de creación con el id asignado
#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
    pub message: String,
}

/// Respuesta de confirmación
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Resultado de una verificación de unicidad
#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    pub exists: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Construye la aplicación completa
pub fn app(state: AppState, auth: Arc<Authenticator>) -> Router {
    let api = Router::new()
        .route("/productos", get(productos::listar).post(productos::crear))
        .route("/productos/search", post(productos::buscar))
        .route("/productos/validate/nombre", post(productos::validar_nombre))
        .route("/productos/validate/sku", post(productos::validar_sku))
        .route(
            "/productos/validate/barcode",
            post(productos::validar_barcode),
        )
        .route(
            "/productos/{id}",
            get(productos::obtener)
                .put(productos::actualizar)
                .delete(productos::eliminar),
        )
        .route("/ventas", get(ventas::listar).post(ventas::crear))
        .route("/ventas/{id}", get(ventas::obtener))
        .fallback(ruta_no_encontrada)
        .method_not_allowed_fallback(ruta_no_encontrada)
        .layer(middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

async fn ruta_no_encontrada() -> AppError {
    AppError::not_found("Ruta no encontrada")
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
