//! Operaciones sobre ventas

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pos_errors::{AppError, AppResult};

use super::{ApiJson, AppState, CreatedResponse};
use crate::domain::entities::{Venta, VentaConItems, VentaInput};

pub async fn crear(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<VentaInput>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    input.validar()?;
    let id = state.ventas.crear(&input).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            id,
            message: "Venta registrada".to_string(),
        }),
    ))
}

pub async fn listar(State(state): State<AppState>) -> AppResult<Json<Vec<Venta>>> {
    Ok(Json(state.ventas.listar_recientes().await?))
}

pub async fn obtener(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<VentaConItems>> {
    let venta = state
        .ventas
        .buscar_por_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Venta no encontrada"))?;

    Ok(Json(venta))
}
