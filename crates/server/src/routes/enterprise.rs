use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use common::response::{created_response, success_response};
use models::enterprise::{EnterprisePatch, NewEnterprise};
use serde::Serialize;
use tracing::info;

use crate::errors::JsonApiError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UpdateOutcome {
    pub modified: bool,
}

#[derive(Debug, Serialize)]
pub struct DeleteOutcome {
    pub deleted: bool,
}

#[utoipa::path(
    get, path = "/api/v1/EMPRESA_ESPECIFICA/{id}", tag = "empresas",
    params(("id" = String, Path, description = "ObjectId de la empresa (24 caracteres hexadecimales)")),
    responses(
        (status = 200, description = "Empresa encontrada", body = crate::openapi::EnterpriseDoc),
        (status = 400, description = "ID con formato inválido", body = crate::openapi::EnvelopeDoc),
        (status = 404, description = "Empresa no encontrada", body = crate::openapi::EnvelopeDoc),
        (status = 500, description = "Error de base de datos", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn get_enterprise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    let view = state.enterprises.get(&id).await?;
    Ok(success_response(Some(view)))
}

#[utoipa::path(
    get, path = "/api/v1/EMPRESAS", tag = "empresas",
    responses(
        (status = 200, description = "Todas las empresas", body = [crate::openapi::EnterpriseDoc]),
        (status = 500, description = "Error de base de datos", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn list_enterprises(State(state): State<AppState>) -> Result<Response, JsonApiError> {
    let list = state.enterprises.list_all().await?;
    info!(count = list.len(), "list enterprises");
    Ok(success_response(Some(list)))
}

#[utoipa::path(
    get, path = "/api/v1/EMPRESA_FILTRO_POR_CATEGORIA/{id_categoria}", tag = "empresas",
    params(("id_categoria" = String, Path, description = "1=Restaurantes, 2=Clinicas, 3=Barberias, 4=Hoteles")),
    responses(
        (status = 200, description = "Empresas de la categoría (posiblemente ninguna)", body = [crate::openapi::EnterpriseDoc]),
        (status = 400, description = "Categoría desconocida", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(id_categoria): Path<String>,
) -> Result<Response, JsonApiError> {
    let list = state.enterprises.list_by_category(&id_categoria).await?;
    info!(category = %id_categoria, count = list.len(), "list enterprises by category");
    Ok(success_response(Some(list)))
}

#[utoipa::path(
    post, path = "/api/v1/REGISTRAR_EMPRESA", tag = "empresas",
    request_body = crate::openapi::RegisterEnterpriseRequest,
    responses(
        (status = 201, description = "Empresa registrada", body = crate::openapi::EnterpriseDoc),
        (status = 400, description = "Datos inválidos", body = crate::openapi::EnvelopeDoc),
        (status = 404, description = "La categoría no existe", body = crate::openapi::EnvelopeDoc),
        (status = 409, description = "La empresa ya existe", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn register_enterprise(
    State(state): State<AppState>,
    payload: Result<Json<NewEnterprise>, JsonRejection>,
) -> Result<Response, JsonApiError> {
    let Json(input) = payload?;
    let view = state.enterprises.register(input).await?;
    Ok(created_response(Some(view)))
}

#[utoipa::path(
    patch, path = "/api/v1/EMPRESA_ESPECIFICA/{id}", tag = "empresas",
    params(("id" = String, Path, description = "ObjectId de la empresa")),
    request_body = crate::openapi::UpdateEnterpriseRequest,
    responses(
        (status = 200, description = "`{modified}` indica si algún campo cambió"),
        (status = 400, description = "ID o campos inválidos", body = crate::openapi::EnvelopeDoc),
        (status = 404, description = "Empresa no encontrada", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn update_enterprise(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EnterprisePatch>, JsonRejection>,
) -> Result<Response, JsonApiError> {
    let Json(patch) = payload?;
    let modified = state.enterprises.update(&id, patch).await?;
    Ok(success_response(Some(UpdateOutcome { modified })))
}

#[utoipa::path(
    delete, path = "/api/v1/EMPRESA_ESPECIFICA/{id}", tag = "empresas",
    params(("id" = String, Path, description = "ObjectId de la empresa")),
    responses(
        (status = 200, description = "`{deleted}` indica si se eliminó"),
        (status = 400, description = "ID con formato inválido", body = crate::openapi::EnvelopeDoc),
        (status = 404, description = "Empresa no encontrada", body = crate::openapi::EnvelopeDoc)
    )
)]
pub async fn delete_enterprise(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, JsonApiError> {
    let deleted = state.enterprises.delete(&id).await?;
    Ok(success_response(Some(DeleteOutcome { deleted })))
}
