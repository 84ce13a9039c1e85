use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use cfql_core::{compile, Filter};
use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::error::DbError;
use crate::service::Companies;
use crate::storage::Storage;

/// Fields a caller may reference in a `filter` expression.
pub const KNOWN_FIELDS: [&str; 6] = ["id", "name", "code", "country", "website", "phone"];

#[derive(Clone)]
pub struct AppState<S> {
    pub companies: Companies<S>,
}

// ==================== Request/Response Types ====================

#[derive(Debug, Default, Deserialize)]
pub struct ListCompaniesParams {
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateCompanyResponse {
    pub id: i64,
}

// ==================== Company Handlers ====================

pub async fn list_companies<S: Storage>(
    State(state): State<AppState<S>>,
    Query(params): Query<ListCompaniesParams>,
) -> Result<Json<Vec<Company>>, DbError> {
    let filter = match params.filter.as_deref() {
        Some(expression) if !expression.is_empty() => compile(&KNOWN_FIELDS, expression)?,
        _ => Filter::default(),
    };
    let companies = state.companies.get(&filter).await?;
    Ok(Json(companies))
}

pub async fn get_company<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<Json<Company>, DbError> {
    let filter = compile(&KNOWN_FIELDS, &format!("id,{id},="))
        .map_err(|e| DbError::Internal(e.to_string()))?;
    let companies = state.companies.get(&filter).await?;
    match companies.into_iter().next() {
        Some(company) => Ok(Json(company)),
        None => Err(DbError::NotFound),
    }
}

pub async fn create_company<S: Storage>(
    State(state): State<AppState<S>>,
    Json(company): Json<Company>,
) -> Result<(StatusCode, Json<CreateCompanyResponse>), DbError> {
    if company.name.is_empty() || company.name.trim() != company.name {
        return Err(DbError::BadRequest(
            "company name is empty or contains leading/trailing spaces".to_string(),
        ));
    }
    let id = state.companies.create(company).await?;
    Ok((StatusCode::CREATED, Json(CreateCompanyResponse { id })))
}

pub async fn update_company<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
    Json(company): Json<Company>,
) -> Result<StatusCode, DbError> {
    if company.id != id {
        return Err(DbError::BadRequest("id mismatch".to_string()));
    }
    state.companies.update(company).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_company<S: Storage>(
    State(state): State<AppState<S>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, DbError> {
    state.companies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
