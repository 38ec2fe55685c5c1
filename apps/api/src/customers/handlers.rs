use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::customers::repository::{self, TextField};
use crate::customers::validation::{NewCustomerRequest, RenewRequest};
use crate::errors::AppError;
use crate::models::customer::{CustomerProjectRow, CustomerRow, RenewalIntent};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize)]
pub struct RenewalIntentUpdate {
    pub renewal_intent: RenewalIntent,
}

#[derive(Deserialize)]
pub struct NotesUpdate {
    #[serde(default)]
    pub notes: String,
}

#[derive(Deserialize)]
pub struct CommentsUpdate {
    #[serde(default)]
    pub comments: String,
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Customer {id} not found"))
}

/// GET /api/customers
pub async fn handle_list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerRow>>, AppError> {
    Ok(Json(repository::list_customers(&state.db).await?))
}

/// POST /api/customers
pub async fn handle_create_customer(
    State(state): State<AppState>,
    Json(req): Json<NewCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerRow>), AppError> {
    let new = req.validate()?;
    let customer = repository::create_customer(&state.db, &new).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers/search?q=
pub async fn handle_search_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<CustomerRow>>, AppError> {
    if params.q.trim().is_empty() {
        return Ok(Json(repository::list_customers(&state.db).await?));
    }
    Ok(Json(repository::search_customers(&state.db, &params.q).await?))
}

/// DELETE /api/customers/:id
pub async fn handle_delete_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if repository::delete_customer(&state.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// PATCH /api/customers/:id/renewal-intent
pub async fn handle_update_renewal_intent(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenewalIntentUpdate>,
) -> Result<Json<CustomerRow>, AppError> {
    repository::update_renewal_intent(&state.db, id, req.renewal_intent)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/customers/:id/notes
pub async fn handle_update_notes(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NotesUpdate>,
) -> Result<Json<CustomerRow>, AppError> {
    repository::update_text_field(&state.db, id, TextField::Notes, &req.notes)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/customers/:id/comments
pub async fn handle_update_comments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CommentsUpdate>,
) -> Result<Json<CustomerRow>, AppError> {
    repository::update_text_field(&state.db, id, TextField::Comments, &req.comments)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// POST /api/customers/:id/renew
pub async fn handle_renew_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RenewRequest>,
) -> Result<(StatusCode, Json<CustomerRow>), AppError> {
    let period = req.validate()?;
    let customer = repository::renew_customer(&state.db, id, &period)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok((StatusCode::CREATED, Json(customer)))
}

/// GET /api/customers/:id/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CustomerProjectRow>>, AppError> {
    if !repository::customer_exists(&state.db, id).await? {
        return Err(not_found(id));
    }
    Ok(Json(repository::list_projects(&state.db, id).await?))
}
