//! Credit card route handlers.
//!
//! JSON endpoints for issuing cards and listing them by owner email.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
};
use serde::Deserialize;
use tracing::instrument;

use creditcards_core::{CardId, Email};

use crate::error::{AppError, Result};
use crate::models::Card;
use crate::state::AppState;

/// Query parameters for listing cards.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Request body for issuing a card.
#[derive(Debug, Deserialize)]
pub struct IssueRequest {
    #[serde(default)]
    pub email: Option<String>,
}

/// List cards owned by an email.
///
/// GET /creditcards?email=...
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the query string is malformed or
/// `email` is missing or empty.
#[instrument(skip(state, query))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Card>>> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let email = query.email.unwrap_or_default();
    if email.is_empty() {
        return Err(AppError::BadRequest(
            "email must be provided as a query parameter".to_string(),
        ));
    }

    let cards = state.cards().find_by_email(&email).await?;
    Ok(Json(cards))
}

/// Register the email if it is new and issue a card to its owner.
///
/// POST /creditcards
///
/// Responds `201 Created` with the card and a `Location` header pointing at
/// `/creditcards/{id}`.
///
/// # Errors
///
/// Returns `AppError::BadRequest` if the body is not JSON or `email` is
/// missing or empty. Nothing is stored in that case.
#[instrument(skip(state, payload))]
pub async fn issue(
    State(state): State<AppState>,
    payload: std::result::Result<Json<IssueRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Card>)> {
    let Json(request) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let email = Email::parse(request.email.as_deref().unwrap_or_default())
        .map_err(|_| AppError::BadRequest("email is required".to_string()))?;

    let person = state.persons().ensure(&email).await?;
    let card = state.cards().issue(&person).await?;
    let location = state.config().card_location(card.id);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(card),
    ))
}

/// Get a single card.
///
/// GET /creditcards/{id}
///
/// # Errors
///
/// Returns `AppError::BadRequest` if `id` is not an integer.
/// Returns `AppError::NotFound` if no card has this ID.
#[instrument(skip(state, id))]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Card>> {
    let Path(id) = id.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let id = CardId::new(id);

    state
        .cards()
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("card {id} does not exist")))
}
