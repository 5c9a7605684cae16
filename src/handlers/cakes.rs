// Cake handlers
// HTTP handlers for the /cakes resource

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::info;

use crate::{
    error::ApiError,
    models::{CreateCakeRequest, UpdateCakeRequest},
    service::SharedCakeService,
};

/// Positive cake id taken from the `:id` path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CakeId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for CakeId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::validation(rejection.body_text()))?;

        if id <= 0 {
            return Err(ApiError::validation("Cake id must be a positive integer"));
        }

        Ok(CakeId(id))
    }
}

/// List all cakes
/// GET /cakes
pub async fn get_cakes(
    State(service): State<SharedCakeService>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching all cakes");

    let cakes = service.get_cakes().await?;

    info!("Retrieved {} cakes", cakes.len());
    Ok((StatusCode::OK, Json(cakes)))
}

/// Get cake by ID
/// GET /cakes/:id
pub async fn get_cake_by_id(
    State(service): State<SharedCakeService>,
    CakeId(id): CakeId,
) -> Result<impl IntoResponse, ApiError> {
    info!("Fetching cake with id: {}", id);

    let cake = service.get_cake_by_id(id).await?;

    Ok((StatusCode::OK, Json(cake)))
}

/// Create a new cake
/// POST /cakes
pub async fn create_cake(
    State(service): State<SharedCakeService>,
    payload: Result<Json<CreateCakeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::Validation)?;

    info!("Creating new cake with title: {}", request.title);

    let cake = service.create_cake(request).await?;

    info!("Successfully created cake with id: {}", cake.id);
    Ok((StatusCode::CREATED, Json(cake)))
}

/// Replace title and description of an existing cake
/// PUT /cakes/:id
pub async fn update_cake(
    State(service): State<SharedCakeService>,
    CakeId(id): CakeId,
    payload: Result<Json<UpdateCakeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(request) = payload?;
    request.validate().map_err(ApiError::Validation)?;

    info!("Updating cake with id: {}", id);

    let cake = service.update_cake(id, request).await?;

    info!("Successfully updated cake with id: {}", id);
    Ok((StatusCode::OK, Json(cake)))
}

/// Delete cake by ID; absent ids still answer 204
/// DELETE /cakes/:id
pub async fn delete_cake(
    State(service): State<SharedCakeService>,
    CakeId(id): CakeId,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting cake with id: {}", id);

    service.delete_cake(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
