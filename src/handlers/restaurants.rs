use super::common::{created_response, no_content_response, ListParams};
use crate::{
    errors::{ErrorResponse, ServiceError},
    services::restaurants::{CreateRestaurantRequest, RestaurantResponse, UpdateRestaurantRequest},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

#[utoipa::path(
    post,
    path = "/restaurants",
    tag = "restaurants",
    request_body = CreateRestaurantRequest,
    responses(
        (status = 201, description = "Restaurant created", body = RestaurantResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
    )
)]
pub async fn create_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<CreateRestaurantRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let restaurant = state.services.restaurants.create(payload).await?;
    Ok(created_response(restaurant))
}

#[utoipa::path(
    get,
    path = "/restaurants",
    tag = "restaurants",
    params(ListParams),
    responses(
        (status = 200, description = "Restaurants", body = [RestaurantResponse]),
        (status = 400, description = "Invalid pagination", body = ErrorResponse),
    )
)]
pub async fn list_restaurants(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<RestaurantResponse>>, ServiceError> {
    let params = params.checked()?;
    let restaurants = state
        .services
        .restaurants
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(restaurants))
}

#[utoipa::path(
    get,
    path = "/restaurants/{id}",
    tag = "restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    responses(
        (status = 200, description = "Restaurant", body = RestaurantResponse),
        (status = 404, description = "Restaurant not found", body = ErrorResponse),
    )
)]
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RestaurantResponse>, ServiceError> {
    Ok(Json(state.services.restaurants.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/restaurants/{id}",
    tag = "restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    request_body = UpdateRestaurantRequest,
    responses(
        (status = 200, description = "Restaurant updated", body = RestaurantResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Restaurant not found", body = ErrorResponse),
    )
)]
pub async fn update_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRestaurantRequest>,
) -> Result<Json<RestaurantResponse>, ServiceError> {
    Ok(Json(state.services.restaurants.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/restaurants/{id}",
    tag = "restaurants",
    params(("id" = i32, Path, description = "Restaurant id")),
    responses(
        (status = 204, description = "Restaurant and its menu deleted"),
        (status = 404, description = "Restaurant not found", body = ErrorResponse),
        (status = 409, description = "Restaurant still has orders", body = ErrorResponse),
    )
)]
pub async fn delete_restaurant(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.restaurants.delete(id).await?;
    Ok(no_content_response())
}
