use super::common::{created_response, no_content_response, ListParams};
use crate::{
    errors::{ErrorResponse, ServiceError},
    services::menu_items::{CreateMenuItemRequest, MenuItemResponse, UpdateMenuItemRequest},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

#[utoipa::path(
    post,
    path = "/menu-items",
    tag = "menu-items",
    request_body = CreateMenuItemRequest,
    responses(
        (status = 201, description = "Menu item created", body = MenuItemResponse),
        (status = 400, description = "Invalid price, discount or references", body = ErrorResponse),
    )
)]
pub async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.menu_items.create(payload).await?;
    Ok(created_response(item))
}

/// Every item, including ones marked unavailable.
#[utoipa::path(
    get,
    path = "/menu-items",
    tag = "menu-items",
    params(ListParams),
    responses((status = 200, description = "Menu items", body = [MenuItemResponse]))
)]
pub async fn list_menu_items(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MenuItemResponse>>, ServiceError> {
    let params = params.checked()?;
    let items = state
        .services
        .menu_items
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/menu-items/by-restaurant/{restaurant_id}",
    tag = "menu-items",
    params(("restaurant_id" = i32, Path, description = "Restaurant id")),
    responses((status = 200, description = "Available items of the restaurant", body = [MenuItemResponse]))
)]
pub async fn list_items_by_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<Vec<MenuItemResponse>>, ServiceError> {
    Ok(Json(
        state
            .services
            .menu_items
            .list_available_by_restaurant(restaurant_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/menu-items/by-menu_category/{category_id}",
    tag = "menu-items",
    params(("category_id" = i32, Path, description = "Menu category id")),
    responses((status = 200, description = "Available items of the category", body = [MenuItemResponse]))
)]
pub async fn list_items_by_category(
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<Json<Vec<MenuItemResponse>>, ServiceError> {
    Ok(Json(
        state
            .services
            .menu_items
            .list_available_by_category(category_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/menu-items/{id}",
    tag = "menu-items",
    params(("id" = i32, Path, description = "Menu item id")),
    responses(
        (status = 200, description = "Menu item", body = MenuItemResponse),
        (status = 404, description = "Menu item not found", body = ErrorResponse),
    )
)]
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MenuItemResponse>, ServiceError> {
    Ok(Json(state.services.menu_items.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/menu-items/{id}",
    tag = "menu-items",
    params(("id" = i32, Path, description = "Menu item id")),
    request_body = UpdateMenuItemRequest,
    responses(
        (status = 200, description = "Menu item updated", body = MenuItemResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
        (status = 404, description = "Menu item not found", body = ErrorResponse),
    )
)]
pub async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMenuItemRequest>,
) -> Result<Json<MenuItemResponse>, ServiceError> {
    Ok(Json(state.services.menu_items.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/menu-items/{id}",
    tag = "menu-items",
    params(("id" = i32, Path, description = "Menu item id")),
    responses(
        (status = 204, description = "Menu item deleted"),
        (status = 404, description = "Menu item not found", body = ErrorResponse),
    )
)]
pub async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.menu_items.delete(id).await?;
    Ok(no_content_response())
}
