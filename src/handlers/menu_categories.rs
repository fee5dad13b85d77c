use super::common::{created_response, no_content_response, ListParams};
use crate::{
    errors::{ErrorResponse, ServiceError},
    services::menu_categories::{
        CreateMenuCategoryRequest, MenuCategoryResponse, UpdateMenuCategoryRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

#[utoipa::path(
    post,
    path = "/menu-categories",
    tag = "menu-categories",
    request_body = CreateMenuCategoryRequest,
    responses(
        (status = 201, description = "Category created", body = MenuCategoryResponse),
        (status = 400, description = "Invalid request or unknown restaurant", body = ErrorResponse),
    )
)]
pub async fn create_menu_category(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuCategoryRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let category = state.services.menu_categories.create(payload).await?;
    Ok(created_response(category))
}

#[utoipa::path(
    get,
    path = "/menu-categories",
    tag = "menu-categories",
    params(ListParams),
    responses((status = 200, description = "Categories", body = [MenuCategoryResponse]))
)]
pub async fn list_menu_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MenuCategoryResponse>>, ServiceError> {
    let params = params.checked()?;
    let categories = state
        .services
        .menu_categories
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(categories))
}

#[utoipa::path(
    get,
    path = "/menu-categories/by-restaurant/{restaurant_id}",
    tag = "menu-categories",
    params(("restaurant_id" = i32, Path, description = "Restaurant id")),
    responses((status = 200, description = "Categories of the restaurant", body = [MenuCategoryResponse]))
)]
pub async fn list_categories_by_restaurant(
    State(state): State<AppState>,
    Path(restaurant_id): Path<i32>,
) -> Result<Json<Vec<MenuCategoryResponse>>, ServiceError> {
    Ok(Json(
        state
            .services
            .menu_categories
            .list_by_restaurant(restaurant_id)
            .await?,
    ))
}

#[utoipa::path(
    get,
    path = "/menu-categories/{id}",
    tag = "menu-categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 200, description = "Category", body = MenuCategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
    )
)]
pub async fn get_menu_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MenuCategoryResponse>, ServiceError> {
    Ok(Json(state.services.menu_categories.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/menu-categories/{id}",
    tag = "menu-categories",
    params(("id" = i32, Path, description = "Category id")),
    request_body = UpdateMenuCategoryRequest,
    responses(
        (status = 200, description = "Category updated", body = MenuCategoryResponse),
        (status = 404, description = "Category not found", body = ErrorResponse),
    )
)]
pub async fn update_menu_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMenuCategoryRequest>,
) -> Result<Json<MenuCategoryResponse>, ServiceError> {
    Ok(Json(state.services.menu_categories.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/menu-categories/{id}",
    tag = "menu-categories",
    params(("id" = i32, Path, description = "Category id")),
    responses(
        (status = 204, description = "Category deleted, its items left uncategorized"),
        (status = 404, description = "Category not found", body = ErrorResponse),
    )
)]
pub async fn delete_menu_category(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.menu_categories.delete(id).await?;
    Ok(no_content_response())
}
