use super::common::{created_response, no_content_response, ListParams};
use crate::{
    errors::{ErrorResponse, ServiceError},
    services::orders::{CreateOrderRequest, OrderResponse, UpdateOrderRequest},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json},
};

#[utoipa::path(
    post,
    path = "/orders",
    tag = "orders",
    summary = "Create order",
    description = "Prices the requested lines from the current menu (discounts applied) and stores the order with its items",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = OrderResponse),
        (status = 400, description = "Unknown restaurant or customer, or an unavailable menu item", body = ErrorResponse),
    )
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.services.orders.create(payload).await?;
    Ok(created_response(order))
}

#[utoipa::path(
    get,
    path = "/orders",
    tag = "orders",
    params(ListParams),
    responses((status = 200, description = "Orders with their items", body = [OrderResponse]))
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<OrderResponse>>, ServiceError> {
    let params = params.checked()?;
    let orders = state
        .services
        .orders
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/orders/by-customer/{customer_id}",
    tag = "orders",
    params(("customer_id" = i32, Path, description = "Customer id")),
    responses((status = 200, description = "Orders placed by the customer", body = [OrderResponse]))
)]
pub async fn list_orders_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<i32>,
) -> Result<Json<Vec<OrderResponse>>, ServiceError> {
    Ok(Json(
        state.services.orders.list_by_customer(customer_id).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order with its items", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<OrderResponse>, ServiceError> {
    Ok(Json(state.services.orders.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<OrderResponse>, ServiceError> {
    Ok(Json(state.services.orders.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    tag = "orders",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 204, description = "Order and its items deleted"),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.orders.delete(id).await?;
    Ok(no_content_response())
}
