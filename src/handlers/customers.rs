use super::common::{created_response, no_content_response, ListParams};
use crate::{
    errors::{ErrorResponse, ServiceError},
    services::customers::{
        CreateCustomerRequest, CustomerCreation, CustomerResponse, UpdateCustomerRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Json, Response},
};

/// Registering an email that already exists returns the existing customer.
#[utoipa::path(
    post,
    path = "/customers",
    tag = "customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerResponse),
        (status = 200, description = "Customer with this email already existed", body = CustomerResponse),
        (status = 400, description = "Invalid request data", body = ErrorResponse),
    )
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<Response, ServiceError> {
    Ok(match state.services.customers.get_or_create(payload).await? {
        CustomerCreation::Created(customer) => created_response(customer),
        CustomerCreation::Existing(customer) => Json(customer).into_response(),
    })
}

#[utoipa::path(
    get,
    path = "/customers",
    tag = "customers",
    params(ListParams),
    responses((status = 200, description = "Customers", body = [CustomerResponse]))
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<CustomerResponse>>, ServiceError> {
    let params = params.checked()?;
    let customers = state
        .services
        .customers
        .list(params.skip, params.limit)
        .await?;
    Ok(Json(customers))
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
    )
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CustomerResponse>, ServiceError> {
    Ok(Json(state.services.customers.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Customer updated", body = CustomerResponse),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 409, description = "Email registered to another customer", body = ErrorResponse),
    )
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerResponse>, ServiceError> {
    Ok(Json(state.services.customers.update(id, payload).await?))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 409, description = "Customer has orders", body = ErrorResponse),
    )
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.customers.delete(id).await?;
    Ok(no_content_response())
}
