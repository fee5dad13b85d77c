use crate::{
    entities::{
        customer::{self, ActiveModel as CustomerActiveModel, Entity as CustomerEntity},
        order,
    },
    errors::ServiceError,
    services::{conflict_if_referenced, ensure_max_len},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,
    #[validate(email, length(max = 150))]
    pub email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

/// Partial update: absent fields are untouched, `null` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl From<customer::Model> for CustomerResponse {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
        }
    }
}

/// Result of an idempotent create.
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerCreation {
    Created(CustomerResponse),
    Existing(CustomerResponse),
}

impl CustomerCreation {
    pub fn into_inner(self) -> CustomerResponse {
        match self {
            Self::Created(c) | Self::Existing(c) => c,
        }
    }
}

#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DatabaseConnection>,
}

impl CustomerService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a customer, or returns the existing one when the email is
    /// already registered. Customers without an email are always created.
    #[instrument(skip(self, request))]
    pub async fn get_or_create(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<CustomerCreation, ServiceError> {
        request.validate()?;

        if let Some(email) = request.email.as_deref() {
            if let Some(existing) = self.find_by_email(email).await? {
                info!(customer_id = existing.id, "Customer already registered");
                return Ok(CustomerCreation::Existing(existing.into()));
            }
        }

        let model = CustomerActiveModel {
            name: Set(request.name),
            email: Set(request.email),
            phone: Set(request.phone),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = model.id, "Customer created");
        Ok(CustomerCreation::Created(model.into()))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<CustomerResponse, ServiceError> {
        self.find_model(id).await.map(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<CustomerResponse>, ServiceError> {
        let rows = CustomerEntity::find()
            .order_by_asc(customer::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: i32,
        patch: UpdateCustomerRequest,
    ) -> Result<CustomerResponse, ServiceError> {
        patch.validate()?;
        ensure_max_len("email", patch.email.as_ref(), 150)?;
        ensure_max_len("phone", patch.phone.as_ref(), 50)?;

        let mut active: CustomerActiveModel = self.find_model(id).await?.into();

        if let Some(Some(email)) = patch.email.as_ref() {
            if !validator::validate_email(email.as_str()) {
                return Err(ServiceError::ValidationError(format!(
                    "email: '{}' is not a valid email address",
                    email
                )));
            }
            if let Some(owner) = self.find_by_email(email).await? {
                if owner.id != id {
                    warn!(customer_id = id, "Email already registered to another customer");
                    return Err(ServiceError::Conflict(format!(
                        "Email {} is already registered",
                        email
                    )));
                }
            }
        }

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(email) = patch.email {
            active.email = Set(email);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(phone);
        }

        let updated = active.update(&*self.db).await.map_err(|e| {
            error!(error = %e, customer_id = id, "Failed to update customer");
            ServiceError::DatabaseError(e)
        })?;

        info!(customer_id = id, "Customer updated");
        Ok(updated.into())
    }

    /// Refused while the customer has orders.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find_model(id).await?;

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for customer delete");
            ServiceError::DatabaseError(e)
        })?;

        let order_count = order::Entity::find()
            .filter(order::Column::CustomerId.eq(id))
            .count(&txn)
            .await?;
        if order_count > 0 {
            warn!(customer_id = id, order_count, "Refusing to delete customer with orders");
            txn.rollback().await?;
            return Err(ServiceError::Conflict(format!(
                "Customer {} has {} order(s) and cannot be deleted",
                id, order_count
            )));
        }

        CustomerEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| {
                conflict_if_referenced(e, || {
                    format!("Customer {} has orders and cannot be deleted", id)
                })
            })?;
        txn.commit().await.map_err(|e| {
            error!(error = %e, customer_id = id, "Failed to commit customer delete");
            ServiceError::DatabaseError(e)
        })?;
        info!(customer_id = id, "Customer deleted");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<customer::Model>, ServiceError> {
        Ok(CustomerEntity::find()
            .filter(customer::Column::Email.eq(email))
            .one(&*self.db)
            .await?)
    }

    async fn find_model(&self, id: i32) -> Result<customer::Model, ServiceError> {
        CustomerEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!(customer_id = id, "Customer not found");
                ServiceError::not_found("Customer", id)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_email_fails_validation() {
        let req = CreateCustomerRequest {
            name: "Ana".into(),
            email: Some("not-an-email".into()),
            phone: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn creation_outcome_unwraps_to_customer() {
        let customer = CustomerResponse {
            id: 3,
            name: "Ana".into(),
            email: None,
            phone: None,
        };
        assert_eq!(
            CustomerCreation::Existing(customer.clone()).into_inner(),
            customer
        );
    }
}
