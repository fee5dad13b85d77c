use crate::{
    entities::{
        menu_category, menu_item, order, order_item,
        restaurant::{self, ActiveModel as RestaurantActiveModel, Entity as RestaurantEntity},
    },
    errors::ServiceError,
    services::{conflict_if_referenced, ensure_max_len},
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateRestaurantRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Partial update: absent fields are untouched, `null` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateRestaurantRequest {
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub address: Option<Option<String>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub phone: Option<Option<String>>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
}

impl From<restaurant::Model> for RestaurantResponse {
    fn from(model: restaurant::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            phone: model.phone,
            is_active: model.is_active,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Restaurants own their menu; deleting one takes the menu with it.
#[derive(Clone)]
pub struct RestaurantService {
    db: Arc<DatabaseConnection>,
}

impl RestaurantService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(
        &self,
        request: CreateRestaurantRequest,
    ) -> Result<RestaurantResponse, ServiceError> {
        request.validate()?;

        let model = RestaurantActiveModel {
            name: Set(request.name),
            address: Set(request.address),
            phone: Set(request.phone),
            is_active: Set(request.is_active),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create restaurant");
            ServiceError::DatabaseError(e)
        })?;

        info!(restaurant_id = model.id, "Restaurant created");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<RestaurantResponse, ServiceError> {
        self.find_model(id).await.map(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<RestaurantResponse>, ServiceError> {
        let rows = RestaurantEntity::find()
            .order_by_asc(restaurant::Column::Id)
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
        patch: UpdateRestaurantRequest,
    ) -> Result<RestaurantResponse, ServiceError> {
        patch.validate()?;
        ensure_max_len("address", patch.address.as_ref(), 255)?;
        ensure_max_len("phone", patch.phone.as_ref(), 50)?;

        let mut active: RestaurantActiveModel = self.find_model(id).await?.into();

        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(address) = patch.address {
            active.address = Set(address);
        }
        if let Some(phone) = patch.phone {
            active.phone = Set(phone);
        }
        if let Some(is_active) = patch.is_active {
            active.is_active = Set(is_active);
        }

        let updated = active.update(&*self.db).await.map_err(|e| {
            error!(error = %e, restaurant_id = id, "Failed to update restaurant");
            ServiceError::DatabaseError(e)
        })?;

        info!(restaurant_id = id, "Restaurant updated");
        Ok(updated.into())
    }

    /// Deletes the restaurant with its categories and menu items. Refused
    /// while any order references the restaurant; order lines that pointed
    /// at its menu items keep their price snapshot with the reference cleared.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find_model(id).await?;

        let txn = self.db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for restaurant delete");
            ServiceError::DatabaseError(e)
        })?;

        let order_count = order::Entity::find()
            .filter(order::Column::RestaurantId.eq(id))
            .count(&txn)
            .await?;
        if order_count > 0 {
            warn!(restaurant_id = id, order_count, "Refusing to delete restaurant with orders");
            txn.rollback().await?;
            return Err(ServiceError::Conflict(format!(
                "Restaurant {} has {} order(s) and cannot be deleted",
                id, order_count
            )));
        }

        let item_ids: Vec<i32> = menu_item::Entity::find()
            .select_only()
            .column(menu_item::Column::Id)
            .filter(menu_item::Column::RestaurantId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !item_ids.is_empty() {
            order_item::Entity::update_many()
                .col_expr(
                    order_item::Column::MenuItemId,
                    Expr::value(Option::<i32>::None),
                )
                .filter(order_item::Column::MenuItemId.is_in(item_ids.clone()))
                .exec(&txn)
                .await?;
        }

        menu_item::Entity::delete_many()
            .filter(menu_item::Column::RestaurantId.eq(id))
            .exec(&txn)
            .await?;
        menu_category::Entity::delete_many()
            .filter(menu_category::Column::RestaurantId.eq(id))
            .exec(&txn)
            .await?;
        RestaurantEntity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| {
                conflict_if_referenced(e, || {
                    format!("Restaurant {} has orders and cannot be deleted", id)
                })
            })?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, restaurant_id = id, "Failed to commit restaurant delete");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            restaurant_id = id,
            menu_items_removed = item_ids.len(),
            "Restaurant deleted"
        );
        Ok(())
    }

    async fn find_model(&self, id: i32) -> Result<restaurant::Model, ServiceError> {
        RestaurantEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!(restaurant_id = id, "Restaurant not found");
                ServiceError::not_found("Restaurant", id)
            })
    }
}
