use crate::{
    entities::{
        menu_category::{self, ActiveModel as MenuCategoryActiveModel, Entity as MenuCategoryEntity},
        menu_item, restaurant,
    },
    errors::ServiceError,
};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMenuCategoryRequest {
    pub restaurant_id: i32,
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,
}

/// Categories can only be renamed; moving one between restaurants is not supported.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuCategoryResponse {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
}

impl From<menu_category::Model> for MenuCategoryResponse {
    fn from(model: menu_category::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
        }
    }
}

#[derive(Clone)]
pub struct MenuCategoryService {
    db: Arc<DatabaseConnection>,
}

impl MenuCategoryService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(restaurant_id = request.restaurant_id))]
    pub async fn create(
        &self,
        request: CreateMenuCategoryRequest,
    ) -> Result<MenuCategoryResponse, ServiceError> {
        request.validate()?;

        let exists = restaurant::Entity::find_by_id(request.restaurant_id)
            .one(&*self.db)
            .await?
            .is_some();
        if !exists {
            return Err(ServiceError::BadRequest(format!(
                "Restaurant {} not found",
                request.restaurant_id
            )));
        }

        let model = MenuCategoryActiveModel {
            restaurant_id: Set(request.restaurant_id),
            name: Set(request.name),
            ..Default::default()
        }
        .insert(&*self.db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create menu category");
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = model.id, "Menu category created");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<MenuCategoryResponse, ServiceError> {
        self.find_model(id).await.map(Into::into)
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        skip: u64,
        limit: u64,
    ) -> Result<Vec<MenuCategoryResponse>, ServiceError> {
        let rows = MenuCategoryEntity::find()
            .order_by_asc(menu_category::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_by_restaurant(
        &self,
        restaurant_id: i32,
    ) -> Result<Vec<MenuCategoryResponse>, ServiceError> {
        let rows = MenuCategoryEntity::find()
            .filter(menu_category::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(menu_category::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: i32,
        patch: UpdateMenuCategoryRequest,
    ) -> Result<MenuCategoryResponse, ServiceError> {
        patch.validate()?;

        let mut active: MenuCategoryActiveModel = self.find_model(id).await?.into();
        if let Some(name) = patch.name {
            active.name = Set(name);
        }

        let updated = active.update(&*self.db).await.map_err(|e| {
            error!(error = %e, category_id = id, "Failed to update menu category");
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = id, "Menu category updated");
        Ok(updated.into())
    }

    /// Deletes the category; its menu items stay on the menu uncategorized.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find_model(id).await?;

        let txn = self.db.begin().await?;

        let detached = menu_item::Entity::update_many()
            .col_expr(
                menu_item::Column::CategoryId,
                Expr::value(Option::<i32>::None),
            )
            .filter(menu_item::Column::CategoryId.eq(id))
            .exec(&txn)
            .await?;
        MenuCategoryEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, category_id = id, "Failed to commit menu category delete");
            ServiceError::DatabaseError(e)
        })?;

        info!(
            category_id = id,
            menu_items_detached = detached.rows_affected,
            "Menu category deleted"
        );
        Ok(())
    }

    async fn find_model(&self, id: i32) -> Result<menu_category::Model, ServiceError> {
        MenuCategoryEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!(category_id = id, "Menu category not found");
                ServiceError::not_found("Menu category", id)
            })
    }
}
