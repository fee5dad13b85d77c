use crate::{
    entities::{
        menu_category,
        menu_item::{self, ActiveModel as MenuItemActiveModel, Entity as MenuItemEntity},
        order_item, restaurant,
    },
    errors::ServiceError,
    services::{
        ensure_max_len,
        pricing::{is_valid_discount, is_valid_price, to_money, MAX_AMOUNT},
    },
};
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection,
    EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMenuItemRequest {
    pub restaurant_id: i32,
    pub category_id: Option<i32>,
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    /// Percentage, 0 to 100
    #[schema(value_type = Option<String>, example = "10")]
    pub discount: Option<Decimal>,
    #[validate(length(max = 500))]
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_available: bool,
}

/// Partial update: absent fields are untouched, `null` clears a nullable field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateMenuItemRequest {
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<i32>)]
    pub category_id: Option<Option<i32>>,
    #[validate(length(min = 1, max = 150, message = "Name must be between 1 and 150 characters"))]
    pub name: Option<String>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub discount: Option<Option<Decimal>>,
    #[serde(default, with = "::serde_with::rust::double_option")]
    #[schema(value_type = Option<String>)]
    pub image_url: Option<Option<String>>,
    pub is_available: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MenuItemResponse {
    pub id: i32,
    pub restaurant_id: i32,
    pub category_id: Option<i32>,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "12.50")]
    pub price: Decimal,
    #[schema(value_type = Option<String>, example = "10.00")]
    pub discount: Option<Decimal>,
    pub image_url: Option<String>,
    pub is_available: bool,
}

impl From<menu_item::Model> for MenuItemResponse {
    fn from(model: menu_item::Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price: to_money(model.price),
            discount: model.discount.map(to_money),
            image_url: model.image_url,
            is_available: model.is_available,
        }
    }
}

fn default_true() -> bool {
    true
}

fn check_price(price: Decimal) -> Result<(), ServiceError> {
    if is_valid_price(price) {
        return Ok(());
    }
    let message = if price <= Decimal::ZERO {
        "price must be greater than 0".to_string()
    } else if price > MAX_AMOUNT {
        format!("price must be at most {}", MAX_AMOUNT)
    } else {
        "price must have at most 2 decimal places".to_string()
    };
    Err(ServiceError::ValidationError(message))
}

fn check_discount(discount: Option<Decimal>) -> Result<(), ServiceError> {
    match discount {
        Some(d) if !is_valid_discount(d) => Err(ServiceError::ValidationError(
            "discount must be between 0 and 100 with at most 2 decimal places".to_string(),
        )),
        _ => Ok(()),
    }
}

#[derive(Clone)]
pub struct MenuItemService {
    db: Arc<DatabaseConnection>,
}

impl MenuItemService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, request), fields(restaurant_id = request.restaurant_id, name = %request.name))]
    pub async fn create(
        &self,
        request: CreateMenuItemRequest,
    ) -> Result<MenuItemResponse, ServiceError> {
        request.validate()?;
        check_price(request.price)?;
        check_discount(request.discount)?;

        let db = &*self.db;
        let exists = restaurant::Entity::find_by_id(request.restaurant_id)
            .one(db)
            .await?
            .is_some();
        if !exists {
            return Err(ServiceError::BadRequest(format!(
                "Restaurant {} not found",
                request.restaurant_id
            )));
        }
        if let Some(category_id) = request.category_id {
            ensure_category_belongs(db, category_id, request.restaurant_id).await?;
        }

        let model = MenuItemActiveModel {
            restaurant_id: Set(request.restaurant_id),
            category_id: Set(request.category_id),
            name: Set(request.name),
            description: Set(request.description),
            price: Set(request.price),
            discount: Set(request.discount),
            image_url: Set(request.image_url),
            is_available: Set(request.is_available),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(menu_item_id = model.id, "Menu item created");
        Ok(model.into())
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<MenuItemResponse, ServiceError> {
        self.find_model(id).await.map(Into::into)
    }

    /// All menu items regardless of availability.
    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<MenuItemResponse>, ServiceError> {
        let rows = MenuItemEntity::find()
            .order_by_asc(menu_item::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Items a restaurant currently offers.
    #[instrument(skip(self))]
    pub async fn list_available_by_restaurant(
        &self,
        restaurant_id: i32,
    ) -> Result<Vec<MenuItemResponse>, ServiceError> {
        let rows = MenuItemEntity::find()
            .filter(menu_item::Column::RestaurantId.eq(restaurant_id))
            .filter(menu_item::Column::IsAvailable.eq(true))
            .order_by_asc(menu_item::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    pub async fn list_available_by_category(
        &self,
        category_id: i32,
    ) -> Result<Vec<MenuItemResponse>, ServiceError> {
        let rows = MenuItemEntity::find()
            .filter(menu_item::Column::CategoryId.eq(category_id))
            .filter(menu_item::Column::IsAvailable.eq(true))
            .order_by_asc(menu_item::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: i32,
        patch: UpdateMenuItemRequest,
    ) -> Result<MenuItemResponse, ServiceError> {
        patch.validate()?;
        ensure_max_len("image_url", patch.image_url.as_ref(), 500)?;
        if let Some(price) = patch.price {
            check_price(price)?;
        }
        if let Some(discount) = patch.discount {
            check_discount(discount)?;
        }

        let db = &*self.db;
        let current = self.find_model(id).await?;
        if let Some(Some(category_id)) = patch.category_id {
            ensure_category_belongs(db, category_id, current.restaurant_id).await?;
        }

        let mut active: MenuItemActiveModel = current.into();
        if let Some(category_id) = patch.category_id {
            active.category_id = Set(category_id);
        }
        if let Some(name) = patch.name {
            active.name = Set(name);
        }
        if let Some(description) = patch.description {
            active.description = Set(description);
        }
        if let Some(price) = patch.price {
            active.price = Set(price);
        }
        if let Some(discount) = patch.discount {
            active.discount = Set(discount);
        }
        if let Some(image_url) = patch.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(is_available) = patch.is_available {
            active.is_available = Set(is_available);
        }

        let updated = active.update(db).await.map_err(|e| {
            error!(error = %e, menu_item_id = id, "Failed to update menu item");
            ServiceError::DatabaseError(e)
        })?;

        info!(menu_item_id = id, "Menu item updated");
        Ok(updated.into())
    }

    /// Deletes the item. Past order lines keep their price snapshot with the
    /// menu item reference cleared.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        self.find_model(id).await?;

        let txn = self.db.begin().await?;

        order_item::Entity::update_many()
            .col_expr(
                order_item::Column::MenuItemId,
                Expr::value(Option::<i32>::None),
            )
            .filter(order_item::Column::MenuItemId.eq(id))
            .exec(&txn)
            .await?;
        MenuItemEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, menu_item_id = id, "Failed to commit menu item delete");
            ServiceError::DatabaseError(e)
        })?;

        info!(menu_item_id = id, "Menu item deleted");
        Ok(())
    }

    async fn find_model(&self, id: i32) -> Result<menu_item::Model, ServiceError> {
        MenuItemEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                warn!(menu_item_id = id, "Menu item not found");
                ServiceError::not_found("Menu item", id)
            })
    }
}

async fn ensure_category_belongs<C: ConnectionTrait>(
    db: &C,
    category_id: i32,
    restaurant_id: i32,
) -> Result<(), ServiceError> {
    match menu_category::Entity::find_by_id(category_id).one(db).await? {
        Some(category) if category.restaurant_id == restaurant_id => Ok(()),
        Some(_) => Err(ServiceError::BadRequest(format!(
            "Menu category {} does not belong to restaurant {}",
            category_id, restaurant_id
        ))),
        None => Err(ServiceError::BadRequest(format!(
            "Menu category {} not found",
            category_id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn response_carries_money_with_two_places() {
        let model = menu_item::Model {
            id: 1,
            restaurant_id: 1,
            category_id: None,
            name: "Tacos".into(),
            description: None,
            price: dec!(9),
            discount: Some(dec!(12.5)),
            image_url: None,
            is_available: true,
        };

        let response = MenuItemResponse::from(model);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["price"], "9.00");
        assert_eq!(json["discount"], "12.50");
    }

    #[test]
    fn patch_can_clear_category_and_discount() {
        let patch: UpdateMenuItemRequest =
            serde_json::from_str(r#"{"category_id": null, "discount": null, "price": "4.25"}"#)
                .unwrap();
        assert_eq!(patch.category_id, Some(None));
        assert_eq!(patch.discount, Some(None));
        assert_eq!(patch.price, Some(dec!(4.25)));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn price_and_discount_checks() {
        assert!(check_price(dec!(0.01)).is_ok());
        assert!(check_price(dec!(0)).is_err());
        assert!(check_discount(None).is_ok());
        assert!(check_discount(Some(dec!(100))).is_ok());
        assert!(check_discount(Some(dec!(101))).is_err());
        assert!(check_discount(Some(dec!(7.125))).is_err());
    }

    #[test]
    fn price_check_names_the_broken_rule() {
        let message = |price| check_price(price).unwrap_err().to_string();
        assert_eq!(
            message(dec!(0.001)),
            "Validation error: price must have at most 2 decimal places"
        );
        assert_eq!(
            message(dec!(100000000)),
            "Validation error: price must be at most 99999999.99"
        );
        assert_eq!(message(dec!(-2)), "Validation error: price must be greater than 0");
    }
}
