use crate::{
    entities::{
        customer, menu_item,
        order::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity, Model as OrderModel},
        order_item::{self, Entity as OrderItemEntity, Model as OrderItemModel},
        restaurant,
    },
    errors::ServiceError,
    services::pricing::{price_order, to_money, LineInput},
};
use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// One requested line: which menu item and how many.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct OrderLineRequest {
    pub menu_item_id: i32,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateOrderRequest {
    pub restaurant_id: i32,
    pub customer_id: i32,
    #[serde(default)]
    #[validate]
    pub items: Vec<OrderLineRequest>,
}

/// Only the status and channel are editable; totals are fixed at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateOrderRequest {
    #[validate(length(min = 1, max = 50))]
    pub status: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub channel: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItemResponse {
    pub id: i32,
    pub order_id: i32,
    pub menu_item_id: Option<i32>,
    pub quantity: i32,
    #[schema(value_type = String, example = "9.00")]
    pub unit_price: Decimal,
    #[schema(value_type = String, example = "18.00")]
    pub subtotal: Decimal,
}

impl From<OrderItemModel> for OrderItemResponse {
    fn from(model: OrderItemModel) -> Self {
        Self {
            id: model.id,
            order_id: model.order_id,
            menu_item_id: model.menu_item_id,
            quantity: model.quantity,
            unit_price: to_money(model.unit_price),
            subtotal: to_money(model.subtotal),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderResponse {
    pub id: i32,
    pub restaurant_id: i32,
    pub customer_id: i32,
    pub status: String,
    #[schema(value_type = String, example = "33.00")]
    pub total_amount: Decimal,
    pub channel: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<OrderItemResponse>,
}

/// Validates and prices orders, and persists them with their lines.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DatabaseConnection>,
}

impl OrderService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Creates a priced order.
    ///
    /// The restaurant, the customer and then every menu item (in request
    /// order) must exist, and every item must be available; the first
    /// failing reference aborts the whole order. Header and lines are written
    /// in a single transaction.
    #[instrument(
        skip(self, request),
        fields(restaurant_id = request.restaurant_id, customer_id = request.customer_id, lines = request.items.len())
    )]
    pub async fn create(&self, request: CreateOrderRequest) -> Result<OrderResponse, ServiceError> {
        request.validate()?;
        let start = std::time::Instant::now();
        let db = &*self.db;

        if restaurant::Entity::find_by_id(request.restaurant_id)
            .one(db)
            .await?
            .is_none()
        {
            warn!("Order rejected: unknown restaurant");
            return Err(ServiceError::BadRequest(format!(
                "Restaurant {} not found",
                request.restaurant_id
            )));
        }

        if customer::Entity::find_by_id(request.customer_id)
            .one(db)
            .await?
            .is_none()
        {
            warn!("Order rejected: unknown customer");
            return Err(ServiceError::BadRequest(format!(
                "Customer {} not found",
                request.customer_id
            )));
        }

        let mut lines = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let item = menu_item::Entity::find_by_id(line.menu_item_id)
                .one(db)
                .await?
                .filter(|item| item.is_available)
                .ok_or_else(|| {
                    warn!(menu_item_id = line.menu_item_id, "Order rejected: menu item not available");
                    counter!("cartasmart_orders.rejected", 1);
                    ServiceError::BadRequest(format!(
                        "Menu item {} not available",
                        line.menu_item_id
                    ))
                })?;
            lines.push(LineInput {
                price: item.price,
                discount: item.discount,
                quantity: line.quantity,
            });
        }

        let (priced, total) = price_order(&lines).map_err(|e| {
            warn!(error = %e, "Order rejected: amount out of range");
            counter!("cartasmart_orders.rejected", 1);
            e
        })?;

        let txn = db.begin().await.map_err(|e| {
            error!(error = %e, "Failed to start transaction for order creation");
            ServiceError::DatabaseError(e)
        })?;

        let order_model = OrderActiveModel {
            restaurant_id: Set(request.restaurant_id),
            customer_id: Set(request.customer_id),
            status: Set(order::DEFAULT_STATUS.to_string()),
            total_amount: Set(total),
            channel: Set(order::DEFAULT_CHANNEL.to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to insert order header");
            ServiceError::DatabaseError(e)
        })?;

        let mut item_models = Vec::with_capacity(priced.len());
        for (line, price) in request.items.iter().zip(priced.iter()) {
            let item = order_item::ActiveModel {
                order_id: Set(order_model.id),
                menu_item_id: Set(Some(line.menu_item_id)),
                quantity: Set(line.quantity),
                unit_price: Set(price.unit_price),
                subtotal: Set(price.subtotal),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(error = %e, order_id = order_model.id, "Failed to insert order line");
                ServiceError::DatabaseError(e)
            })?;
            item_models.push(item);
        }

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = order_model.id, "Failed to commit order creation transaction");
            ServiceError::DatabaseError(e)
        })?;

        counter!("cartasmart_orders.created", 1);
        histogram!("cartasmart_orders.create.duration", start.elapsed());
        info!(order_id = order_model.id, total = %total, "Order created successfully");

        Ok(Self::to_response(order_model, item_models))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<OrderResponse, ServiceError> {
        let order = self.find_model(&*self.db, id).await?;
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(Self::to_response(order, items))
    }

    #[instrument(skip(self))]
    pub async fn list(&self, skip: u64, limit: u64) -> Result<Vec<OrderResponse>, ServiceError> {
        let orders = OrderEntity::find()
            .order_by_asc(order::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&*self.db)
            .await?;
        self.attach_items(orders).await
    }

    #[instrument(skip(self))]
    pub async fn list_by_customer(
        &self,
        customer_id: i32,
    ) -> Result<Vec<OrderResponse>, ServiceError> {
        let orders = OrderEntity::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_asc(order::Column::Id)
            .all(&*self.db)
            .await?;
        self.attach_items(orders).await
    }

    #[instrument(skip(self, patch))]
    pub async fn update(
        &self,
        id: i32,
        patch: UpdateOrderRequest,
    ) -> Result<OrderResponse, ServiceError> {
        patch.validate()?;

        let mut active: OrderActiveModel = self.find_model(&*self.db, id).await?.into();
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(channel) = patch.channel {
            active.channel = Set(channel);
        }
        active.updated_at = Set(Some(Utc::now()));

        let updated = active.update(&*self.db).await.map_err(|e| {
            error!(error = %e, order_id = id, "Failed to update order");
            ServiceError::DatabaseError(e)
        })?;
        info!(order_id = id, status = %updated.status, "Order updated");

        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(id))
            .order_by_asc(order_item::Column::Id)
            .all(&*self.db)
            .await?;
        Ok(Self::to_response(updated, items))
    }

    /// Deletes the order together with its lines.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let txn = self.db.begin().await?;
        self.find_model(&txn, id).await?;

        let lines = OrderItemEntity::delete_many()
            .filter(order_item::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        OrderEntity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await.map_err(|e| {
            error!(error = %e, order_id = id, "Failed to commit order delete");
            ServiceError::DatabaseError(e)
        })?;

        info!(order_id = id, lines_removed = lines.rows_affected, "Order deleted");
        Ok(())
    }

    async fn attach_items(&self, orders: Vec<OrderModel>) -> Result<Vec<OrderResponse>, ServiceError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = orders.iter().map(|o| o.id).collect();
        let mut by_order: HashMap<i32, Vec<OrderItemModel>> = HashMap::new();
        for item in OrderItemEntity::find()
            .filter(order_item::Column::OrderId.is_in(ids))
            .order_by_asc(order_item::Column::Id)
            .all(&*self.db)
            .await?
        {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                Self::to_response(order, items)
            })
            .collect())
    }

    async fn find_model<C: ConnectionTrait>(&self, db: &C, id: i32) -> Result<OrderModel, ServiceError> {
        OrderEntity::find_by_id(id).one(db).await?.ok_or_else(|| {
            warn!(order_id = id, "Order not found");
            ServiceError::not_found("Order", id)
        })
    }

    fn to_response(model: OrderModel, items: Vec<OrderItemModel>) -> OrderResponse {
        OrderResponse {
            id: model.id,
            restaurant_id: model.restaurant_id,
            customer_id: model.customer_id,
            status: model.status,
            total_amount: to_money(model.total_amount),
            channel: model.channel,
            created_at: model.created_at,
            updated_at: model.updated_at,
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn response_normalizes_money_and_keeps_lines() {
        let now = Utc::now();
        let model = OrderModel {
            id: 7,
            restaurant_id: 1,
            customer_id: 2,
            status: "pending".into(),
            total_amount: dec!(33),
            channel: "chatbot".into(),
            created_at: now,
            updated_at: None,
        };
        let items = vec![OrderItemModel {
            id: 1,
            order_id: 7,
            menu_item_id: Some(4),
            quantity: 2,
            unit_price: dec!(9),
            subtotal: dec!(18),
        }];

        let response = OrderService::to_response(model, items);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["total_amount"], "33.00");
        assert_eq!(json["items"][0]["unit_price"], "9.00");
        assert_eq!(json["items"][0]["subtotal"], "18.00");
        assert_eq!(response.items.len(), 1);
    }

    #[test]
    fn zero_quantity_fails_validation() {
        let request = CreateOrderRequest {
            restaurant_id: 1,
            customer_id: 1,
            items: vec![OrderLineRequest {
                menu_item_id: 1,
                quantity: 0,
            }],
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn missing_items_defaults_to_empty_order() {
        let request: CreateOrderRequest =
            serde_json::from_str(r#"{"restaurant_id": 1, "customer_id": 2}"#).unwrap();
        assert!(request.items.is_empty());
        assert!(request.validate().is_ok());
    }
}
