pub mod common;
pub mod customers;
pub mod menu_categories;
pub mod menu_items;
pub mod orders;
pub mod restaurants;
pub mod speech;

use crate::services::{
    customers::CustomerService, menu_categories::MenuCategoryService,
    menu_items::MenuItemService, orders::OrderService, restaurants::RestaurantService,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub restaurants: Arc<RestaurantService>,
    pub menu_categories: Arc<MenuCategoryService>,
    pub menu_items: Arc<MenuItemService>,
    pub customers: Arc<CustomerService>,
    pub orders: Arc<OrderService>,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            restaurants: Arc::new(RestaurantService::new(db.clone())),
            menu_categories: Arc::new(MenuCategoryService::new(db.clone())),
            menu_items: Arc::new(MenuItemService::new(db.clone())),
            customers: Arc::new(CustomerService::new(db.clone())),
            orders: Arc::new(OrderService::new(db)),
        }
    }
}
