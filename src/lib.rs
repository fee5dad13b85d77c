//! CartaSmart API Library
//!
//! Restaurant ordering backend: menus, customers, priced orders and speech
//! pass-through endpoints for the CartaSmart chatbot.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::DefaultBodyLimit,
    response::Json,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use services::speech::{Synthesizer, Transcriber};
use std::sync::Arc;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
    pub transcriber: Arc<dyn Transcriber>,
    pub synthesizer: Arc<dyn Synthesizer>,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        transcriber: Arc<dyn Transcriber>,
        synthesizer: Arc<dyn Synthesizer>,
    ) -> Self {
        Self {
            services: handlers::AppServices::new(db.clone()),
            db,
            config,
            transcriber,
            synthesizer,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StatusMessage {
    pub message: String,
}

async fn root() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "CartaSmart API is running".to_string(),
    })
}

/// Resource routes, without middleware.
pub fn api_routes() -> Router<AppState> {
    use handlers::{customers, menu_categories, menu_items, orders, restaurants, speech};

    let restaurants = Router::new()
        .route(
            "/restaurants",
            post(restaurants::create_restaurant).get(restaurants::list_restaurants),
        )
        .route(
            "/restaurants/:id",
            get(restaurants::get_restaurant)
                .put(restaurants::update_restaurant)
                .delete(restaurants::delete_restaurant),
        );

    let menu_categories = Router::new()
        .route(
            "/menu-categories",
            post(menu_categories::create_menu_category)
                .get(menu_categories::list_menu_categories),
        )
        .route(
            "/menu-categories/by-restaurant/:restaurant_id",
            get(menu_categories::list_categories_by_restaurant),
        )
        .route(
            "/menu-categories/:id",
            get(menu_categories::get_menu_category)
                .put(menu_categories::update_menu_category)
                .delete(menu_categories::delete_menu_category),
        );

    let menu_items = Router::new()
        .route(
            "/menu-items",
            post(menu_items::create_menu_item).get(menu_items::list_menu_items),
        )
        .route(
            "/menu-items/by-restaurant/:restaurant_id",
            get(menu_items::list_items_by_restaurant),
        )
        .route(
            "/menu-items/by-menu_category/:category_id",
            get(menu_items::list_items_by_category),
        )
        .route(
            "/menu-items/:id",
            get(menu_items::get_menu_item)
                .put(menu_items::update_menu_item)
                .delete(menu_items::delete_menu_item),
        );

    let customers = Router::new()
        .route(
            "/customers",
            post(customers::create_customer).get(customers::list_customers),
        )
        .route(
            "/customers/:id",
            get(customers::get_customer)
                .put(customers::update_customer)
                .delete(customers::delete_customer),
        );

    let orders = Router::new()
        .route(
            "/orders",
            post(orders::create_order).get(orders::list_orders),
        )
        .route(
            "/orders/by-customer/:customer_id",
            get(orders::list_orders_by_customer),
        )
        .route(
            "/orders/:id",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        );

    let speech = Router::new()
        .route("/transcribe", post(speech::transcribe))
        .route("/tts", post(speech::text_to_speech));

    Router::new()
        .route("/", get(root))
        .merge(restaurants)
        .merge(menu_categories)
        .merge(menu_items)
        .merge(customers)
        .merge(orders)
        .merge(speech)
}

/// Full application router: resources, health, Swagger UI, body limit,
/// HTTP tracing and request ids. CORS and compression are added by the binary.
pub fn app_router(state: AppState, health_state: Arc<health::HealthState>) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(api_routes().with_state(state))
        .nest("/health", health::health_routes(health_state))
        .merge(openapi::swagger_ui())
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(crate::tracing::configure_http_tracing())
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
}
