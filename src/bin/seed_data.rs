//! Seed data script - populates the database with a demo restaurant
//!
//! Run with: cargo run --bin seed-data
//!
//! This creates:
//! - 1 restaurant with 3 menu categories
//! - 8 menu items, some discounted and one unavailable
//! - 2 customers
//! - 1 priced order

use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::info;

use cartasmart_api::{
    config::{init_tracing, load_config},
    db::{establish_connection_from_app_config, run_migrations},
    services::{
        customers::{CreateCustomerRequest, CustomerService},
        menu_categories::{CreateMenuCategoryRequest, MenuCategoryService},
        menu_items::{CreateMenuItemRequest, MenuItemResponse, MenuItemService},
        orders::{CreateOrderRequest, OrderLineRequest, OrderService},
        restaurants::{CreateRestaurantRequest, RestaurantService},
    },
};

struct SeedItem {
    category: usize,
    name: &'static str,
    description: &'static str,
    price: Decimal,
    discount: Option<Decimal>,
    is_available: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;
    init_tracing(cfg.log_level(), cfg.log_json);

    info!("=== CartaSmart Seed Data ===");

    let db = Arc::new(establish_connection_from_app_config(&cfg).await?);
    run_migrations(&db).await?;

    let restaurants = RestaurantService::new(db.clone());
    let categories = MenuCategoryService::new(db.clone());
    let menu_items = MenuItemService::new(db.clone());
    let customers = CustomerService::new(db.clone());
    let orders = OrderService::new(db);

    let restaurant = restaurants
        .create(CreateRestaurantRequest {
            name: "La Cocina de Carta".to_string(),
            address: Some("Av. Reforma 123, CDMX".to_string()),
            phone: Some("+52-55-5555-0101".to_string()),
            is_active: true,
        })
        .await?;
    info!("  Created restaurant {} ({})", restaurant.name, restaurant.id);

    let mut category_ids = Vec::new();
    for name in ["Tacos", "Bebidas", "Postres"] {
        let category = categories
            .create(CreateMenuCategoryRequest {
                restaurant_id: restaurant.id,
                name: name.to_string(),
            })
            .await?;
        category_ids.push(category.id);
    }
    info!("  Created {} menu categories", category_ids.len());

    let seed_items = [
        SeedItem { category: 0, name: "Tacos al pastor", description: "Three pork tacos with pineapple", price: dec!(9.00), discount: None, is_available: true },
        SeedItem { category: 0, name: "Tacos de carnitas", description: "Three slow-cooked pork tacos", price: dec!(9.50), discount: Some(dec!(10)), is_available: true },
        SeedItem { category: 0, name: "Tacos de pescado", description: "Baja-style fish tacos", price: dec!(11.00), discount: None, is_available: false },
        SeedItem { category: 1, name: "Horchata", description: "Rice and cinnamon drink", price: dec!(3.50), discount: None, is_available: true },
        SeedItem { category: 1, name: "Agua de jamaica", description: "Hibiscus iced tea", price: dec!(3.00), discount: None, is_available: true },
        SeedItem { category: 1, name: "Limonada", description: "Fresh lime lemonade", price: dec!(5.00), discount: Some(dec!(20)), is_available: true },
        SeedItem { category: 2, name: "Churros", description: "With chocolate sauce", price: dec!(6.00), discount: None, is_available: true },
        SeedItem { category: 2, name: "Flan", description: "Vanilla custard", price: dec!(5.50), discount: Some(dec!(15)), is_available: true },
    ];

    let mut created_items: Vec<MenuItemResponse> = Vec::new();
    for item in seed_items {
        let created = menu_items
            .create(CreateMenuItemRequest {
                restaurant_id: restaurant.id,
                category_id: category_ids.get(item.category).copied(),
                name: item.name.to_string(),
                description: Some(item.description.to_string()),
                price: item.price,
                discount: item.discount,
                image_url: None,
                is_available: item.is_available,
            })
            .await?;
        created_items.push(created);
    }
    info!("  Created {} menu items", created_items.len());

    let ana = customers
        .get_or_create(CreateCustomerRequest {
            name: "Ana López".to_string(),
            email: Some("ana@example.com".to_string()),
            phone: Some("+52-55-5555-0102".to_string()),
        })
        .await?
        .into_inner();
    customers
        .get_or_create(CreateCustomerRequest {
            name: "Bruno Díaz".to_string(),
            email: Some("bruno@example.com".to_string()),
            phone: None,
        })
        .await?;
    info!("  Created 2 customers");

    let lines = created_items
        .iter()
        .filter(|item| item.is_available)
        .take(3)
        .map(|item| OrderLineRequest {
            menu_item_id: item.id,
            quantity: 2,
        })
        .collect();
    let order = orders
        .create(CreateOrderRequest {
            restaurant_id: restaurant.id,
            customer_id: ana.id,
            items: lines,
        })
        .await?;
    info!(
        "  Created order {} with {} items, total {}",
        order.id,
        order.items.len(),
        order.total_amount
    );

    info!("=== Seed Data Complete ===");
    info!("Try these API calls:");
    info!("  curl http://localhost:8080/restaurants");
    info!(
        "  curl http://localhost:8080/menu-items/by-restaurant/{}",
        restaurant.id
    );
    info!("  curl http://localhost:8080/orders/by-customer/{}", ana.id);
    info!("Or explore interactively at: http://localhost:8080/swagger-ui");

    Ok(())
}
