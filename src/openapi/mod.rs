use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "CartaSmart API",
        version = "1.0.0",
        description = r#"
# CartaSmart API

Restaurant ordering backend used by the CartaSmart chatbot and voice assistant.

## Features

- **Menus**: Restaurants, menu categories and menu items with optional percentage discounts
- **Customers**: Customers are identified by email; registering a known email returns the existing record
- **Orders**: Orders are priced server-side from the current menu at creation time
- **Speech**: Audio transcription and text-to-speech pass-through

## Money

Prices, subtotals and totals are decimal strings with two places, e.g. `"33.00"`.

## Errors

Failures share one body shape:

```json
{
  "error": "Bad Request",
  "message": "Bad request: Menu item 12 not available",
  "request_id": "8f1c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints accept `skip` (default 0) and `limit` (default 100, max 100).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "restaurants", description = "Restaurant endpoints"),
        (name = "menu-categories", description = "Menu category endpoints"),
        (name = "menu-items", description = "Menu item endpoints"),
        (name = "customers", description = "Customer endpoints"),
        (name = "orders", description = "Order endpoints"),
        (name = "speech", description = "Transcription and text-to-speech")
    ),
    paths(
        // Restaurants
        crate::handlers::restaurants::create_restaurant,
        crate::handlers::restaurants::list_restaurants,
        crate::handlers::restaurants::get_restaurant,
        crate::handlers::restaurants::update_restaurant,
        crate::handlers::restaurants::delete_restaurant,

        // Menu categories
        crate::handlers::menu_categories::create_menu_category,
        crate::handlers::menu_categories::list_menu_categories,
        crate::handlers::menu_categories::list_categories_by_restaurant,
        crate::handlers::menu_categories::get_menu_category,
        crate::handlers::menu_categories::update_menu_category,
        crate::handlers::menu_categories::delete_menu_category,

        // Menu items
        crate::handlers::menu_items::create_menu_item,
        crate::handlers::menu_items::list_menu_items,
        crate::handlers::menu_items::list_items_by_restaurant,
        crate::handlers::menu_items::list_items_by_category,
        crate::handlers::menu_items::get_menu_item,
        crate::handlers::menu_items::update_menu_item,
        crate::handlers::menu_items::delete_menu_item,

        // Customers
        crate::handlers::customers::create_customer,
        crate::handlers::customers::list_customers,
        crate::handlers::customers::get_customer,
        crate::handlers::customers::update_customer,
        crate::handlers::customers::delete_customer,

        // Orders
        crate::handlers::orders::create_order,
        crate::handlers::orders::list_orders,
        crate::handlers::orders::list_orders_by_customer,
        crate::handlers::orders::get_order,
        crate::handlers::orders::update_order,
        crate::handlers::orders::delete_order,

        // Speech
        crate::handlers::speech::transcribe,
        crate::handlers::speech::text_to_speech,
    ),
    components(
        schemas(
            crate::services::restaurants::CreateRestaurantRequest,
            crate::services::restaurants::UpdateRestaurantRequest,
            crate::services::restaurants::RestaurantResponse,
            crate::services::menu_categories::CreateMenuCategoryRequest,
            crate::services::menu_categories::UpdateMenuCategoryRequest,
            crate::services::menu_categories::MenuCategoryResponse,
            crate::services::menu_items::CreateMenuItemRequest,
            crate::services::menu_items::UpdateMenuItemRequest,
            crate::services::menu_items::MenuItemResponse,
            crate::services::customers::CreateCustomerRequest,
            crate::services::customers::UpdateCustomerRequest,
            crate::services::customers::CustomerResponse,
            crate::services::orders::OrderLineRequest,
            crate::services::orders::CreateOrderRequest,
            crate::services::orders::UpdateOrderRequest,
            crate::services::orders::OrderItemResponse,
            crate::services::orders::OrderResponse,
            crate::handlers::speech::TranscriptionResponse,
            crate::handlers::speech::SpeechRequest,
            crate::handlers::speech::SpeechResponse,
            crate::handlers::speech::AudioForm,

            // Error types
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_every_resource() {
        let json = serde_json::to_string_pretty(&ApiDoc::openapi()).unwrap();
        assert!(json.contains("CartaSmart API"));
        for path in [
            "/restaurants/{id}",
            "/menu-categories/by-restaurant/{restaurant_id}",
            "/menu-items/by-menu_category/{category_id}",
            "/customers",
            "/orders/by-customer/{customer_id}",
            "/transcribe",
            "/tts",
        ] {
            assert!(json.contains(path), "missing {path}");
        }
    }
}
