pub mod customer;
pub mod menu_category;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod restaurant;
