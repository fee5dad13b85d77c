// Entity services
pub mod customers;
pub mod menu_categories;
pub mod menu_items;
pub mod orders;
pub mod restaurants;

// Order total calculation
pub mod pricing;

// External speech provider
pub mod speech;

use crate::errors::ServiceError;
use sea_orm::{DbErr, SqlErr};

/// Length check for nullable patch fields, which the derive cannot see through.
pub(crate) fn ensure_max_len(
    field: &str,
    value: Option<&Option<String>>,
    max: usize,
) -> Result<(), ServiceError> {
    match value {
        Some(Some(v)) if v.chars().count() > max => Err(ServiceError::ValidationError(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

/// Maps a foreign-key violation raised by a restricted delete to a conflict.
pub(crate) fn conflict_if_referenced(err: DbErr, message: impl FnOnce() -> String) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => ServiceError::Conflict(message()),
        _ => ServiceError::DatabaseError(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{customer, order, restaurant};
    use chrono::Utc;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, EntityTrait, Set};

    #[test]
    fn nullable_length_check() {
        assert!(ensure_max_len("phone", None, 3).is_ok());
        assert!(ensure_max_len("phone", Some(&None), 3).is_ok());
        assert!(ensure_max_len("phone", Some(&Some("abc".into())), 3).is_ok());

        let err = ensure_max_len("phone", Some(&Some("abcd".into())), 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation error: phone must be at most 3 characters"
        );
    }

    #[tokio::test]
    async fn restricted_delete_maps_to_conflict() {
        let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).min_connections(1);
        let db = sea_orm::Database::connect(options).await.unwrap();
        crate::db::run_migrations(&db).await.unwrap();

        let restaurant = restaurant::ActiveModel {
            name: Set("La Cocina".into()),
            address: Set(None),
            phone: Set(None),
            is_active: Set(true),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        let customer = customer::ActiveModel {
            name: Set("Ana".into()),
            email: Set(None),
            phone: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();
        order::ActiveModel {
            restaurant_id: Set(restaurant.id),
            customer_id: Set(customer.id),
            status: Set(order::DEFAULT_STATUS.into()),
            total_amount: Set(Decimal::ZERO),
            channel: Set(order::DEFAULT_CHANNEL.into()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await
        .unwrap();

        let err = customer::Entity::delete_by_id(customer.id)
            .exec(&db)
            .await
            .unwrap_err();
        let mapped = conflict_if_referenced(err, || "Customer has orders".to_string());

        assert!(matches!(mapped, ServiceError::Conflict(ref msg) if msg == "Customer has orders"));
    }

    #[test]
    fn other_database_errors_pass_through() {
        let mapped = conflict_if_referenced(DbErr::Custom("disk full".into()), String::new);
        assert!(matches!(mapped, ServiceError::DatabaseError(_)));
    }
}
