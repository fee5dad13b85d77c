//! Order pricing.
//!
//! Prices are snapshotted per line at order creation: the unit price is the
//! menu price less its percentage discount, rounded to cents, and the order
//! total is the exact sum of the line subtotals.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::errors::ServiceError;

/// Number of decimal places carried by every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a NUMERIC(10,2) column holds.
pub const MAX_AMOUNT: Decimal = dec!(99999999.99);

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Rounds to cents (half away from zero) and fixes the scale so the value
/// always serializes with two decimal places.
pub fn to_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// True when the value needs no more than cent precision.
pub fn fits_money_scale(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

fn amount_too_large() -> ServiceError {
    ServiceError::BadRequest(format!("Order amount exceeds {}", MAX_AMOUNT))
}

fn bounded(value: Option<Decimal>) -> Result<Decimal, ServiceError> {
    value
        .filter(|amount| *amount <= MAX_AMOUNT)
        .ok_or_else(amount_too_large)
}

/// Unit price after applying a percentage discount. A missing or zero
/// discount leaves the price unchanged.
pub fn discounted_unit_price(
    price: Decimal,
    discount: Option<Decimal>,
) -> Result<Decimal, ServiceError> {
    let unit_price = match discount {
        Some(pct) if !pct.is_zero() => (pct / ONE_HUNDRED)
            .checked_mul(price)
            .and_then(|off| price.checked_sub(off)),
        _ => Some(price),
    };
    bounded(unit_price).map(to_money)
}

/// A single line as seen by the calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInput {
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

pub fn price_line(line: &LineInput) -> Result<PricedLine, ServiceError> {
    let unit_price = discounted_unit_price(line.price, line.discount)?;
    let subtotal = bounded(unit_price.checked_mul(Decimal::from(line.quantity)))?;
    Ok(PricedLine {
        unit_price,
        subtotal: to_money(subtotal),
    })
}

/// Prices each line in input order and accumulates the total. Fails when a
/// subtotal or the total no longer fits a money column.
pub fn price_order(lines: &[LineInput]) -> Result<(Vec<PricedLine>, Decimal), ServiceError> {
    let priced = lines
        .iter()
        .map(price_line)
        .collect::<Result<Vec<_>, _>>()?;
    let total = priced.iter().try_fold(Decimal::ZERO, |acc, line| {
        bounded(acc.checked_add(line.subtotal))
    })?;
    Ok((priced, to_money(total)))
}

/// Menu prices must be strictly positive and fit a money column.
pub fn is_valid_price(price: Decimal) -> bool {
    price > Decimal::ZERO && price <= MAX_AMOUNT && fits_money_scale(price)
}

/// Discounts are percentages in `[0, 100]` with at most two decimals.
pub fn is_valid_discount(discount: Decimal) -> bool {
    discount >= Decimal::ZERO && discount <= ONE_HUNDRED && fits_money_scale(discount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(10.00), None, dec!(10.00))]
    #[case(dec!(10.00), Some(dec!(0)), dec!(10.00))]
    #[case(dec!(10.00), Some(dec!(10)), dec!(9.00))]
    #[case(dec!(10.00), Some(dec!(100)), dec!(0.00))]
    #[case(dec!(9.99), Some(dec!(15)), dec!(8.49))]
    #[case(dec!(0.05), Some(dec!(50)), dec!(0.03))]
    fn unit_price_applies_percentage_discount(
        #[case] price: Decimal,
        #[case] discount: Option<Decimal>,
        #[case] expected: Decimal,
    ) {
        assert_eq!(discounted_unit_price(price, discount).unwrap(), expected);
    }

    #[test]
    fn money_always_has_two_decimal_places() {
        assert_eq!(to_money(dec!(33)).to_string(), "33.00");
        assert_eq!(to_money(dec!(9.5)).to_string(), "9.50");
        assert_eq!(to_money(dec!(0.125)).to_string(), "0.13");
    }

    #[test]
    fn mixed_order_totals_to_sum_of_subtotals() {
        let lines = [
            LineInput {
                price: dec!(10.00),
                discount: Some(dec!(10)),
                quantity: 2,
            },
            LineInput {
                price: dec!(5.00),
                discount: None,
                quantity: 3,
            },
        ];

        let (priced, total) = price_order(&lines).unwrap();

        assert_eq!(priced[0].unit_price, dec!(9.00));
        assert_eq!(priced[0].subtotal, dec!(18.00));
        assert_eq!(priced[1].unit_price, dec!(5.00));
        assert_eq!(priced[1].subtotal, dec!(15.00));
        assert_eq!(total, dec!(33.00));
    }

    #[test]
    fn empty_order_totals_zero() {
        let (priced, total) = price_order(&[]).unwrap();
        assert!(priced.is_empty());
        assert_eq!(total.to_string(), "0.00");
    }

    #[test]
    fn price_and_discount_bounds() {
        assert!(is_valid_price(dec!(0.01)));
        assert!(!is_valid_price(dec!(0)));
        assert!(!is_valid_price(dec!(-1)));
        assert!(is_valid_discount(dec!(0)));
        assert!(is_valid_discount(dec!(100)));
        assert!(!is_valid_discount(dec!(100.01)));
        assert!(!is_valid_discount(dec!(-0.5)));
    }

    #[test]
    fn sub_cent_and_oversized_values_are_invalid() {
        assert!(is_valid_price(MAX_AMOUNT));
        assert!(is_valid_price(dec!(10.500)));
        assert!(!is_valid_price(dec!(0.001)));
        assert!(!is_valid_price(dec!(100000000)));
        assert!(!is_valid_price(dec!(79228162514264337593543950)));
        assert!(is_valid_discount(dec!(12.50)));
        assert!(!is_valid_discount(dec!(12.345)));
    }

    #[test]
    fn oversized_line_is_an_error_not_a_panic() {
        let line = LineInput {
            price: Decimal::MAX,
            discount: None,
            quantity: 100_000,
        };
        assert!(matches!(price_line(&line), Err(ServiceError::BadRequest(_))));

        let line = LineInput {
            price: MAX_AMOUNT,
            discount: Some(dec!(10)),
            quantity: 2,
        };
        let err = price_order(&[line]).unwrap_err();
        assert_eq!(err.to_string(), "Bad request: Order amount exceeds 99999999.99");
    }

    #[test]
    fn total_over_the_column_limit_is_rejected() {
        let line = LineInput {
            price: dec!(60000000.00),
            discount: None,
            quantity: 1,
        };
        assert!(price_order(&[line]).is_ok());
        assert!(price_order(&[line, line]).is_err());
    }

    fn line_strategy() -> impl Strategy<Value = LineInput> {
        (1i64..100_000, prop::option::of(0i64..=10_000), 1i32..50).prop_map(
            |(cents, discount_bp, quantity)| LineInput {
                price: Decimal::new(cents, 2),
                discount: discount_bp.map(|bp| Decimal::new(bp, 2)),
                quantity,
            },
        )
    }

    proptest! {
        #[test]
        fn total_is_exact_sum_of_subtotals(lines in prop::collection::vec(line_strategy(), 0..12)) {
            let (priced, total) = price_order(&lines).unwrap();
            let sum: Decimal = priced.iter().map(|l| l.subtotal).sum();
            prop_assert_eq!(total, sum);
        }

        #[test]
        fn subtotal_is_unit_price_times_quantity(line in line_strategy()) {
            let priced = price_line(&line).unwrap();
            prop_assert_eq!(priced.subtotal, priced.unit_price * Decimal::from(line.quantity));
            prop_assert!(priced.unit_price <= line.price);
            prop_assert!(priced.unit_price >= Decimal::ZERO);
        }
    }
}
