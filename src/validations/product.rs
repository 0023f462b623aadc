use bigdecimal::{BigDecimal, Zero};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug)]
pub struct ProductName(String);

impl ProductName {
    pub fn parse(s: String) -> std::result::Result<ProductName, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.graphemes(true).count() > 200 {
            Err(format!("{} is not a valid product name.", s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for ProductName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A non-negative amount that fits `NUMERIC(10, 2)`.
#[derive(Debug)]
pub struct ProductPrice(BigDecimal);

impl ProductPrice {
    pub fn parse(value: BigDecimal) -> std::result::Result<ProductPrice, String> {
        if value < BigDecimal::zero() {
            return Err(format!("{} is not a valid price: must not be negative.", value));
        }
        let (_, scale) = value.normalized().as_bigint_and_exponent();
        if scale > 2 {
            return Err(format!(
                "{} is not a valid price: at most two decimal places are allowed.",
                value
            ));
        }
        if value >= BigDecimal::from(100_000_000) {
            return Err(format!("{} is not a valid price: too large.", value));
        }
        Ok(Self(value.with_scale(2)))
    }

    pub fn into_inner(self) -> BigDecimal {
        self.0
    }
}

/// `price × quantity` rounded to cents, rejected when it overflows the
/// `NUMERIC(10, 2)` order total column.
pub fn order_total(
    price: &BigDecimal,
    quantity: OrderQuantity,
) -> std::result::Result<BigDecimal, String> {
    let total = (price * BigDecimal::from(quantity.value())).with_scale(2);
    if total >= BigDecimal::from(100_000_000) {
        return Err(format!(
            "An order of {} at {} is not valid: total {} is too large.",
            quantity.value(),
            price,
            total
        ));
    }
    Ok(total)
}

/// Stock added by one restock sweep.
///
/// Only products with `stock < threshold` are raised, so the largest stock the
/// sweep can produce is `threshold - 1 + increment`, which must fit a stock
/// column.
#[derive(Debug, Clone, Copy)]
pub struct RestockIncrement(i32);

impl RestockIncrement {
    pub fn parse(threshold: i32, increment: i32) -> std::result::Result<RestockIncrement, String> {
        if increment < 0 {
            return Err(format!(
                "{} is not a valid increment: must not be negative.",
                increment
            ));
        }
        let highest = i64::from(threshold) - 1 + i64::from(increment);
        if highest > i64::from(i32::MAX) {
            return Err(format!(
                "{} is not a valid increment: stock below {} could exceed {}.",
                increment,
                threshold,
                i32::MAX
            ));
        }
        Ok(Self(increment))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct StockLevel(i32);

impl StockLevel {
    pub fn parse(value: i32) -> std::result::Result<StockLevel, String> {
        if value < 0 {
            Err(format!("{} is not a valid stock level: must not be negative.", value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrderQuantity(i32);

impl OrderQuantity {
    pub fn parse(value: i32) -> std::result::Result<OrderQuantity, String> {
        if value < 1 {
            Err(format!("{} is not a valid quantity: must be at least 1.", value))
        } else {
            Ok(Self(value))
        }
    }

    pub fn value(self) -> i32 {
        self.0
    }
}
