use async_graphql::{InputValueError, InputValueResult, Scalar, ScalarType, Value};
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// Fixed-point amount. Serialized as a string with two decimal places so no
/// precision is lost in JSON; accepts either a string or a number as input.
#[derive(Debug, Clone, PartialEq)]
pub struct Decimal(pub BigDecimal);

#[Scalar(name = "Decimal")]
impl ScalarType for Decimal {
    fn parse(value: Value) -> InputValueResult<Self> {
        let parsed = match &value {
            Value::String(s) => BigDecimal::from_str(s.trim()),
            Value::Number(n) => BigDecimal::from_str(&n.to_string()),
            _ => return Err(InputValueError::expected_type(value)),
        };
        parsed.map(Decimal).map_err(InputValueError::custom)
    }

    fn to_value(&self) -> Value {
        Value::String(two_decimal_places(&self.0))
    }
}

/// Renders `value` with exactly two decimal places, zero included.
///
/// `BigDecimal`'s `Display` drops the fractional digits of a zero, so the
/// digits are laid out from the scaled integer instead.
pub fn two_decimal_places(value: &BigDecimal) -> String {
    let (digits, _) = value.with_scale(2).as_bigint_and_exponent();
    let digits = digits.to_string();
    let (sign, magnitude) = match digits.strip_prefix('-') {
        Some(magnitude) => ("-", magnitude),
        None => ("", digits.as_str()),
    };
    let padded = format!("{:0>3}", magnitude);
    let (whole, cents) = padded.split_at(padded.len() - 2);
    format!("{}{}.{}", sign, whole, cents)
}

impl From<BigDecimal> for Decimal {
    fn from(value: BigDecimal) -> Self {
        Decimal(value)
    }
}
