//! Lenient numeric fields: clients send pixels as ints, floats or numeric strings

use serde::de::{Deserializer, Error};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Number {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Number {
    fn into_f64<E: Error>(self) -> Result<f64, E> {
        match self {
            Number::Int(v) => Ok(v as f64),
            Number::Float(v) => Ok(v),
            Number::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
        }
    }

    fn into_i32<E: Error>(self) -> Result<i32, E> {
        let value = match self {
            Number::Int(v) => v as f64,
            other => other.into_f64()?,
        };
        if !value.is_finite() || value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(E::custom(format!("number out of range: {value}")));
        }
        Ok(value.trunc() as i32)
    }
}

pub(crate) fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    Number::deserialize(deserializer)?.into_i32()
}

pub(crate) fn opt_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(Number::into_i32)
        .transpose()
}

pub(crate) fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Number::deserialize(deserializer)?.into_f64()
}

pub(crate) fn opt_float<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Number>::deserialize(deserializer)?
        .map(Number::into_f64)
        .transpose()
}
