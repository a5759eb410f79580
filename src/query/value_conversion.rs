//! Value conversion utilities for SeaQuery to may_postgres.
//!
//! Bound values travel through the read layer as `sea_query::Values` and are only turned
//! into `may_postgres` `ToSql` parameters right before execution. Each value becomes an
//! owned, boxed `Option<T>` so nulls keep their column type; references into that storage
//! are valid for the duration of the closure.

use crate::executor::LifeError;
use may_postgres::types::ToSql;
use sea_query::{Value, ValueType, Values};

/// Convert SeaQuery values to may_postgres ToSql parameters and run `f` with them.
///
/// # Errors
///
/// Returns `LifeError::Other` if a value has no parameter mapping, or whatever `f` returns.
pub fn with_converted_params<F, R>(values: &Values, f: F) -> Result<R, LifeError>
where
    F: FnOnce(&[&dyn ToSql]) -> Result<R, LifeError>,
{
    let owned = values
        .iter()
        .map(to_sql_param)
        .collect::<Result<Vec<_>, _>>()?;
    let params: Vec<&dyn ToSql> = owned.iter().map(|param| &**param).collect();
    f(&params)
}

fn to_sql_param(value: &Value) -> Result<Box<dyn ToSql>, LifeError> {
    let param: Box<dyn ToSql> = match value {
        Value::Bool(v) => Box::new(*v),
        // Postgres has no single-byte integer; widen to int2.
        Value::TinyInt(v) => Box::new(v.map(i16::from)),
        Value::SmallInt(v) => Box::new(*v),
        Value::Int(v) => Box::new(*v),
        Value::BigInt(v) => Box::new(*v),
        Value::TinyUnsigned(v) => Box::new(v.map(i16::from)),
        Value::SmallUnsigned(v) => Box::new(v.map(i32::from)),
        Value::Unsigned(v) => Box::new(v.map(i64::from)),
        Value::BigUnsigned(v) => {
            let widened = match v {
                Some(u) => Some(i64::try_from(*u).map_err(|_| {
                    LifeError::Other(format!(
                        "BigUnsigned value {u} exceeds i64::MAX ({}), cannot be safely cast to i64",
                        i64::MAX
                    ))
                })?),
                None => None,
            };
            Box::new(widened)
        }
        Value::Float(v) => Box::new(*v),
        Value::Double(v) => Box::new(*v),
        Value::String(v) => Box::new(v.clone()),
        Value::Bytes(v) => Box::new(v.clone()),
        Value::Json(v) => Box::new(v.as_ref().map(|json| (**json).clone())),
        Value::Uuid(_) => bind_typed::<uuid::Uuid>(value)?,
        Value::ChronoDate(_) => bind_typed::<chrono::NaiveDate>(value)?,
        Value::ChronoDateTime(_) => bind_typed::<chrono::NaiveDateTime>(value)?,
        Value::ChronoDateTimeUtc(_) => bind_typed::<chrono::DateTime<chrono::Utc>>(value)?,
        Value::Decimal(_) => bind_typed::<rust_decimal::Decimal>(value)?,
        _ => {
            return Err(LifeError::Other(format!(
                "Unsupported value type in query: {value:?}"
            )));
        }
    };
    Ok(param)
}

/// Box a value as `Option<T>`, so a null keeps its column type.
fn bind_typed<T>(value: &Value) -> Result<Box<dyn ToSql>, LifeError>
where
    Option<T>: ValueType + ToSql + 'static,
{
    let typed = <Option<T> as ValueType>::try_from(value.clone())
        .map_err(|_| LifeError::Other(format!("Cannot bind value as parameter: {value:?}")))?;
    Ok(Box::new(typed))
}
