//! TryGetable trait for safe value extraction
//!
//! Pulls typed Rust values out of `sea_query::Value` cells, separating null cells from
//! type mismatches so hydration code can report which one happened.

use sea_query::Value;

/// Error type for value extraction failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueExtractionError {
    /// The value is null (None variant)
    NullValue,
    /// The value type doesn't match the expected type
    TypeMismatch {
        expected: String,
        actual: String,
    },
    /// Value conversion failed (e.g., overflow, invalid format)
    ConversionError(String),
}

impl std::fmt::Display for ValueExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueExtractionError::NullValue => write!(f, "Value is null"),
            ValueExtractionError::TypeMismatch { expected, actual } => {
                write!(f, "Type mismatch: expected {expected}, got {actual}")
            }
            ValueExtractionError::ConversionError(msg) => {
                write!(f, "Conversion error: {msg}")
            }
        }
    }
}

impl std::error::Error for ValueExtractionError {}

/// Trait for safe value extraction with error handling
///
/// ```rust
/// use lifebuoy::{TryGetable, ValueExtractionError};
/// use sea_query::Value;
///
/// let result: Result<i32, ValueExtractionError> = TryGetable::try_get(Value::Int(Some(42)));
/// assert_eq!(result, Ok(42));
///
/// let result: Result<i32, ValueExtractionError> = TryGetable::try_get(Value::Int(None));
/// assert!(matches!(result, Err(ValueExtractionError::NullValue)));
/// ```
pub trait TryGetable: Sized {
    /// Extract a non-null value of this type.
    fn try_get(value: Value) -> Result<Self, ValueExtractionError>;

    /// Extract a value, mapping a null cell to `Ok(None)`.
    fn try_get_opt(value: Value) -> Result<Option<Self>, ValueExtractionError> {
        match Self::try_get(value) {
            Ok(v) => Ok(Some(v)),
            Err(ValueExtractionError::NullValue) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

fn mismatch(expected: &str, value: &Value) -> ValueExtractionError {
    ValueExtractionError::TypeMismatch {
        expected: expected.to_string(),
        actual: format!("{value:?}"),
    }
}

macro_rules! impl_try_getable {
    ($type:ty, $variant:ident, $expected:expr) => {
        impl TryGetable for $type {
            fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
                match value {
                    Value::$variant(Some(v)) => Ok(v),
                    Value::$variant(None) => Err(ValueExtractionError::NullValue),
                    _ => Err(mismatch($expected, &value)),
                }
            }
        }
    };
}

impl_try_getable!(i16, SmallInt, "SmallInt");
impl_try_getable!(f32, Float, "Float");
impl_try_getable!(bool, Bool, "Bool");
impl_try_getable!(String, String, "String");
impl_try_getable!(Vec<u8>, Bytes, "Bytes");

// Postgres hands back the narrowest integer the column declares; widen on the way out.
impl TryGetable for i32 {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Int(Some(v)) => Ok(v),
            Value::SmallInt(Some(v)) => Ok(i32::from(v)),
            Value::Int(None) | Value::SmallInt(None) => Err(ValueExtractionError::NullValue),
            _ => Err(mismatch("Int", &value)),
        }
    }
}

impl TryGetable for i64 {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::BigInt(Some(v)) => Ok(v),
            Value::Int(Some(v)) => Ok(i64::from(v)),
            Value::SmallInt(Some(v)) => Ok(i64::from(v)),
            Value::BigUnsigned(Some(v)) => i64::try_from(v).map_err(|_| {
                ValueExtractionError::ConversionError(format!("{v} exceeds i64::MAX"))
            }),
            Value::BigInt(None)
            | Value::Int(None)
            | Value::SmallInt(None)
            | Value::BigUnsigned(None) => Err(ValueExtractionError::NullValue),
            _ => Err(mismatch("BigInt", &value)),
        }
    }
}

impl TryGetable for f64 {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Double(Some(v)) => Ok(v),
            Value::Float(Some(v)) => Ok(f64::from(v)),
            Value::Double(None) | Value::Float(None) => Err(ValueExtractionError::NullValue),
            _ => Err(mismatch("Double", &value)),
        }
    }
}

impl TryGetable for serde_json::Value {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        match value {
            Value::Json(Some(v)) => Ok(*v),
            Value::Json(None) => Err(ValueExtractionError::NullValue),
            _ => Err(mismatch("Json", &value)),
        }
    }
}

impl<T: TryGetable> TryGetable for Option<T> {
    fn try_get(value: Value) -> Result<Self, ValueExtractionError> {
        T::try_get_opt(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_get_success() {
        let result: Result<i32, _> = TryGetable::try_get(Value::Int(Some(42)));
        assert_eq!(result, Ok(42));
    }

    #[test]
    fn test_try_get_null() {
        let result: Result<i32, _> = TryGetable::try_get(Value::Int(None));
        assert!(matches!(result, Err(ValueExtractionError::NullValue)));
    }

    #[test]
    fn test_try_get_type_mismatch() {
        let value = Value::String(Some("hello".to_string()));
        let result: Result<i32, _> = TryGetable::try_get(value);
        assert!(matches!(result, Err(ValueExtractionError::TypeMismatch { .. })));
    }

    #[test]
    fn test_integer_widening() {
        assert_eq!(i64::try_get(Value::Int(Some(7))), Ok(7));
        assert_eq!(i64::try_get(Value::SmallInt(Some(-3))), Ok(-3));
        assert_eq!(i32::try_get(Value::SmallInt(Some(12))), Ok(12));
        assert_eq!(f64::try_get(Value::Float(Some(1.5))), Ok(1.5));
    }

    #[test]
    fn test_big_unsigned_overflow() {
        let result = i64::try_get(Value::BigUnsigned(Some(u64::MAX)));
        assert!(matches!(result, Err(ValueExtractionError::ConversionError(_))));
    }

    #[test]
    fn test_option_maps_null_to_none() {
        let result: Result<Option<String>, _> = TryGetable::try_get(Value::String(None));
        assert_eq!(result, Ok(None));

        let result: Result<Option<String>, _> =
            TryGetable::try_get(Value::String(Some("x".to_string())));
        assert_eq!(result, Ok(Some("x".to_string())));

        let result: Result<Option<String>, _> = TryGetable::try_get(Value::Int(Some(1)));
        assert!(matches!(result, Err(ValueExtractionError::TypeMismatch { .. })));
    }

    #[test]
    fn test_json_extraction() {
        let value = Value::from(serde_json::json!({"tier": "gold"}));
        let json = serde_json::Value::try_get(value).unwrap();
        assert_eq!(json["tier"], "gold");
    }
}
