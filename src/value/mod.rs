//! Value handling for lifebuoy
//!
//! Bound parameters and result cells are both `sea_query::Value`. This module holds
//! the row-to-map representation ([`Record`]) and safe typed extraction ([`TryGetable`]).

pub mod record;
pub mod try_getable;

pub use record::Record;
pub use try_getable::{TryGetable, ValueExtractionError};
