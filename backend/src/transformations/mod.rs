//! Record cleaning and filtering.
//!
//! - [`cleaning`]: missing-value recognition and lenient date coercion
//! - [`filtering`]: the filter engine that narrows a record set to a selection
//!
//! # Example
//!
//! ```
//! use haiti_dash::models::{FilterSelection, Record};
//! use haiti_dash::transformations::apply;
//!
//! let records = vec![
//!     Record::new().with_sector("WASH"),
//!     Record::new().with_sector("Health"),
//! ];
//! let wash = apply(&records, &FilterSelection::new().with_sector("WASH"));
//! assert_eq!(wash.len(), 1);
//! ```

pub mod cleaning;
pub mod filtering;

pub use cleaning::{is_missing, normalize_missing, parse_observed_at};
pub use filtering::{
    apply, filter_by_date_range, filter_by_dimension, matches, validate_records,
};
