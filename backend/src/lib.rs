//! # Haiti Dashboard Backend
//!
//! Filtering and aggregation engine behind the Haiti operational-presence
//! dashboard.
//!
//! A dataset of operational-presence records (sector, department, organization
//! type, observation date, plus passthrough columns) is loaded once, filtered
//! per request by a [`models::FilterSelection`], and grouped into count series
//! that feed bar, pie and line charts.
//!
//! ## Architecture
//!
//! - [`models`]: records, dimensions and filter selections
//! - [`transformations`]: cleaning and the filter engine
//! - [`services`]: aggregation, summary metrics, dashboard composition
//! - [`io`]: data sources, the dataset cache, CSV export
//! - [`config`]: TOML + environment configuration
//! - [`http`]: axum REST API (feature `http-server`)
//!
//! ## Example
//!
//! ```
//! use haiti_dash::models::{Dimension, FilterSelection, Record};
//! use haiti_dash::services::group_and_count;
//! use haiti_dash::transformations::apply;
//!
//! let records = vec![
//!     Record::new().with_sector("WASH").with_department_code("A"),
//!     Record::new().with_sector("WASH").with_department_code("B"),
//!     Record::new().with_sector("Health").with_department_code("A"),
//! ];
//!
//! let wash = apply(&records, &FilterSelection::new().with_sector("WASH"));
//! let by_department = group_and_count(&wash, &Dimension::DepartmentCode);
//! assert_eq!(by_department.len(), 2);
//! ```

pub mod config;
pub mod io;
pub mod models;
pub mod services;
pub mod transformations;

#[cfg(feature = "http-server")]
pub mod http;
