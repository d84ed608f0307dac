//! HTTP server module for the dashboard backend.
//!
//! This module provides an axum-based HTTP server that plays the role of the
//! dashboard's UI shell. It reuses the filter engine, the service layer and
//! the loaded dataset from the core library.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Query parsing into a FilterSelection                   │
//! │  - JSON serialization, CSV download                       │
//! │  - CORS, compression, request tracing                     │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Filter engine + services                                 │
//! │  - apply / group_and_count / time_series                  │
//! │  - summary, dashboard, panels                             │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Dataset (io::loaders, io::cache)                         │
//! │  - loaded once, shared read-only as Arc<Dataset>          │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
