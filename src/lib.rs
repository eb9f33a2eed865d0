//! # batchsort
//!
//! Sorts batches of integer sequences over HTTP, with interchangeable
//! execution strategies so their cost can be compared.
//!
//! ## Usage
//!
//! ```bash
//! batchsort serve --listen 0.0.0.0:8000
//! curl -X POST localhost:8000/process-concurrent -d '{"to_sort": [[5,3,1],[2,2,1]]}'
//! # {"sorted_arrays":[[1,3,5],[1,2,2]],"time_ns":48213}
//! ```
//!
//! ## Modules
//!
//! - `sort` - Batch data model and the single-sequence sort primitive
//! - `executor` - Sequential, concurrent (fan-out) and pooled executors plus timing
//! - `server` - axum routes, request decoding and response encoding
//! - `config` - Layered server configuration (defaults, TOML file, environment)
//! - `error` - Crate-wide error type
pub mod config;
pub mod error;
pub mod executor;
pub mod server;
pub mod sort;

pub use error::{Error, Result};
