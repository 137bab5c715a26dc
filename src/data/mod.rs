//! Data layer: row types, CSV loading, filtering and per-view aggregation.
//!
//! Architecture:
//! ```text
//!  forecast / lifecycle / shortfall / fulfillment .csv
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  loader   │  CSV record → typed row (bad numbers become 0)
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │  filter   │  dropdown selections → matching rows
//!   └───────────┘
//!        │
//!        ▼
//!   ┌───────────────────────────────────────────────┐
//!   │ aggregate │ lifecycle │ shortfall │ fulfillment │  buckets, metrics, rankings
//!   └───────────────────────────────────────────────┘
//! ```

pub mod aggregate;
pub mod filter;
pub mod fulfillment;
pub mod lifecycle;
pub mod loader;
pub mod model;
pub mod shortfall;
