//! Demand forecasting, sales lifecycle, shortfall and fulfillment analytics.
//!
//! The desktop front-end lives in the `demand-dash` binary; this library
//! holds everything that does not draw pixels.

pub mod config;
pub mod data;
