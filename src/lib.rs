//! Shipping cost and pallet stacking calculations.
//!
//! The engine (`units` through `shipment`) is synchronous and free of I/O.
//! `catalog`, `report`, `config` and `api` wrap it into an HTTP service.

pub mod aggregate;
pub mod api;
pub mod catalog;
pub mod config;
pub mod cost;
pub mod diagnostics;
pub mod geometry;
pub mod model;
pub mod report;
pub mod shipment;
pub mod stacking;
pub mod types;
pub mod units;
