//! Freight Quote Engine
//!
//! This crate estimates freight costs from an air-freight rate sheet. A raw
//! weight is rounded to the half-kilogram billing unit, padded with a tiered
//! safety buffer, and priced from the origin country's zone column: a flat
//! price per breakpoint up to 70 kg, a per-kilogram multiplier above that.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod rates;
