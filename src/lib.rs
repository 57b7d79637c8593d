//! Asset Registry client library
//!
//! Typed access to the asset registry REST API (employees, categories,
//! assets and their custody transactions), the workflows built on top of it,
//! and the asset utilization calculator.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod client;
pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod services;
pub mod utilization;

pub use client::{RegistryClient, ResourceClient};
pub use errors::{ApiError, ServiceError};
pub use services::RegistryServices;
pub use utilization::Utilization;
