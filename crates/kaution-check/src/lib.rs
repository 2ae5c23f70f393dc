//! Security-deposit (Mietkaution) assessment for German residential tenancies.
//!
//! The [`deposit`] module holds the rule evaluation; the remaining modules carry
//! the configuration, error and telemetry plumbing shared by the service binary.

pub mod config;
pub mod deposit;
pub mod error;
pub mod telemetry;
