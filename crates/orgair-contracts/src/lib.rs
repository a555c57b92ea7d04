//! Data contracts for the PE Org-AI-R assessment platform.
//!
//! Entities in [`contracts`] can only be constructed in a validated state.
//! [`tooling`] exports their JSON Schemas and generates synthetic fixtures.

pub mod config;
pub mod contracts;
pub mod error;
pub mod telemetry;
pub mod tooling;
