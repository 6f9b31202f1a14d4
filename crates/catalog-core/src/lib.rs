//! Catalog Core Types and Definitions
//!
//! This crate provides the foundational types for the Catalog documentation
//! generator. It includes:
//!
//! - **Model**: The navigable graph of applications, endpoints and statements ([`model`] module)
//! - **Types**: Type definitions and cross-application references ([`types`] module)
//! - **Names**: Fully-qualified application names ([`name::AppName`])
//! - **Attributes**: String-valued metadata attached to graph nodes ([`attribute`] module)
//! - **Diagram**: Diagram dialects and artifact emission modes ([`diagram`] module)

pub mod attribute;
pub mod diagram;
pub mod model;
pub mod name;
pub mod types;
