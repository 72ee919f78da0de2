//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine calls into use-case level APIs.
//! - Keep embedding layers decoupled from storage details.

pub mod catalog_service;
