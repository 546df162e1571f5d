//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep display/integration layers decoupled from storage details.

pub mod profile_service;
pub mod task_service;
