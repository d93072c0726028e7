//! Directory use-case services.
//!
//! # Responsibility
//! - Orchestrate validation, integrity checks and repository calls per
//!   entity group.
//! - Keep callers decoupled from storage details and credential material.
//!
//! # Invariants
//! - Services are constructed explicitly with their repositories and clock;
//!   there is no global service state.

pub mod account_service;
pub mod application_service;
pub mod developer_service;
pub mod end_user_service;
pub mod error;
pub mod integrity;
