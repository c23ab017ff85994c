//! # TaskFlow Shared Library
//!
//! This crate contains the domain types, credential handling, storage contract
//! and business rules used by the TaskFlow API server.
//!
//! ## Module Organization
//!
//! - `models`: Entities and their closed enumerations (roles, statuses, priorities)
//! - `auth`: Password hashing, JWT tokens and the request authorization gate
//! - `store`: Persistence contract with Postgres and in-memory backends
//! - `services`: User directory, membership, project and task lifecycles
//! - `db`: Connection pool and migrations
//! - `error`: Domain error kinds

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

