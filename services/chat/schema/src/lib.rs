//! Read-only sea-orm entities for the tables the chat service joins against.
//!
//! Ownership of these tables (and every write) lives in the CRUD service;
//! this crate only describes the columns the authorization and email lookups
//! need.

pub mod assignments;
pub mod customers;
pub mod employees;
pub mod requests;
pub mod users;
