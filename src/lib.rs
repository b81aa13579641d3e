//! regform - registration form core
//!
//! A validation schema for six registration fields and a form controller
//! that gates, validates, persists and reports each submission.

pub mod cli;
pub mod config;
pub mod form;
pub mod observability;
pub mod schema;
