//! SAFE Dashboard - Live sensor dashboard for a single monitoring location
//!
//! This library exposes the core modules for testing and reuse.

pub mod bootstrap;
pub mod common;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod routes;
pub mod sync;
pub mod upstream;
