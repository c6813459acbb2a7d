//! # parlance-core
//!
//! Locale resolution, translation tables, configuration, and error handling
//! for the Parlance front-end.

pub mod config;
pub mod error;
pub mod locale;
pub mod translation;
