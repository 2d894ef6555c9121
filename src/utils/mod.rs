//! Utility functions for code generation, URL validation and error mapping.
//!
//! - [`code_generator`] - Short code generation and validation
//! - [`url_validator`] - Original URL validation
//! - [`db_error`] - SQLx error translation

pub mod code_generator;
pub mod db_error;
pub mod url_validator;
