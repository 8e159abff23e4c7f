//! Procedural macros for the Caplin language compiler.
//!
//! This crate provides derive macros for error handling in the Caplin compiler,
//! specifically the `CaplinError` derive macro that automatically implements
//! the `CaplinErrorTrait` for error types with rich diagnostic information.

use proc_macro::TokenStream;
use crate::error::caplin_error;
mod error;

/// Derive macro for implementing `CaplinErrorTrait` on error structs
/// 
/// This macro automatically generates implementations that provide rich error
/// diagnostics with source code locations, labels, help text, and error chaining.
/// 
/// # Attributes
/// - `source_code` - Marks fields containing source code information
/// - `label` - Marks fields that provide error labels for specific locations
/// - `help` - Marks fields containing help text for the error
/// - `diagnostic` - Marks fields with diagnostic messages
/// - `errors` - Marks fields containing nested errors
/// - `reference` - Marks fields containing error references
#[proc_macro_derive(CaplinError, attributes(source_code, label, help, diagnostic, errors, reference))]
pub fn derive_caplin_error(input: TokenStream) -> TokenStream {
    caplin_error(input)
}
