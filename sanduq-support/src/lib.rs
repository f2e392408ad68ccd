//! # Sanduq Support
//!
//! Shared utilities for the sanduq crates.
//!
//! This crate provides:
//! - Text rendering for error messages
//! - Identifier naming helpers

pub mod naming;
pub mod rendering;
