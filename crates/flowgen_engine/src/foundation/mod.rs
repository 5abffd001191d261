//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and Euler conversions
//! - Seedable randomness
//! - Logging utilities

pub mod math;
pub mod random;
pub mod logging;
