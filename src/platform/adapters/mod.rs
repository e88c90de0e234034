//! Adapter implementations for hosted platform ports.

pub mod http;
pub mod memory;
