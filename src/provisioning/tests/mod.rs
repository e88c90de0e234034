//! Unit tests for the provisioning module.

mod bootstrap_tests;
mod sink_tests;
