//! Integration tests for the parameter system
//!
//! These tests verify that the parameter system behaves correctly in various scenarios.


// Tests for restraint terms
mod restraint_tests;
