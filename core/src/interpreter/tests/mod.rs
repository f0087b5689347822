//! Tests for the flow interpreter
//!
//! Organized by feature area

mod helpers;

mod action_view_tests;
