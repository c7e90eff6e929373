//! Integration tests for the Barakah services.
//!
//! These tests run the services against a real `SQLite` database in a
//! temporary directory, with the Anthropic API served by wiremock.

mod error_recovery;
mod growth_plan_workflow;
mod habit_workflow;
mod reflection_workflow;
