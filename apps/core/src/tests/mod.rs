//! Test Module
//!
//! Cross-module test suite for the LeadReply core.
//!
//! ## Test Categories
//! - `brain_tests`: classification, sentiment banding, reply selection
//! - `database_tests`: contact upsert and interaction log on SQLite
//! - `pipeline_tests`: intake pipeline and broadcast dispatcher against mock collaborators
//! - `supervisor_tests`: supervisor request handling and validation
//! - `integration_tests`: webhook-to-database workflows on a real store


pub mod brain_tests;
