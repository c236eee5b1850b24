//! Integration tests for the fetch-parse-cache pipeline
//!
//! These tests use wiremock to stand up real HTTP servers and drive the
//! crawler through reqwest end-to-end.

mod crawl_tests;
