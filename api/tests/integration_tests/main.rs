//! Integration tests for the Coretemp API.
//!
//! These tests drive the full router: pushes arrive over HTTP, gauges are
//! scraped back from `/metrics`, and the staleness sweeper retires hosts that
//! stopped reporting.

mod common;
mod hardware_tests;
mod health_tests;
mod sweep_tests;
