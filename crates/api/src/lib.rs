//! Mock REST API: canned and fabricated hospital decision-support data.

pub mod app;
pub mod config;
pub mod middleware;
