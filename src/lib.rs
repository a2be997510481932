#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Terminal form that collects a RADIUS user group row and inserts it into
//! PostgreSQL.

pub mod config;
pub mod logging;
pub mod model;
pub mod storage;
pub mod tui;
