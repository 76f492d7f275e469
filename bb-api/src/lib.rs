//! Blackboard Learn REST API session and client-side result filters.

extern crate bb_common;

pub mod auth;
pub mod bwfilter;
pub mod config;
pub mod error;
pub mod extended;
pub mod filters;
pub mod prelude;
pub mod session;
