//! The Vicohome CLI client library.
//!
//! This crate provides the core functionality for the vico-cli client,
//! including token caching, authentication with transparent re-login,
//! the Vicohome API client, data models, output sinks and command execution.
//!
//! # Modules
//!
//! - `token_cache`: On-disk token cache with expiry
//! - `auth`: Credential login and the cache-first authenticator
//! - `validator`: Classification of API response envelopes
//! - `retry`: Request execution with a single re-authentication
//! - `vicohome`: High-level Vicohome API client
//! - `model`: Device and event records
//! - `format`: Table, JSON and CSV rendering
//! - `output`: Stdout and InfluxDB event sinks
//! - `commands`, `actions`, `cli`: CLI parsing, actions and dispatch

pub mod actions;
pub mod auth;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod configuration;
pub mod envelope;
pub mod error;
pub mod error_utils;
pub mod exit_codes;
pub mod format;
pub mod http_utils;
pub mod model;
pub mod output;
pub mod param_utils;
pub mod retry;
pub mod search;
pub mod time_utils;
pub mod token_cache;
pub mod validator;
pub mod vicohome;
