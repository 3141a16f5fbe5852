//! # log-shipper
//!
//! A background agent that ships completed log files from a local directory to
//! an object store and removes the local copy once the upload succeeds.
//!
//! ## Overview
//!
//! Producers write `*.log` files into a watch directory and append the token
//! `<#BlobFileReadyForUpload#>` once a file is closed. On a fixed interval the
//! agent scans the directory, uploads every ready file under its base name and
//! deletes it locally. Files that are not ready, or whose upload failed, are
//! left for the next cycle.
//!
//! ## Features
//!
//! - **Single-flight schedule**: the next cycle is armed only after the previous one finished
//! - **Upload-then-delete**: a local file is removed only after the store accepted it
//! - **Operator diagnostics**: every failure is recorded with an event code
//! - **S3-compatible storage**: via rusoto, with custom endpoints
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use log_shipper::cloud::s3::S3Connector;
//! use log_shipper::diagnostics::LogRecorder;
//! use log_shipper::uploader::UploadEngine;
//!
//! # async fn example() {
//! let engine = UploadEngine::new("log-shipper.yaml", Arc::new(S3Connector), Arc::new(LogRecorder::new()))
//!     .with_watch_directory("/var/log/portal");
//! engine.start();
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Agent configuration loading
//! - [`uploader`]: Upload cycle and its schedule
//! - [`cloud`]: Object store integration
//! - [`diagnostics`]: Operator-visible event recording
//! - [`errors`]: Error taxonomy
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Agent configuration loading
pub mod config;

/// Upload cycle and schedule
pub mod uploader;

/// Object store integration (S3)
pub mod cloud;

/// Operator-visible event recording
pub mod diagnostics;

/// Error taxonomy for startup and cycle failures
pub mod errors;

/// Application constants and configuration keys
pub mod constants;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;
