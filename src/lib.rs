//! Library crate for ghuser-search.
//!
//! This crate exposes the building blocks of the TUI:
//! - Application state, configuration and the event loop (`app`)
//! - Error and result types (`error`)
//! - GitHub API capability and its HTTP implementation (`github`)
//! - Search controller and its state reducer (`search`)
//! - UI rendering and widgets (`ui`)
//!
//! It is used by the `ghuser-search` binary and by tests.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod app;
pub mod error;
pub mod github;
pub mod search;
pub mod ui;

/// Convenient error and result types shared across the crate.
pub use error::{DynError, Result};
