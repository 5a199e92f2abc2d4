pub mod boundary;
pub mod build_runner;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod forge;
pub mod git;
pub mod notify;
pub mod ui;
pub mod version_store;

pub use error::{FlowError, Result};
