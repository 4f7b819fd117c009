//! Library exports for the digitpad sketchpad.
//!
//! The binary drives these modules; integration tests and the schema dump tool
//! use them directly.

pub mod archive;
pub mod backend;
pub mod config;
pub mod draw;
pub mod input;
pub mod notification;
pub mod predict;
pub mod presenter;
pub mod ui;
pub mod util;

pub use config::Config;
