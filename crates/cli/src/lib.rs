//! dms-search CLI
//!
//! Command-line front end over the search coordinator and the HTTP backend

pub mod commands;
pub mod context;
pub mod interactive;
pub mod render;

pub use context::{AppContext, GlobalArgs};
