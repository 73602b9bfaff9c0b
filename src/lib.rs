pub mod args;
pub mod commands;
mod config;
mod db;
mod error;
pub mod model;
pub mod screen;
pub mod store;
pub mod totals;
mod utils;
pub mod validate;


pub use config::Config;
pub use error::{Error, ErrorType, Result};
