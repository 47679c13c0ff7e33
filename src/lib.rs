pub mod config;
pub mod db;
pub mod http_error;
pub mod kernel;
pub mod logging;
pub mod plugins;
pub mod store;

pub use crate::kernel::*;
pub use crate::db::*;
