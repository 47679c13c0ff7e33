pub mod handlers;
pub mod models;
pub mod plugin;
pub mod service;

pub use models::*;
pub use plugin::BlogPlugin;
pub use service::BlogResourceHandler;
