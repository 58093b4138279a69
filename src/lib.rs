pub mod config;
pub mod data;
pub mod features;
pub mod handlers;
pub mod logging;
pub mod schema;
pub mod utils;

pub use data::DbPool;
