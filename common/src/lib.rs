pub mod config;
pub mod error;
pub mod filter;
pub mod logging;
pub mod service_register_center;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
