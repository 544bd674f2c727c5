mod app;
mod config;
mod moya;
mod validation;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use moya::{EncodingError, MoyaError, MoyaResult, UnderlyingError};
pub use validation::ValidationError;
