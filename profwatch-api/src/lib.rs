mod error;
mod inner;
pub mod model;

pub use error::ApiError;
pub use inner::{API, DEFAULT_BASE_URL};

pub use reqwest;
pub use serde_json;
