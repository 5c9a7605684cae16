// Library root for the Cake REST API

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod router;
pub mod service;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use models::{CakeResponse, CakesResponse, CreateCakeRequest, UpdateCakeRequest};
pub use service::{CakeService, InMemoryCakeService, PostgresCakeService, SharedCakeService};
