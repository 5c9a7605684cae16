// Models module

pub mod cake;

// Re-export commonly used types
pub use cake::{CakeResponse, CakesResponse, CreateCakeRequest, UpdateCakeRequest};
