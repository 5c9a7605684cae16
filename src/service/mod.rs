//! The `CakeService` collaborator consumed by the cake handlers
//!
//! Handlers only see `Arc<dyn CakeService>`; which store backs it is decided
//! at startup from configuration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::ApiResult,
    models::{CakeResponse, CakesResponse, CreateCakeRequest, UpdateCakeRequest},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCakeService;
pub use postgres::PostgresCakeService;

/// Business operations on cakes
///
/// Lookups and updates of an unknown id return `ApiError::NotFound`.
/// Deleting an unknown id is not an error.
#[async_trait]
pub trait CakeService: Send + Sync {
    async fn get_cakes(&self) -> ApiResult<CakesResponse>;

    async fn get_cake_by_id(&self, id: i64) -> ApiResult<CakeResponse>;

    async fn create_cake(&self, request: CreateCakeRequest) -> ApiResult<CakeResponse>;

    async fn update_cake(&self, id: i64, request: UpdateCakeRequest) -> ApiResult<CakeResponse>;

    async fn delete_cake(&self, id: i64) -> ApiResult<()>;

    /// Reports whether the backing store can serve requests
    async fn health_check(&self) -> ApiResult<()> {
        Ok(())
    }
}

/// Shared handle stored in the router state
pub type SharedCakeService = Arc<dyn CakeService>;
