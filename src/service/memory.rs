use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    models::{CakeResponse, CakesResponse, CreateCakeRequest, UpdateCakeRequest},
    service::CakeService,
};

/// Process-local cake store, used when no database is configured.
/// Ids start at 1 and are never reused, even after a delete.
#[derive(Debug)]
pub struct InMemoryCakeService {
    state: RwLock<Store>,
}

#[derive(Debug)]
struct Store {
    next_id: i64,
    cakes: BTreeMap<i64, CakeResponse>,
}

impl InMemoryCakeService {
    pub fn new() -> Self {
        InMemoryCakeService {
            state: RwLock::new(Store {
                next_id: 1,
                cakes: BTreeMap::new(),
            }),
        }
    }

    /// Build a store pre-populated with the given cakes, ids assigned in order
    pub async fn with_cakes(cakes: impl IntoIterator<Item = CreateCakeRequest>) -> Self {
        let service = Self::new();
        {
            let mut store = service.state.write().await;
            for request in cakes {
                store.insert(request.title, request.description);
            }
        }
        service
    }
}

impl Default for InMemoryCakeService {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    fn insert(&mut self, title: String, description: String) -> CakeResponse {
        let id = self.next_id;
        self.next_id += 1;

        let cake = CakeResponse::new(id, title, description);
        self.cakes.insert(id, cake.clone());
        cake
    }
}

#[async_trait]
impl CakeService for InMemoryCakeService {
    async fn get_cakes(&self) -> ApiResult<CakesResponse> {
        let store = self.state.read().await;
        Ok(CakesResponse::new(store.cakes.values().cloned().collect()))
    }

    async fn get_cake_by_id(&self, id: i64) -> ApiResult<CakeResponse> {
        let store = self.state.read().await;
        store
            .cakes
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::cake_not_found(id))
    }

    async fn create_cake(&self, request: CreateCakeRequest) -> ApiResult<CakeResponse> {
        let request = request.normalized();
        let mut store = self.state.write().await;
        let cake = store.insert(request.title, request.description);

        info!("Created cake with id: {}", cake.id);
        Ok(cake)
    }

    async fn update_cake(&self, id: i64, request: UpdateCakeRequest) -> ApiResult<CakeResponse> {
        let request = request.normalized();
        let mut store = self.state.write().await;
        let cake = store
            .cakes
            .get_mut(&id)
            .ok_or_else(|| ApiError::cake_not_found(id))?;

        cake.title = request.title;
        cake.description = request.description;

        info!("Updated cake with id: {}", id);
        Ok(cake.clone())
    }

    async fn delete_cake(&self, id: i64) -> ApiResult<()> {
        let mut store = self.state.write().await;
        if store.cakes.remove(&id).is_some() {
            info!("Deleted cake with id: {}", id);
        } else {
            info!("Cake with id {} already absent, nothing to delete", id);
        }
        Ok(())
    }
}
