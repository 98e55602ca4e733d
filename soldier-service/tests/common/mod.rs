#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use service_core::error::AppError;
use soldier_service::config::SoldierConfig;
use soldier_service::models::Soldier;
use soldier_service::services::{InMemorySoldierStore, SoldierStore};
use soldier_service::{build_router, AppState};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

/// One interaction with the store, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    FindAll,
    FindById(String),
    FindByName(String),
    Save(Soldier),
    Delete(Soldier),
    HealthCheck,
}

/// Store that forwards to an in-memory store and records every call.
#[derive(Default)]
pub struct RecordingStore {
    inner: InMemorySoldierStore,
    calls: Mutex<Vec<StoreCall>>,
}

impl RecordingStore {
    /// Insert soldiers directly, bypassing the call log.
    pub async fn seed(&self, soldiers: &[(&str, &str)]) -> Vec<Soldier> {
        let mut seeded = Vec::new();
        for (name, weapon) in soldiers {
            let soldier = Soldier::new(name.to_string(), weapon.to_string());
            seeded.push(self.inner.save(soldier).await.expect("Failed to seed soldier"));
        }
        seeded
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn saves(&self) -> Vec<Soldier> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Save(soldier) => Some(soldier),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<Soldier> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                StoreCall::Delete(soldier) => Some(soldier),
                _ => None,
            })
            .collect()
    }

    pub async fn stored(&self) -> Vec<Soldier> {
        self.inner.find_all().await.unwrap()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SoldierStore for RecordingStore {
    async fn find_all(&self) -> Result<Vec<Soldier>, AppError> {
        self.record(StoreCall::FindAll);
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Soldier>, AppError> {
        self.record(StoreCall::FindById(id.to_string()));
        self.inner.find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Soldier>, AppError> {
        self.record(StoreCall::FindByName(name.to_string()));
        self.inner.find_by_name(name).await
    }

    async fn save(&self, soldier: Soldier) -> Result<Soldier, AppError> {
        self.record(StoreCall::Save(soldier.clone()));
        self.inner.save(soldier).await
    }

    async fn delete(&self, soldier: &Soldier) -> Result<(), AppError> {
        self.record(StoreCall::Delete(soldier.clone()));
        self.inner.delete(soldier).await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.record(StoreCall::HealthCheck);
        self.inner.health_check().await
    }
}

/// Store whose every call fails, for exercising the 5xx paths.
pub struct FailingStore;

#[async_trait]
impl SoldierStore for FailingStore {
    async fn find_all(&self) -> Result<Vec<Soldier>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn find_by_id(&self, _id: &str) -> Result<Option<Soldier>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<Soldier>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn save(&self, _soldier: Soldier) -> Result<Soldier, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn delete(&self, _soldier: &Soldier) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<RecordingStore>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(RecordingStore::default());
        let router = router_with_store(store.clone());
        Self { router, store }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn post_empty(&self, uri: &str) -> TestResponse {
        self.send(Method::POST, uri, None).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    async fn send(&self, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
        send(self.router.clone(), method, uri, body).await
    }
}

pub fn router_with_store(store: Arc<dyn SoldierStore>) -> Router {
    build_router(AppState::new(SoldierConfig::in_memory(), store))
}

pub async fn send(router: Router, method: Method, uri: &str, body: Option<&str>) -> TestResponse {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse { status, body }
}
