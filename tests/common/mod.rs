use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;
use userdata_service::error::AppError;
use userdata_service::services::{DocumentStore, IdentityVerifier, VerifiedIdentity};
use userdata_service::startup::{build_router, AppState, Clients};

pub const VALID_TOKEN: &str = "valid-test-token";
pub const TEST_UID: &str = "user_123";

/// Identity verifier double: accepts exactly `VALID_TOKEN` and counts how
/// often it was consulted.
pub struct StaticVerifier {
    calls: AtomicUsize,
}

impl StaticVerifier {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityVerifier for StaticVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if token == VALID_TOKEN {
            Ok(VerifiedIdentity {
                uid: TEST_UID.to_string(),
            })
        } else {
            Err(AppError::Forbidden(anyhow::anyhow!("unknown token")))
        }
    }
}

/// Document store double backed by a map, with switchable failure modes.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Mutex<HashMap<String, Value>>,
    fail_reads: bool,
    fail_writes: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_reads() -> Self {
        Self {
            fail_reads: true,
            ..Self::default()
        }
    }

    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn stored_uids(&self) -> Vec<String> {
        self.documents.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn fetch(&self, uid: &str) -> Result<Option<Value>, AppError> {
        if self.fail_reads {
            return Err(AppError::StoreRead(anyhow::anyhow!("simulated read failure")));
        }
        Ok(self.documents.lock().unwrap().get(uid).cloned())
    }

    async fn replace(&self, uid: &str, document: Value) -> Result<(), AppError> {
        if self.fail_writes {
            return Err(AppError::StoreWrite(anyhow::anyhow!(
                "simulated write failure"
            )));
        }
        self.documents
            .lock()
            .unwrap()
            .insert(uid.to_string(), document);
        Ok(())
    }
}

pub struct TestApp {
    pub router: Router,
    pub verifier: Arc<StaticVerifier>,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn spawn() -> Self {
        Self::with_store(Arc::new(InMemoryStore::new()))
    }

    pub fn with_store(store: Arc<InMemoryStore>) -> Self {
        let verifier = Arc::new(StaticVerifier::new());
        let state = AppState {
            clients: Some(Clients {
                identity: verifier.clone(),
                documents: store.clone(),
            }),
        };
        TestApp {
            router: build_router(state),
            verifier,
            store,
        }
    }
}

/// Router for a process whose credential failed to parse at startup.
pub fn unconfigured_router() -> Router {
    build_router(AppState { clients: None })
}

pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
