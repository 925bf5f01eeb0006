//! Integration test support for Tillpoint.
//!
//! [`MockApi`] runs a small axum server on `127.0.0.1:0` that speaks the
//! subset of the REST API the client tests need: token login/refresh,
//! profile, products and order creation. Every protected route checks the
//! bearer token against the one the server currently considers valid, and
//! counters record how often each route was hit.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tillpoint-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tillpoint_client::session::{MemoryTokenStore, PersistedSession};
use tillpoint_client::{ApiClient, ClientConfig, Session};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Refresh token the mock accepts.
pub const REFRESH_TOKEN: &str = "refresh-1";
/// Access token the mock accepts before any refresh.
pub const INITIAL_ACCESS: &str = "access-0";

/// How the mock answers `auth/token/refresh/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Issue a new access token and start accepting it.
    Issue,
    /// Answer 401.
    Fail,
    /// Issue a token but keep rejecting it.
    IssueRejected,
}

/// Shared state behind the mock routes.
#[derive(Debug)]
pub struct MockState {
    valid_token: Mutex<String>,
    refresh_mode: Mutex<RefreshMode>,
    refresh_delay: Mutex<Duration>,
    reject_orders: AtomicBool,
    garble_order_total: AtomicBool,
    issued: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub product_calls: AtomicUsize,
    pub order_calls: AtomicUsize,
    pub last_order: Mutex<Option<Value>>,
    products: Vec<Value>,
}

impl MockState {
    fn valid_token(&self) -> String {
        self.valid_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        let expected = format!("Bearer {}", self.valid_token());
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected)
    }
}

/// A running mock API.
pub struct MockApi {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
    handle: JoinHandle<()>,
}

impl Drop for MockApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl MockApi {
    /// Start a mock serving the given product records.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn start(products: Vec<Value>) -> Self {
        let state = Arc::new(MockState {
            valid_token: Mutex::new(INITIAL_ACCESS.to_string()),
            refresh_mode: Mutex::new(RefreshMode::Issue),
            refresh_delay: Mutex::new(Duration::ZERO),
            reject_orders: AtomicBool::new(false),
            garble_order_total: AtomicBool::new(false),
            issued: AtomicUsize::new(0),
            refresh_calls: AtomicUsize::new(0),
            product_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
            last_order: Mutex::new(None),
            products,
        });

        let app = Router::new()
            .route("/api/auth/login/", post(login))
            .route("/api/auth/logout/", post(logout))
            .route("/api/auth/token/refresh/", post(refresh))
            .route("/api/auth/profile/", get(profile))
            .route("/api/products/", get(list_products))
            .route("/api/products/{id}/", get(get_product))
            .route("/api/orders/", post(create_order))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock listener");
        let addr = listener.local_addr().expect("mock listener address");
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn set_refresh_mode(&self, mode: RefreshMode) {
        *self
            .state
            .refresh_mode
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = mode;
    }

    pub fn set_refresh_delay(&self, delay: Duration) {
        *self
            .state
            .refresh_delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Stop accepting the current access token, as if it expired.
    pub fn expire_access_token(&self) {
        *self
            .state
            .valid_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = "expired-elsewhere".to_string();
    }

    pub fn reject_orders(&self, reject: bool) {
        self.state.reject_orders.store(reject, Ordering::SeqCst);
    }

    /// Store orders but answer with a `total` the client cannot parse.
    pub fn garble_order_total(&self, garble: bool) {
        self.state.garble_order_total.store(garble, Ordering::SeqCst);
    }

    #[must_use]
    pub fn refresh_calls(&self) -> usize {
        self.state.refresh_calls.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn order_calls(&self) -> usize {
        self.state.order_calls.load(Ordering::SeqCst)
    }

    /// A client whose session starts with the given credentials, plus the
    /// store mirroring it.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self, access: Option<&str>, refresh: Option<&str>) -> (ApiClient, MemoryTokenStore) {
        let store = MemoryTokenStore::with_session(PersistedSession {
            access_token: access.map(str::to_string),
            refresh_token: refresh.map(str::to_string),
            user: None,
        });
        let session = Session::restore(Arc::new(store.clone())).expect("restore session");
        let config = ClientConfig::with_api_url(&self.base_url()).expect("mock URL is valid");
        let client = ApiClient::new(&config, session).expect("build client");
        (client, store)
    }
}

/// Password accepted by the mock login.
#[must_use]
pub fn password() -> SecretString {
    SecretString::from("correct horse")
}

/// A product record in the server's wire shape.
#[must_use]
pub fn product_record(id: uuid::Uuid, name: &str, price: &str, stock: u32) -> Value {
    json!({
        "id": id.to_string(),
        "name": name,
        "description": "",
        "sku": format!("SKU-{}", name.to_uppercase().replace(' ', "-")),
        "price": price,
        "sale_price": "0.00",
        "stock": stock,
        "min_stock": 2,
        "category": {"id": uuid::Uuid::nil().to_string(), "name": "General"},
        "status": "active",
        "stock_status": if stock == 0 { "Out of Stock" } else if stock <= 2 { "Low Stock" } else { "In Stock" },
        "created_at": "2024-03-01T09:30:00Z",
        "updated_at": "2024-03-02T10:00:00Z",
    })
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"detail": "Given token not valid for any token type"})),
    )
        .into_response()
}

#[derive(Deserialize)]
struct LoginBody {
    password: String,
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<LoginBody>) -> Response {
    if body.password != "correct horse" {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }
    Json(json!({"access": state.valid_token(), "refresh": REFRESH_TOKEN})).into_response()
}

async fn logout() -> StatusCode {
    StatusCode::OK
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh: String,
}

async fn refresh(State(state): State<Arc<MockState>>, Json(body): Json<RefreshBody>) -> Response {
    state.refresh_calls.fetch_add(1, Ordering::SeqCst);
    let delay = *state
        .refresh_delay
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let mode = *state
        .refresh_mode
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if mode == RefreshMode::Fail || body.refresh != REFRESH_TOKEN {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Token is invalid or expired", "code": "token_not_valid"})),
        )
            .into_response();
    }

    let n = state.issued.fetch_add(1, Ordering::SeqCst) + 1;
    let access = format!("access-{n}");
    if mode == RefreshMode::Issue {
        *state
            .valid_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = access.clone();
    }
    Json(json!({"access": access})).into_response()
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "id": 3,
        "username": "cashier1",
        "email": "cashier1@example.com",
        "first_name": "Ama",
        "last_name": "Mensah",
        "is_staff": true,
        "is_active": true,
    }))
    .into_response()
}

async fn list_products(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    state.product_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    Json(json!({
        "results": state.products,
        "count": state.products.len(),
        "num_pages": 1,
        "current_page": 1,
        "has_next": false,
        "has_previous": false,
    }))
    .into_response()
}

async fn get_product(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state
        .products
        .iter()
        .find(|p| p["id"] == id.as_str())
        .map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
            |p| Json(p.clone()).into_response(),
        )
}

async fn create_order(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    let n = state.order_calls.fetch_add(1, Ordering::SeqCst) + 1;
    *state
        .last_order
        .lock()
        .unwrap_or_else(PoisonError::into_inner) = Some(body.clone());

    if state.reject_orders.load(Ordering::SeqCst) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"non_field_errors": ["Insufficient stock for Shea butter"]})),
        )
            .into_response();
    }

    let items: Vec<Value> = body["items"]
        .as_array()
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            json!({
                "id": i + 1,
                "product": item["product_id"],
                "product_name": format!("Product {}", i + 1),
                "quantity": item["quantity"],
                "price": item["price"],
            })
        })
        .collect();

    let total = if state.garble_order_total.load(Ordering::SeqCst) {
        json!("n/a")
    } else {
        json!("0.00")
    };

    (
        StatusCode::CREATED,
        Json(json!({
            "id": 500 + n,
            "order_number": format!("ORD-{:05}", 500 + n),
            "customer_name": body["customer_name"],
            "items": items,
            "tax_amount": body["tax_amount"],
            "discount_amount": body["discount_amount"],
            "total": total,
            "status": body["status"],
            "payment_method": body["payment_method"],
            "payment_status": body["payment_status"],
            "served_by": body["served_by"],
            "created_at": "2024-03-05T12:00:00Z",
        })),
    )
        .into_response()
}
