//! Integration test harness for RocketShoes.
//!
//! [`FakeApi`] serves the catalog, content and gallery endpoints from memory
//! on an ephemeral local port, so the real `reqwest` clients can be driven
//! end to end without network access.
//!
//! ```rust,ignore
//! let api = FakeApi::start().await;
//! api.set_product(1, "Tênis de Caminhada", 179.9, 3);
//! let catalog = CatalogClient::new(&api.catalog_config())?;
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_storefront::config::{CatalogConfig, ContentConfig, GalleryConfig};
use serde_json::{Value, json};
use url::Url;

/// Images returned per gallery page.
pub const IMAGE_PAGE_SIZE: usize = 2;

const MASTER_REF: &str = "master-ref";
const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct FakeState {
    base: String,
    products: Mutex<HashMap<i32, Value>>,
    stock: Mutex<HashMap<i32, u32>>,
    posts: Mutex<Vec<Value>>,
    images: Mutex<Vec<Value>>,
    product_hits: AtomicUsize,
    stock_hits: AtomicUsize,
    search_hits: AtomicUsize,
    fail_uploads: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An in-memory catalog, content and gallery API.
pub struct FakeApi {
    addr: SocketAddr,
    state: Arc<FakeState>,
}

impl FakeApi {
    /// Bind to `127.0.0.1:0` and serve in the background.
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let state = Arc::new(FakeState {
            base: format!("http://{addr}"),
            ..FakeState::default()
        });

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .route("/api/v2", get(content_root))
            .route("/api/v2/", get(content_root))
            .route("/api/v2/documents/search", get(search))
            .route("/api/images", get(images).post(create_image))
            .with_state(Arc::clone(&state));

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    fn url(&self, path: &str) -> Url {
        Url::parse(&format!("http://{}/{path}", self.addr)).unwrap()
    }

    #[must_use]
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.url(""),
            timeout: TIMEOUT,
        }
    }

    #[must_use]
    pub fn content_config(&self) -> ContentConfig {
        ContentConfig {
            endpoint: self.url("api/v2/"),
            access_token: None,
            timeout: TIMEOUT,
        }
    }

    #[must_use]
    pub fn gallery_config(&self) -> GalleryConfig {
        GalleryConfig {
            base_url: self.url(""),
            timeout: TIMEOUT,
        }
    }

    /// Register a product with its available stock.
    pub fn set_product(&self, id: i32, title: &str, price: f64, stock: u32) {
        lock(&self.state.products).insert(
            id,
            json!({
                "id": id,
                "title": title,
                "price": price,
                "image": format!("https://rocketseat-cdn.s3-sa-east-1.amazonaws.com/shoe-{id}.jpg"),
            }),
        );
        self.set_stock(id, stock);
    }

    pub fn set_stock(&self, id: i32, stock: u32) {
        lock(&self.state.stock).insert(id, stock);
    }

    /// Add a post document. `date` uses the API's colon-less offset format.
    pub fn add_post(&self, uid: &str, title: &str, date: &str, paragraphs: &[&str]) {
        let body: Vec<Value> = paragraphs
            .iter()
            .map(|text| json!({"type": "paragraph", "text": text, "spans": []}))
            .collect();
        lock(&self.state.posts).push(json!({
            "uid": uid,
            "first_publication_date": date,
            "data": {
                "title": title,
                "subtitle": format!("Sobre {title}"),
                "author": "Joseph Oliveira",
                "banner": {"url": format!("https://images.prismic.io/{uid}.png")},
                "content": [{"heading": "Introdução", "body": body}],
            },
        }));
    }

    /// Add an image card directly, bypassing validation.
    pub fn add_image(&self, title: &str) {
        let mut images = lock(&self.state.images);
        let id = images.len() + 1;
        images.push(card(id, title, "Seeded image", &format!("https://i.ibb.co/{id}.png")));
    }

    /// Make `POST /api/images` answer 500.
    pub fn fail_uploads(&self, fail: bool) {
        self.state.fail_uploads.store(fail, Ordering::SeqCst);
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        lock(&self.state.images).len()
    }

    #[must_use]
    pub fn product_hits(&self) -> usize {
        self.state.product_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn stock_hits(&self) -> usize {
        self.state.stock_hits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn search_hits(&self) -> usize {
        self.state.search_hits.load(Ordering::SeqCst)
    }
}

fn card(id: usize, title: &str, description: &str, url: &str) -> Value {
    json!({
        "title": title,
        "description": description,
        "url": url,
        "ts": 1_620_222_828_340_000_i64 + i64::try_from(id).unwrap(),
        "id": id.to_string(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

async fn stock(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    state.stock_hits.fetch_add(1, Ordering::SeqCst);
    let amount = lock(&state.stock).get(&id).copied().ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(json!({"id": id, "amount": amount})))
}

async fn product(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i32>,
) -> Result<Json<Value>, StatusCode> {
    state.product_hits.fetch_add(1, Ordering::SeqCst);
    lock(&state.products)
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn content_root() -> Json<Value> {
    Json(json!({
        "refs": [
            {"id": "preview", "ref": "preview-ref", "isMasterRef": false},
            {"id": "master", "ref": MASTER_REF, "isMasterRef": true},
        ],
    }))
}

async fn search(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, StatusCode> {
    state.search_hits.fetch_add(1, Ordering::SeqCst);
    if params.get("ref").map(String::as_str) != Some(MASTER_REF) {
        return Err(StatusCode::BAD_REQUEST);
    }
    let q = params.get("q").cloned().unwrap_or_default();
    let posts = lock(&state.posts).clone();

    if let Some(rest) = q.strip_prefix(r#"[[at(my.post.uid,""#) {
        let uid = rest.trim_end_matches(r#"")]]"#);
        let results: Vec<Value> = posts.into_iter().filter(|p| p["uid"] == uid).collect();
        return Ok(Json(json!({"results": results, "next_page": null})));
    }

    let page_size: usize = params
        .get("pageSize")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    let page: usize = params.get("page").and_then(|s| s.parse().ok()).unwrap_or(1);
    let start = (page - 1) * page_size;

    let results: Vec<Value> = posts
        .iter()
        .skip(start)
        .take(page_size)
        .map(|p| {
            json!({
                "uid": p["uid"],
                "first_publication_date": p["first_publication_date"],
                "data": {
                    "title": p["data"]["title"],
                    "subtitle": p["data"]["subtitle"],
                    "author": p["data"]["author"],
                },
            })
        })
        .collect();

    let next_page = if start + page_size < posts.len() {
        let mut next = Url::parse(&format!("{}/api/v2/documents/search", state.base)).unwrap();
        next.query_pairs_mut()
            .append_pair("ref", MASTER_REF)
            .append_pair("q", &q)
            .append_pair("pageSize", &page_size.to_string())
            .append_pair("page", &(page + 1).to_string());
        Value::String(next.to_string())
    } else {
        Value::Null
    };

    Ok(Json(json!({"results": results, "next_page": next_page})))
}

async fn images(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let images = lock(&state.images);
    let start = params
        .get("after")
        .and_then(|after| images.iter().position(|c| c["id"] == after.as_str()))
        .map_or(0, |i| i + 1);

    let data: Vec<Value> = images.iter().skip(start).take(IMAGE_PAGE_SIZE).cloned().collect();
    let after = if start + IMAGE_PAGE_SIZE < images.len() {
        data.last().map_or(Value::Null, |c| c["id"].clone())
    } else {
        Value::Null
    };

    Json(json!({"data": data, "after": after}))
}

async fn create_image(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> StatusCode {
    if state.fail_uploads.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    let (Some(title), Some(description), Some(url)) = (
        body["title"].as_str(),
        body["description"].as_str(),
        body["url"].as_str(),
    ) else {
        return StatusCode::BAD_REQUEST;
    };

    let mut images = lock(&state.images);
    let id = images.len() + 1;
    images.push(card(id, title, description, url));
    StatusCode::CREATED
}
