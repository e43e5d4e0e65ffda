use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub done: bool,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub done: bool,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub done: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListFilter {
    pub done: Option<bool>,
}

/// What `/echo` saw of the request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub body: String,
}

/// In-memory item table shared by the `/items` handlers.
#[derive(Clone, Default)]
pub struct ItemStore {
    items: Arc<RwLock<HashMap<Uuid, Item>>>,
}

impl ItemStore {
    async fn matching(&self, done: Option<bool>) -> Vec<Item> {
        let items = self.items.read().await;
        let mut found: Vec<Item> = items
            .values()
            .filter(|item| done.is_none() || done == Some(item.done))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    async fn insert(&self, input: CreateItem) -> Item {
        let item = Item {
            id: Uuid::new_v4(),
            name: input.name,
            done: input.done,
        };
        self.items.write().await.insert(item.id, item.clone());
        item
    }

    async fn find(&self, id: Uuid) -> Result<Item, NoSuchItem> {
        self.items.read().await.get(&id).cloned().ok_or(NoSuchItem)
    }

    async fn patch(&self, id: Uuid, input: UpdateItem) -> Result<Item, NoSuchItem> {
        let mut items = self.items.write().await;
        let item = items.get_mut(&id).ok_or(NoSuchItem)?;
        item.name = input.name.unwrap_or_else(|| item.name.clone());
        item.done = input.done.unwrap_or(item.done);
        Ok(item.clone())
    }

    async fn take(&self, id: Uuid) -> Result<Item, NoSuchItem> {
        self.items.write().await.remove(&id).ok_or(NoSuchItem)
    }
}

/// 404 with a plain-text body.
#[derive(Debug)]
pub struct NoSuchItem;

impl IntoResponse for NoSuchItem {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, "no such item").into_response()
    }
}

/// Files served by `/files/{name}`.
pub const FILES: &[(&str, &str, &[u8])] = &[
    ("hello.txt", "text/plain", b"hello, world\n"),
    ("pixel.gif", "image/gif", b"GIF89a\x01\x00\x01\x00\x00\x00\x00;"),
];

pub fn app() -> Router {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route(
            "/items/{id}",
            get(show_item).patch(update_item).delete(delete_item),
        )
        .route("/echo", any(echo))
        .route("/status/{code}", any(status))
        .route("/upload", post(upload))
        .route("/upload/discard", post(discard))
        .route("/files/{name}", get(file))
        .route("/redirect/{name}", get(redirect))
        .with_state(ItemStore::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_items(
    State(store): State<ItemStore>,
    Query(filter): Query<ListFilter>,
) -> Json<Vec<Item>> {
    Json(store.matching(filter.done).await)
}

async fn create_item(
    State(store): State<ItemStore>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    (StatusCode::CREATED, Json(store.insert(input).await))
}

async fn show_item(
    State(store): State<ItemStore>,
    Path(id): Path<Uuid>,
) -> Result<Json<Item>, NoSuchItem> {
    store.find(id).await.map(Json)
}

async fn update_item(
    State(store): State<ItemStore>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, NoSuchItem> {
    store.patch(id, input).await.map(Json)
}

async fn delete_item(
    State(store): State<ItemStore>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, NoSuchItem> {
    store.take(id).await.map(|_| StatusCode::NO_CONTENT)
}

async fn echo(
    method: Method,
    Query(query): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(Echo {
        method: method.to_string(),
        query,
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Respond with the requested status and a short text body. 204 and 304
/// never carry a body.
async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return (StatusCode::BAD_REQUEST, "invalid status code").into_response();
    };
    if status == StatusCode::NO_CONTENT || status == StatusCode::NOT_MODIFIED {
        return status.into_response();
    }
    (status, format!("status {code}")).into_response()
}

/// Store nothing, answer with the uploaded bytes and their content type.
async fn upload(headers: HeaderMap, body: Bytes) -> Response {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| header::HeaderValue::from_static("application/octet-stream"));
    (StatusCode::CREATED, [(header::CONTENT_TYPE, content_type)], body).into_response()
}

async fn discard(_body: Bytes) -> StatusCode {
    StatusCode::OK
}

/// See-other redirect to `/files/{name}`.
async fn redirect(Path(name): Path<String>) -> Redirect {
    Redirect::to(&format!("/files/{name}"))
}

async fn file(Path(name): Path<String>) -> Response {
    match FILES.iter().find(|(file, _, _)| *file == name) {
        Some((_, mime, bytes)) => ([(header::CONTENT_TYPE, *mime)], *bytes).into_response(),
        None => (StatusCode::NOT_FOUND, format!("no such file: {name}")).into_response(),
    }
}
