use std::{collections::HashSet, str::FromStr, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub use axum::http::StatusCode as Status;

/// Response envelope the listing route answers with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Envelope {
    /// `[...]`, no paging metadata.
    Bare,
    /// `{items, total, page, page_size}`
    #[default]
    Items,
    /// `{data, total}`
    Data,
    /// `{results, count, page, pageSize}`
    Results,
}

impl FromStr for Envelope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bare" => Ok(Envelope::Bare),
            "items" => Ok(Envelope::Items),
            "data" => Ok(Envelope::Data),
            "results" => Ok(Envelope::Results),
            other => Err(format!("unknown envelope: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MockConfig {
    /// Path the listing is mounted on. Every other path is a 404.
    pub path: String,
    pub envelope: Envelope,
    /// Paths that answer with the given status instead of 404.
    pub failing: Vec<(String, StatusCode)>,
    /// Requests whose `q` equals the first element are delayed.
    pub slow_query: Option<(String, Duration)>,
    pub contacts: Vec<Value>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            path: "/api/contacts".to_string(),
            envelope: Envelope::Items,
            failing: Vec::new(),
            slow_query: None,
            contacts: seed(),
        }
    }
}

/// Every request path and query the server has seen, in arrival order.
pub type Hits = Arc<RwLock<Vec<String>>>;

#[derive(Clone)]
struct AppState {
    contacts: Arc<Vec<Value>>,
    envelope: Envelope,
    slow_query: Option<(String, Duration)>,
    hits: Hits,
}

impl AppState {
    async fn record(&self, uri: &Uri) {
        self.hits.write().await.push(uri.to_string());
    }
}

pub fn app() -> Router {
    app_with(MockConfig::default()).0
}

pub fn app_with(config: MockConfig) -> (Router, Hits) {
    let hits: Hits = Arc::default();
    let state = AppState {
        contacts: Arc::new(config.contacts),
        envelope: config.envelope,
        slow_query: config.slow_query,
        hits: hits.clone(),
    };

    // A failing entry shadows the listing on the same path; repeated entries
    // keep the first status.
    let mut mounted = HashSet::new();
    let mut router = Router::new();
    for (path, status) in config.failing {
        if !mounted.insert(path.clone()) {
            tracing::warn!(%path, "duplicate failing path ignored");
            continue;
        }
        let body = format!("mock failure at {path}");
        router = router.route(
            &path,
            get(move |State(state): State<AppState>, uri: Uri| {
                let body = body.clone();
                async move {
                    state.record(&uri).await;
                    (status, body)
                }
            }),
        );
    }
    if !mounted.contains(&config.path) {
        router = router.route(&config.path, get(list_contacts));
    }

    (router.fallback(not_found).with_state(state), hits)
}

pub async fn serve(listener: TcpListener, router: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, router).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    #[serde(rename = "pageSize")]
    pub page_size_camel: Option<usize>,
}

const NAME_KEYS: &[&str] = &["name", "full_name", "fullName"];
const EMAIL_KEYS: &[&str] = &["email"];
const PHONE_KEYS: &[&str] = &["phone", "phone_number", "phoneNumber"];
const ADDRESS_KEYS: &[&str] = &["address", "location"];

fn text<'a>(contact: &'a Value, keys: &[&str]) -> &'a str {
    keys.iter()
        .find_map(|k| contact.get(*k).and_then(Value::as_str))
        .unwrap_or("")
}

fn sort_keys(field: &str) -> Option<&'static [&'static str]> {
    match field {
        "name" => Some(NAME_KEYS),
        "email" => Some(EMAIL_KEYS),
        "phone" => Some(PHONE_KEYS),
        "address" => Some(ADDRESS_KEYS),
        _ => None,
    }
}

/// Filter, sort and slice `contacts` the way the listing route does.
pub fn select(contacts: &[Value], params: &ListParams) -> (Vec<Value>, usize) {
    let needle = params.q.as_deref().unwrap_or("").trim().to_lowercase();
    let mut matched: Vec<&Value> = contacts
        .iter()
        .filter(|c| {
            needle.is_empty()
                || [NAME_KEYS, EMAIL_KEYS, PHONE_KEYS, ADDRESS_KEYS]
                    .iter()
                    .any(|keys| text(c, keys).to_lowercase().contains(&needle))
        })
        .collect();

    if let Some(keys) = params.sort.as_deref().and_then(sort_keys) {
        matched.sort_by_key(|c| text(c, keys).to_lowercase());
        if params.order.as_deref() == Some("desc") {
            matched.reverse();
        }
    }

    let total = matched.len();
    let size = params.page_size.or(params.page_size_camel).unwrap_or(20).max(1);
    let page = params.page.unwrap_or(1).max(1);
    let items = matched
        .into_iter()
        .skip((page - 1) * size)
        .take(size)
        .cloned()
        .collect();
    (items, total)
}

async fn list_contacts(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<ListParams>,
) -> Json<Value> {
    state.record(&uri).await;
    if let Some((q, delay)) = &state.slow_query {
        if params.q.as_deref() == Some(q.as_str()) {
            tokio::time::sleep(*delay).await;
        }
    }

    let (items, total) = select(&state.contacts, &params);
    let page = params.page.unwrap_or(1).max(1);
    let size = params.page_size.or(params.page_size_camel).unwrap_or(20).max(1);
    Json(match state.envelope {
        Envelope::Bare => Value::Array(items),
        Envelope::Items => json!({
            "items": items, "total": total, "page": page, "page_size": size
        }),
        Envelope::Data => json!({"data": items, "total": total}),
        Envelope::Results => json!({
            "results": items, "count": total, "page": page, "pageSize": size
        }),
    })
}

async fn not_found(State(state): State<AppState>, uri: Uri) -> StatusCode {
    state.record(&uri).await;
    StatusCode::NOT_FOUND
}

const PEOPLE: [(&str, &str); 25] = [
    ("Ann", "Lee"),
    ("Bob", "Stone"),
    ("Carla", "Diaz"),
    ("Dan", "Brown"),
    ("Eve", "Adams"),
    ("Frank", "Moore"),
    ("Grace", "Kim"),
    ("Hank", "Hill"),
    ("Ivy", "Chen"),
    ("Jack", "Black"),
    ("Kara", "Novak"),
    ("Liam", "Ortiz"),
    ("Mona", "Patel"),
    ("Ned", "Quinn"),
    ("Olga", "Reyes"),
    ("Paul", "Smith"),
    ("Quinn", "Taylor"),
    ("Rita", "Underwood"),
    ("Sam", "Vega"),
    ("Tina", "White"),
    ("Uma", "Xu"),
    ("Vic", "York"),
    ("Wendy", "Zane"),
    ("Xavier", "Abbott"),
    ("Yara", "Bishop"),
];

const CITIES: [&str; 5] = ["Oslo", "Lima", "Rome", "Kyiv", "Riga"];

/// 25 contacts spread over the four record shapes the client accepts.
pub fn seed() -> Vec<Value> {
    PEOPLE
        .iter()
        .enumerate()
        .map(|(i, (first, last))| {
            let name = format!("{first} {last}");
            let email = format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase());
            let phone = format!("555-01{i:02}");
            let city = CITIES[i % CITIES.len()];
            match i % 4 {
                0 => json!({
                    "id": format!("c-{i:03}"),
                    "name": name, "email": email, "phone": phone, "address": city
                }),
                1 => json!({
                    "contact_id": i,
                    "full_name": name, "email": email, "phone_number": phone, "location": city
                }),
                2 => json!({
                    "uuid": Uuid::new_v4(),
                    "fullName": name, "email": email, "phoneNumber": phone, "address": city
                }),
                _ => json!({"_id": format!("obj{i}"), "full_name": name, "email": email}),
            }
        })
        .collect()
}
