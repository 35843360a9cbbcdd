//! Local stand-in for the spreadsheet RSVP script.
//!
//! Answers `action=list` and `action=add` on `/`, over GET query strings and
//! POST JSON bodies, like the deployed script's two revisions. Rows live in
//! an in-memory sheet whose header row is written on the first append and
//! never touched again. Script failures come back as `200 {"error": ...}`.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};

/// Column order of the sheet.
pub const COLUMNS: [&str; 6] = ["name", "email", "attending", "guests", "message", "timestamp"];

/// Header casing written on first append. Older sheet revisions used
/// title-case headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderStyle {
    #[default]
    Lower,
    Title,
}

impl HeaderStyle {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "lower" => Some(HeaderStyle::Lower),
            "title" => Some(HeaderStyle::Title),
            _ => None,
        }
    }

    fn header(self) -> Vec<String> {
        COLUMNS
            .iter()
            .map(|column| match self {
                HeaderStyle::Lower => column.to_string(),
                HeaderStyle::Title => title_case(column),
            })
            .collect()
    }
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A sheet: an optional header row plus data rows, all cells as strings.
#[derive(Debug, Default)]
pub struct Sheet {
    header_style: HeaderStyle,
    header: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

impl Sheet {
    pub fn new(header_style: HeaderStyle) -> Self {
        Self {
            header_style,
            ..Self::default()
        }
    }

    /// Append one row in column order. No validation, no dedupe.
    pub fn append(&mut self, entry: &Map<String, Value>) {
        if self.header.is_none() {
            self.header = Some(self.header_style.header());
        }
        let row = COLUMNS
            .iter()
            .map(|column| entry.get(*column).map(cell_text).unwrap_or_default())
            .collect();
        self.rows.push(row);
    }

    /// Data rows as objects keyed by the header row.
    pub fn records(&self) -> Vec<Map<String, Value>> {
        let Some(header) = &self.header else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .map(|(key, cell)| (key.clone(), Value::from(cell.as_str())))
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub type Db = Arc<RwLock<Sheet>>;

#[derive(Deserialize)]
pub struct AddRequest {
    pub action: String,
    #[serde(default)]
    pub entry: Map<String, Value>,
}

pub fn app() -> Router {
    app_with(HeaderStyle::default())
}

pub fn app_with(header_style: HeaderStyle) -> Router {
    let db: Db = Arc::new(RwLock::new(Sheet::new(header_style)));
    router(db)
}

/// Router over an existing sheet, for callers that want to inspect it.
pub fn router(db: Db) -> Router {
    Router::new().route("/", get(handle_get).post(handle_post)).with_state(db)
}

pub async fn run(listener: TcpListener, header_style: HeaderStyle) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(header_style)).await
}

async fn handle_get(State(db): State<Db>, Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    match params.get("action").map(String::as_str) {
        Some("list") => Json(list(&db).await),
        Some("add") => {
            let entry = COLUMNS
                .iter()
                .map(|column| {
                    let value = params.get(*column).cloned().unwrap_or_default();
                    (column.to_string(), Value::from(value))
                })
                .collect();
            Json(add(&db, entry).await)
        }
        other => Json(script_error(&format!("Unknown action: {}", other.unwrap_or("")))),
    }
}

async fn handle_post(State(db): State<Db>, body: String) -> Json<Value> {
    let request: AddRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => return Json(script_error(&format!("Invalid request body: {e}"))),
    };
    match request.action.as_str() {
        "add" => Json(add(&db, request.entry).await),
        "list" => Json(list(&db).await),
        other => Json(script_error(&format!("Unknown action: {other}"))),
    }
}

async fn list(db: &Db) -> Value {
    let sheet = db.read().await;
    Value::Array(sheet.records().into_iter().map(Value::Object).collect())
}

async fn add(db: &Db, entry: Map<String, Value>) -> Value {
    let mut sheet = db.write().await;
    sheet.append(&entry);
    info!(rows = sheet.len(), "row appended");
    json!({ "ok": true })
}

fn script_error(message: &str) -> Value {
    warn!(%message, "script error");
    json!({ "error": message })
}
