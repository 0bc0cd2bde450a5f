//! In-process stand-in for the diary application's GraphQL endpoint

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{extract::State, routing::post, Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use diary::{GraphQlClient, Operation};

pub const CHAIN_ID: &str = "e476187f6ddfeb9d588c7b45d3df334d5501d6499b3f9ad5595cae86cce16a65";
pub const APPLICATION_ID: &str = "diary-app";

#[derive(Default)]
pub struct DiaryState {
    pub phrase: Option<String>,
    pub entries: Vec<Value>,
    pub next_id: u64,
    pub clock: u64,
    pub requests: Vec<Operation>,
}

pub type SharedState = Arc<Mutex<DiaryState>>;

/// A running fake service
pub struct FakeService {
    pub base_url: String,
    pub state: SharedState,
}

impl FakeService {
    pub fn client(&self) -> GraphQlClient {
        GraphQlClient::new(format!(
            "{}/chains/{}/applications/{}",
            self.base_url, CHAIN_ID, APPLICATION_ID
        ))
    }

    pub fn requests(&self) -> Vec<Operation> {
        self.state.lock().unwrap().requests.clone()
    }
}

pub async fn spawn_service() -> FakeService {
    let state = SharedState::default();
    let app = Router::new()
        .route(
            "/chains/:chain_id/applications/:application_id",
            post(handle),
        )
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeService {
        base_url: format!("http://{}", addr),
        state,
    }
}

/// An address nothing listens on
pub async fn dead_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!(
        "http://{}/chains/{}/applications/{}",
        addr, CHAIN_ID, APPLICATION_ID
    )
}

async fn handle(State(state): State<SharedState>, Json(body): Json<Value>) -> Json<Value> {
    let query = body["query"].as_str().unwrap_or_default();
    let vars = &body["variables"];
    let Some(op) = Operation::from_document(query) else {
        return Json(error("Unknown operation"));
    };

    let mut state = state.lock().unwrap();
    state.requests.push(op);

    let phrase_ok = |s: &DiaryState| {
        s.phrase.is_some() && s.phrase.as_deref() == vars["secretPhrase"].as_str()
    };
    let payload = match op {
        Operation::IsInitialized => json!(state.phrase.is_some()),
        Operation::Initialize => {
            if state.phrase.is_some() {
                return Json(error("Diary already initialized"));
            }
            state.phrase = vars["secretPhrase"].as_str().map(str::to_string);
            json!({"success": true, "message": "Diary initialized successfully"})
        }
        Operation::Unlock => {
            if phrase_ok(&*state) {
                json!({"success": true, "message": "Diary unlocked"})
            } else {
                json!({"success": false, "message": "Invalid secret phrase"})
            }
        }
        Operation::AddEntry => {
            if !phrase_ok(&*state) {
                return Json(error("Invalid secret phrase"));
            }
            let id = state.next_id;
            state.next_id += 1;
            state.clock += 1_000_000;
            let entry = json!({
                "id": id,
                "title": vars["title"],
                "content": vars["content"],
                "timestamp": state.clock,
            });
            state.entries.push(entry);
            json!({"success": true, "message": "Entry added", "entryId": id})
        }
        Operation::UpdateEntry => {
            if !phrase_ok(&*state) {
                return Json(error("Invalid secret phrase"));
            }
            let id = vars["id"].clone();
            let Some(entry) = state.entries.iter_mut().find(|e| e["id"] == id) else {
                return Json(error("Entry not found"));
            };
            entry["title"] = vars["title"].clone();
            entry["content"] = vars["content"].clone();
            json!({"success": true, "message": "Entry updated"})
        }
        Operation::DeleteEntry => {
            if !phrase_ok(&*state) {
                return Json(error("Invalid secret phrase"));
            }
            let before = state.entries.len();
            state.entries.retain(|e| e["id"] != vars["id"]);
            if state.entries.len() == before {
                return Json(error("Entry not found"));
            }
            json!({"success": true, "message": "Entry deleted"})
        }
        Operation::Entries => json!(state.entries),
        Operation::SearchByTitle => filter(&state.entries, "title", vars["query"].as_str()),
        Operation::SearchByContent => filter(&state.entries, "content", vars["query"].as_str()),
        Operation::Entry => state
            .entries
            .iter()
            .find(|e| e["id"] == vars["id"])
            .cloned()
            .unwrap_or(Value::Null),
        Operation::EntryCount => json!(state.entries.len()),
        Operation::Owner => json!("User:owner"),
        Operation::LatestEntries => {
            let limit = vars["limit"].as_u64().unwrap_or(0) as usize;
            json!(state.entries.iter().rev().take(limit).collect::<Vec<_>>())
        }
        Operation::EntriesInRange => {
            let start = vars["startTimestamp"].as_u64().unwrap_or(0);
            let end = vars["endTimestamp"].as_u64().unwrap_or(u64::MAX);
            json!(state
                .entries
                .iter()
                .filter(|e| {
                    let ts = e["timestamp"].as_u64().unwrap_or(0);
                    ts >= start && ts <= end
                })
                .collect::<Vec<_>>())
        }
    };

    Json(json!({ "data": { op.field(): payload } }))
}

fn filter(entries: &[Value], field: &str, query: Option<&str>) -> Value {
    let needle = query.unwrap_or_default().to_lowercase();
    json!(entries
        .iter()
        .filter(|e| {
            e[field]
                .as_str()
                .map(|v| v.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .collect::<Vec<_>>())
}

fn error(message: &str) -> Value {
    json!({"data": null, "errors": [{"message": message}]})
}
