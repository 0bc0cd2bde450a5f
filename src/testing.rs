//! Test doubles for the gateway and renderer seams

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::gateway::{ApiError, ApiGateway, ApiResult, Operation};
use crate::render::{Renderer, StatusLevel};
use crate::session::View;
use crate::types::{Entry, EntryCollection, EntryId};

/// Gateway answering from a queue of canned responses, recording every call
#[derive(Default)]
pub struct ScriptedGateway {
    responses: Mutex<VecDeque<ApiResult<Value>>>,
    calls: Mutex<Vec<(Operation, Map<String, Value>)>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, data: Value) {
        self.responses.lock().unwrap().push_back(Ok(data));
    }

    pub fn fail(&self, error: ApiError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn calls(&self) -> Vec<(Operation, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn operations(&self) -> Vec<Operation> {
        self.calls().into_iter().map(|(op, _)| op).collect()
    }
}

#[async_trait]
impl ApiGateway for ScriptedGateway {
    async fn execute(&self, operation: &str, variables: Map<String, Value>) -> ApiResult<Value> {
        let op = Operation::from_document(operation).expect("unknown document");
        self.calls.lock().unwrap().push((op, variables));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response".to_string())))
    }
}

/// Renderer keeping everything it was asked to show
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<(View, Option<Vec<Entry>>)>,
    pub statuses: Vec<(String, StatusLevel)>,
    pub loading: Vec<bool>,
}

impl RecordingRenderer {
    pub fn last_view(&self) -> Option<View> {
        self.frames.last().map(|(view, _)| *view)
    }

    pub fn last_status(&self) -> Option<&(String, StatusLevel)> {
        self.statuses.last()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: View, entries: Option<&EntryCollection>) {
        let shown = entries.map(|c| c.sorted_for_display().into_iter().cloned().collect());
        self.frames.push((view, shown));
    }

    fn show_status(&mut self, message: &str, level: StatusLevel) {
        self.statuses.push((message.to_string(), level));
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading.push(loading);
    }
}

pub fn entry(id: u64, title: &str, content: &str, timestamp: u64) -> Entry {
    Entry {
        id: EntryId(id),
        title: title.to_string(),
        content: content.to_string(),
        timestamp,
    }
}
