//! Diary Operation Catalog
//!
//! GraphQL documents for every operation the diary service exposes, and a
//! typed wrapper that decodes each payload.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{ApiError, ApiGateway, ApiResult};
use crate::types::{lenient_u64, Entry, EntryId};

const ENTRY_FIELDS: &str = "id title content timestamp";

/// Every operation in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    IsInitialized,
    Initialize,
    Unlock,
    Entries,
    AddEntry,
    UpdateEntry,
    DeleteEntry,
    SearchByTitle,
    Entry,
    EntryCount,
    Owner,
    LatestEntries,
    EntriesInRange,
    SearchByContent,
}

impl Operation {
    pub const ALL: [Operation; 14] = [
        Operation::IsInitialized,
        Operation::Initialize,
        Operation::Unlock,
        Operation::Entries,
        Operation::AddEntry,
        Operation::UpdateEntry,
        Operation::DeleteEntry,
        Operation::SearchByTitle,
        Operation::Entry,
        Operation::EntryCount,
        Operation::Owner,
        Operation::LatestEntries,
        Operation::EntriesInRange,
        Operation::SearchByContent,
    ];

    /// Root field of the `data` object carrying the payload
    pub fn field(&self) -> &'static str {
        match self {
            Operation::IsInitialized => "isInitialized",
            Operation::Initialize => "initialize",
            Operation::Unlock => "unlock",
            Operation::Entries => "entries",
            Operation::AddEntry => "addEntry",
            Operation::UpdateEntry => "updateEntry",
            Operation::DeleteEntry => "deleteEntry",
            Operation::SearchByTitle => "searchByTitle",
            Operation::Entry => "entry",
            Operation::EntryCount => "entryCount",
            Operation::Owner => "owner",
            Operation::LatestEntries => "latestEntries",
            Operation::EntriesInRange => "entriesInRange",
            Operation::SearchByContent => "searchByContent",
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Operation::Initialize
                | Operation::Unlock
                | Operation::AddEntry
                | Operation::UpdateEntry
                | Operation::DeleteEntry
        )
    }

    /// The GraphQL document sent as `query`
    pub fn document(&self) -> String {
        match self {
            Operation::IsInitialized => "query { isInitialized }".to_string(),
            Operation::EntryCount => "query { entryCount }".to_string(),
            Operation::Owner => "query { owner }".to_string(),
            Operation::Entries => format!("query {{ entries {{ {} }} }}", ENTRY_FIELDS),
            Operation::Initialize => "mutation($secretPhrase: String!) { \
                 initialize(secretPhrase: $secretPhrase) { success message } }"
                .to_string(),
            Operation::Unlock => "mutation($secretPhrase: String!) { \
                 unlock(secretPhrase: $secretPhrase) { success message } }"
                .to_string(),
            Operation::AddEntry => "mutation($title: String!, $content: String!, $secretPhrase: String!) { \
                 addEntry(title: $title, content: $content, secretPhrase: $secretPhrase) \
                 { success message entryId } }"
                .to_string(),
            Operation::UpdateEntry => "mutation($id: Int!, $title: String!, $content: String!, $secretPhrase: String!) { \
                 updateEntry(id: $id, title: $title, content: $content, secretPhrase: $secretPhrase) \
                 { success message } }"
                .to_string(),
            Operation::DeleteEntry => "mutation($id: Int!, $secretPhrase: String!) { \
                 deleteEntry(id: $id, secretPhrase: $secretPhrase) { success message } }"
                .to_string(),
            Operation::SearchByTitle => format!(
                "query($query: String!) {{ searchByTitle(query: $query) {{ {} }} }}",
                ENTRY_FIELDS
            ),
            Operation::SearchByContent => format!(
                "query($query: String!) {{ searchByContent(query: $query) {{ {} }} }}",
                ENTRY_FIELDS
            ),
            Operation::Entry => format!(
                "query($id: Int!) {{ entry(id: $id) {{ {} }} }}",
                ENTRY_FIELDS
            ),
            Operation::LatestEntries => format!(
                "query($limit: Int!) {{ latestEntries(limit: $limit) {{ {} }} }}",
                ENTRY_FIELDS
            ),
            Operation::EntriesInRange => format!(
                "query($startTimestamp: Int!, $endTimestamp: Int!) {{ \
                 entriesInRange(startTimestamp: $startTimestamp, endTimestamp: $endTimestamp) {{ {} }} }}",
                ENTRY_FIELDS
            ),
        }
    }

    /// Identify an operation from the document it sends
    pub fn from_document(document: &str) -> Option<Operation> {
        Operation::ALL
            .iter()
            .copied()
            .find(|op| op.document() == document)
    }
}

/// `{success, message}` payload of every mutation
#[derive(Debug, Clone, Deserialize)]
struct MutationResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default, rename = "entryId")]
    entry_id: Option<EntryId>,
}

impl MutationResponse {
    /// `success = false` becomes an application error carrying the server's message
    fn into_result(self) -> ApiResult<MutationResponse> {
        if self.success {
            Ok(self)
        } else {
            Err(ApiError::Application(self.message))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(transparent)]
struct Count(#[serde(deserialize_with = "lenient_u64")] u64);

/// Typed access to the diary catalog over any gateway
pub struct DiaryApi<G> {
    gateway: G,
}

impl<G: ApiGateway> DiaryApi<G> {
    pub fn new(gateway: G) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    pub async fn is_initialized(&self) -> ApiResult<bool> {
        self.call(Operation::IsInitialized, Map::new()).await
    }

    /// Returns the server's confirmation message
    pub async fn initialize(&self, secret_phrase: &str) -> ApiResult<String> {
        let vars = variables(json!({ "secretPhrase": secret_phrase }));
        self.mutate(Operation::Initialize, vars)
            .await
            .map(|r| r.message)
    }

    pub async fn unlock(&self, secret_phrase: &str) -> ApiResult<String> {
        let vars = variables(json!({ "secretPhrase": secret_phrase }));
        self.mutate(Operation::Unlock, vars).await.map(|r| r.message)
    }

    pub async fn entries(&self) -> ApiResult<Vec<Entry>> {
        self.list(Operation::Entries, Map::new()).await
    }

    /// Returns the new entry's id when the service reports it
    pub async fn add_entry(
        &self,
        title: &str,
        content: &str,
        secret_phrase: &str,
    ) -> ApiResult<Option<EntryId>> {
        let vars = variables(json!({
            "title": title,
            "content": content,
            "secretPhrase": secret_phrase,
        }));
        self.mutate(Operation::AddEntry, vars)
            .await
            .map(|r| r.entry_id)
    }

    pub async fn update_entry(
        &self,
        id: EntryId,
        title: &str,
        content: &str,
        secret_phrase: &str,
    ) -> ApiResult<String> {
        let vars = variables(json!({
            "id": id,
            "title": title,
            "content": content,
            "secretPhrase": secret_phrase,
        }));
        self.mutate(Operation::UpdateEntry, vars)
            .await
            .map(|r| r.message)
    }

    pub async fn delete_entry(&self, id: EntryId, secret_phrase: &str) -> ApiResult<String> {
        let vars = variables(json!({ "id": id, "secretPhrase": secret_phrase }));
        self.mutate(Operation::DeleteEntry, vars)
            .await
            .map(|r| r.message)
    }

    pub async fn search_by_title(&self, query: &str) -> ApiResult<Vec<Entry>> {
        let vars = variables(json!({ "query": query }));
        self.list(Operation::SearchByTitle, vars).await
    }

    pub async fn search_by_content(&self, query: &str) -> ApiResult<Vec<Entry>> {
        let vars = variables(json!({ "query": query }));
        self.list(Operation::SearchByContent, vars).await
    }

    pub async fn entry(&self, id: EntryId) -> ApiResult<Option<Entry>> {
        let vars = variables(json!({ "id": id }));
        self.call(Operation::Entry, vars).await
    }

    pub async fn entry_count(&self) -> ApiResult<u64> {
        self.call::<Count>(Operation::EntryCount, Map::new())
            .await
            .map(|c| c.0)
    }

    pub async fn owner(&self) -> ApiResult<String> {
        self.call(Operation::Owner, Map::new()).await
    }

    pub async fn latest_entries(&self, limit: u32) -> ApiResult<Vec<Entry>> {
        let vars = variables(json!({ "limit": limit }));
        self.list(Operation::LatestEntries, vars).await
    }

    pub async fn entries_in_range(&self, start: u64, end: u64) -> ApiResult<Vec<Entry>> {
        let vars = variables(json!({ "startTimestamp": start, "endTimestamp": end }));
        self.list(Operation::EntriesInRange, vars).await
    }

    async fn mutate(
        &self,
        operation: Operation,
        vars: Map<String, Value>,
    ) -> ApiResult<MutationResponse> {
        self.call::<MutationResponse>(operation, vars)
            .await?
            .into_result()
    }

    /// List payloads treat `null` as empty
    async fn list(&self, operation: Operation, vars: Map<String, Value>) -> ApiResult<Vec<Entry>> {
        self.call::<Option<Vec<Entry>>>(operation, vars)
            .await
            .map(Option::unwrap_or_default)
    }

    async fn call<T: DeserializeOwned>(
        &self,
        operation: Operation,
        vars: Map<String, Value>,
    ) -> ApiResult<T> {
        tracing::debug!(operation = operation.field(), "GraphQL round trip");

        let mut data = self.gateway.execute(&operation.document(), vars).await?;
        let payload = data
            .get_mut(operation.field())
            .map(Value::take)
            .ok_or_else(|| {
                ApiError::Transport(format!("Response is missing field '{}'", operation.field()))
            })?;

        Ok(serde_json::from_value(payload)?)
    }
}

fn variables(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
