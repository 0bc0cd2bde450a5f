//! Session Controller
//!
//! One controller per page load (or per CLI invocation). Operations take
//! `&mut self`, so a second action cannot start while one is in flight.

use uuid::Uuid;

use super::error::{DiaryError, DiaryResult};
use super::search::{search_action, SearchAction};
use super::state::{Session, View};
use crate::gateway::{ApiError, ApiGateway, ApiResult, DiaryApi};
use crate::render::{Renderer, StatusLevel};
use crate::store::KeyValueStore;
use crate::types::{Entry, EntryCollection, EntryId};

/// Shortest secret phrase accepted when creating a diary
pub const MIN_PHRASE_LEN: usize = 8;

/// Session-store key remembering that this tab unlocked the diary
pub const UNLOCKED_KEY: &str = "diaryUnlocked";

/// Drives the session state machine against a gateway and a renderer
///
/// The secret phrase is never retained: every write takes it as an argument
/// and the service validates it again.
pub struct SessionController<G, R, S> {
    id: Uuid,
    api: DiaryApi<G>,
    renderer: R,
    session_store: S,
    session: Session,
    entries: EntryCollection,
}

impl<G, R, S> SessionController<G, R, S>
where
    G: ApiGateway,
    R: Renderer,
    S: KeyValueStore,
{
    pub fn new(gateway: G, renderer: R, session_store: S) -> Self {
        Self {
            id: Uuid::new_v4(),
            api: DiaryApi::new(gateway),
            renderer,
            session_store,
            session: Session::new(),
            entries: EntryCollection::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn view(&self) -> View {
        self.session.view()
    }

    pub fn entries(&self) -> &EntryCollection {
        &self.entries
    }

    pub fn api(&self) -> &DiaryApi<G> {
        &self.api
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn session_store(&self) -> &S {
        &self.session_store
    }

    /// Cached entry by id; unknown ids are simply absent
    pub fn find_entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.find(id)
    }

    /// Startup: probe the service, restore an unlocked tab session, draw
    pub async fn boot(&mut self) -> View {
        tracing::info!(session = %self.id, "Starting diary session");
        self.renderer
            .show_status("Connecting to the diary service...", StatusLevel::Info);

        match self.probe_initialization().await {
            Ok(true) => {
                self.renderer
                    .show_status("Connected to the diary service", StatusLevel::Success);

                if self.has_unlocked_flag() {
                    match self.fetch_entries().await {
                        Ok(()) => {
                            self.session.unlock();
                            tracing::info!(session = %self.id, "Restored unlocked session");
                        }
                        Err(e) => {
                            tracing::warn!(session = %self.id, "Could not restore session: {}", e);
                            self.clear_unlocked_flag();
                        }
                    }
                }
            }
            Ok(false) => {
                self.renderer
                    .show_status("Ready to create your diary", StatusLevel::Info);
            }
            Err(_) => {}
        }

        self.redraw();
        self.view()
    }

    /// Ask the service whether the diary exists
    ///
    /// Failures count as "not initialized" and are reported, never returned.
    pub async fn check_initialization(&mut self) -> bool {
        self.probe_initialization().await.unwrap_or(false)
    }

    async fn probe_initialization(&mut self) -> DiaryResult<bool> {
        self.renderer.set_loading(true);
        let result = self.api.is_initialized().await;
        self.renderer.set_loading(false);

        match result {
            Ok(initialized) => {
                self.session.set_initialized(initialized);
                tracing::debug!(session = %self.id, initialized, "Checked initialization");
                Ok(initialized)
            }
            Err(e) => {
                self.session.set_initialized(false);
                self.fail(
                    "Error connecting to the diary service".to_string(),
                    e.into(),
                )
            }
        }
    }

    /// Create the diary; success also unlocks it
    pub async fn initialize(&mut self, secret_phrase: &str) -> DiaryResult<()> {
        if secret_phrase.chars().count() < MIN_PHRASE_LEN {
            let msg = format!(
                "Secret phrase must be at least {} characters",
                MIN_PHRASE_LEN
            );
            return self.fail(msg.clone(), DiaryError::LocalValidation(msg));
        }

        self.renderer.set_loading(true);
        let result = self.api.initialize(secret_phrase).await;
        self.renderer.set_loading(false);

        if let Err(e) = result {
            return self.fail(describe("Failed to create diary", &e), e.into());
        }

        self.session.unlock();
        self.set_unlocked_flag();
        tracing::info!(session = %self.id, "Diary initialized and unlocked");
        self.renderer.show_status(
            "Diary created and unlocked! You can now write entries",
            StatusLevel::Success,
        );
        self.refresh().await;
        Ok(())
    }

    /// Prove knowledge of the phrase for this session
    ///
    /// Any rejection by the service reads as "Incorrect secret phrase".
    pub async fn unlock(&mut self, secret_phrase: &str) -> DiaryResult<()> {
        self.require_phrase(secret_phrase)?;

        self.renderer.set_loading(true);
        let result = self.api.unlock(secret_phrase).await;
        self.renderer.set_loading(false);

        match result {
            Ok(_) => {
                self.session.unlock();
                self.set_unlocked_flag();
                tracing::info!(session = %self.id, "Diary unlocked");
                self.renderer
                    .show_status("Diary unlocked!", StatusLevel::Success);
                self.refresh().await;
                Ok(())
            }
            Err(ApiError::Application(reason)) => {
                tracing::debug!(session = %self.id, reason = %reason, "Unlock rejected");
                let msg = "Incorrect secret phrase".to_string();
                self.fail(msg.clone(), DiaryError::Application(msg))
            }
            Err(e) => self.fail(describe("Failed to unlock diary", &e), e.into()),
        }
    }

    /// Forget the unlock and the cached entries; no request is made
    pub fn lock(&mut self) {
        self.session.lock();
        self.entries.clear();
        self.clear_unlocked_flag();
        tracing::info!(session = %self.id, "Diary locked");
        self.renderer.show_status("Diary locked", StatusLevel::Info);
        self.redraw();
    }

    /// Reload the full entry list and redraw
    pub async fn load_entries(&mut self) -> DiaryResult<()> {
        match self.fetch_entries().await {
            Ok(()) => {
                self.redraw();
                Ok(())
            }
            Err(e) => self.fail(format!("Failed to load entries: {}", e), e),
        }
    }

    /// Returns the new id when the service reports one
    pub async fn add_entry(
        &mut self,
        title: &str,
        content: &str,
        secret_phrase: &str,
    ) -> DiaryResult<Option<EntryId>> {
        self.require_fields(&[title, content, secret_phrase])?;

        self.renderer.set_loading(true);
        let result = self.api.add_entry(title, content, secret_phrase).await;
        self.renderer.set_loading(false);

        match result {
            Ok(id) => {
                tracing::info!(session = %self.id, entry_id = ?id, "Entry added");
                self.renderer.show_status("Entry saved!", StatusLevel::Success);
                self.refresh().await;
                Ok(id)
            }
            Err(e) => self.fail(describe("Failed to save entry", &e), e.into()),
        }
    }

    pub async fn update_entry(
        &mut self,
        id: EntryId,
        title: &str,
        content: &str,
        secret_phrase: &str,
    ) -> DiaryResult<()> {
        self.require_fields(&[title, content, secret_phrase])?;

        self.renderer.set_loading(true);
        let result = self
            .api
            .update_entry(id, title, content, secret_phrase)
            .await;
        self.renderer.set_loading(false);

        match result {
            Ok(_) => {
                tracing::info!(session = %self.id, entry_id = %id, "Entry updated");
                self.renderer
                    .show_status("Entry updated!", StatusLevel::Success);
                self.refresh().await;
                Ok(())
            }
            Err(e) => self.fail(describe("Failed to update entry", &e), e.into()),
        }
    }

    /// Ids missing from the cache are still sent; the service decides
    pub async fn delete_entry(&mut self, id: EntryId, secret_phrase: &str) -> DiaryResult<()> {
        self.require_phrase(secret_phrase)?;

        self.renderer.set_loading(true);
        let result = self.api.delete_entry(id, secret_phrase).await;
        self.renderer.set_loading(false);

        match result {
            Ok(_) => {
                tracing::info!(session = %self.id, entry_id = %id, "Entry deleted");
                self.renderer.show_status("Entry deleted", StatusLevel::Success);
                self.refresh().await;
                Ok(())
            }
            Err(e) => self.fail(describe("Failed to delete entry", &e), e.into()),
        }
    }

    /// Title search with the keystroke policy of [`search_action`]
    pub async fn search(&mut self, raw_query: &str) -> DiaryResult<SearchAction> {
        let action = search_action(raw_query);
        match &action {
            SearchAction::ReloadAll => self.load_entries().await?,
            SearchAction::Skip => {}
            SearchAction::Query(query) => {
                self.renderer.set_loading(true);
                let result = self.api.search_by_title(query).await;
                self.renderer.set_loading(false);
                self.apply_listing(result, "Search failed")?;
            }
        }
        Ok(action)
    }

    /// Content search, same policy as [`search`](Self::search)
    pub async fn search_content(&mut self, raw_query: &str) -> DiaryResult<SearchAction> {
        let action = search_action(raw_query);
        match &action {
            SearchAction::ReloadAll => self.load_entries().await?,
            SearchAction::Skip => {}
            SearchAction::Query(query) => {
                self.renderer.set_loading(true);
                let result = self.api.search_by_content(query).await;
                self.renderer.set_loading(false);
                self.apply_listing(result, "Search failed")?;
            }
        }
        Ok(action)
    }

    /// Show only the newest `limit` entries
    pub async fn load_latest(&mut self, limit: u32) -> DiaryResult<()> {
        if limit == 0 {
            let msg = "Limit must be positive".to_string();
            return self.fail(msg.clone(), DiaryError::LocalValidation(msg));
        }

        self.renderer.set_loading(true);
        let result = self.api.latest_entries(limit).await;
        self.renderer.set_loading(false);
        self.apply_listing(result, "Failed to load entries")
    }

    /// Show entries stamped within `[start, end]` (microseconds)
    pub async fn load_range(&mut self, start: u64, end: u64) -> DiaryResult<()> {
        if start > end {
            let msg = "Start timestamp must be before end timestamp".to_string();
            return self.fail(msg.clone(), DiaryError::LocalValidation(msg));
        }

        self.renderer.set_loading(true);
        let result = self.api.entries_in_range(start, end).await;
        self.renderer.set_loading(false);
        self.apply_listing(result, "Failed to load entries")
    }

    pub async fn owner(&mut self) -> DiaryResult<String> {
        self.renderer.set_loading(true);
        let result = self.api.owner().await;
        self.renderer.set_loading(false);
        result.or_else(|e| self.fail(describe("Failed to read owner", &e), e.into()))
    }

    pub async fn entry_count(&mut self) -> DiaryResult<u64> {
        self.renderer.set_loading(true);
        let result = self.api.entry_count().await;
        self.renderer.set_loading(false);
        result.or_else(|e| self.fail(describe("Failed to count entries", &e), e.into()))
    }

    async fn fetch_entries(&mut self) -> DiaryResult<()> {
        self.renderer.set_loading(true);
        let result = self.api.entries().await;
        self.renderer.set_loading(false);

        let entries = result?;
        tracing::debug!(session = %self.id, count = entries.len(), "Loaded entries");
        self.entries.replace(entries);
        Ok(())
    }

    /// Reload after a state change; redraw even when the reload fails
    async fn refresh(&mut self) {
        if self.load_entries().await.is_err() {
            self.redraw();
        }
    }

    fn apply_listing(&mut self, result: ApiResult<Vec<Entry>>, failure: &str) -> DiaryResult<()> {
        match result {
            Ok(entries) => {
                self.entries.replace(entries);
                self.redraw();
                Ok(())
            }
            Err(e) => self.fail(describe(failure, &e), e.into()),
        }
    }

    /// Push the current view to the renderer
    pub fn redraw(&mut self) {
        let view = self.session.view();
        let entries = (view == View::Diary).then_some(&self.entries);
        self.renderer.render(view, entries);
    }

    fn require_fields(&mut self, fields: &[&str]) -> DiaryResult<()> {
        if fields.iter().any(|f| f.trim().is_empty()) {
            let msg = "Please fill in all fields".to_string();
            return self.fail(msg.clone(), DiaryError::LocalValidation(msg));
        }
        Ok(())
    }

    /// Blank phrases never reach the service
    fn require_phrase(&mut self, secret_phrase: &str) -> DiaryResult<()> {
        if secret_phrase.trim().is_empty() {
            let msg = "Please enter your secret phrase".to_string();
            return self.fail(msg.clone(), DiaryError::LocalValidation(msg));
        }
        Ok(())
    }

    /// Report a failure to the user and hand it back to the caller
    fn fail<T>(&mut self, status: String, err: DiaryError) -> DiaryResult<T> {
        match &err {
            DiaryError::LocalValidation(_) => {
                tracing::debug!(session = %self.id, "Rejected locally: {}", err)
            }
            _ => tracing::warn!(session = %self.id, "{}", status),
        }
        self.renderer.show_status(&status, StatusLevel::Error);
        Err(err)
    }

    fn has_unlocked_flag(&self) -> bool {
        match self.session_store.get(UNLOCKED_KEY) {
            Ok(value) => value.is_some(),
            Err(e) => {
                tracing::warn!("Failed to read session store: {}", e);
                false
            }
        }
    }

    fn set_unlocked_flag(&mut self) {
        if let Err(e) = self.session_store.set(UNLOCKED_KEY, "true") {
            tracing::warn!("Failed to write session store: {}", e);
        }
    }

    fn clear_unlocked_flag(&mut self) {
        if let Err(e) = self.session_store.remove(UNLOCKED_KEY) {
            tracing::warn!("Failed to write session store: {}", e);
        }
    }
}

fn describe(context: &str, err: &ApiError) -> String {
    format!("{}: {}", context, err.message())
}
