/* 📖 # Why a session registry?

Each open endpoint page is a session: its own PageState, its own pending
execution and its own editor lease. Nothing is shared between pages, so the
registry only maps ids to sessions. Closing a session drops all three, which
cancels a pending execution and frees the editor.

A page whose client went away without closing it is evicted once it has been
idle longer than the idle timeout. Every access counts as activity, and the
sweep runs whenever a page is opened or looked up.

Delayed executions complete on a worker thread. They only touch the page state
through its own mutex, never the registry, so a slow completion cannot block
other pages.
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use giftdocs_base::{GiftDocsResult, err};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::editor::{EditorLease, EditorRegistry};
use crate::endpoint::EndpointId;
use crate::executor::{Executor, PendingExecution};
use crate::page::PageState;
use crate::representation::Representation;
use crate::simulate::simulate;

#[derive(Debug)]
struct PageSession {
    state: Arc<Mutex<PageState>>,
    pending: Option<PendingExecution>,
    lease: EditorLease,
    last_seen: Mutex<Instant>,
}

impl PageSession {
    fn touch(&self) {
        *self.last_seen.lock() = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(*self.last_seen.lock())
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

/// What a client needs to draw an endpoint page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub session_id: String,
    pub endpoint: EndpointId,
    pub title: &'static str,
    pub active: Representation,
    pub text: String,
    pub modified: bool,
    pub state: &'static str,
    pub response: Option<Value>,
    pub response_html: Option<String>,
}

impl PageSnapshot {
    fn capture(session_id: &str, page: &PageState) -> Self {
        let result = page.result();
        Self {
            session_id: session_id.to_string(),
            endpoint: page.endpoint(),
            title: page.endpoint().definition().title,
            active: page.active(),
            text: page.active_text().to_string(),
            modified: page.samples().is_modified(page.active()),
            state: page.execution().name(),
            response: result.map(|result| result.response.clone()),
            response_html: result.map(|result| result.html()),
        }
    }
}

/// Open endpoint pages, keyed by session id.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, PageSession>>,
    executor: Executor,
    editors: EditorRegistry,
    base_url: String,
    idle_timeout: Duration,
}

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

impl SessionRegistry {
    pub fn new(base_url: impl Into<String>, executor: Executor) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            executor,
            editors: EditorRegistry::new(),
            base_url: base_url.into(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn open(&self, endpoint: EndpointId) -> PageSnapshot {
        self.evict_idle();
        let session_id = nanoid::nanoid!(12);
        let page = PageState::new(endpoint, &self.base_url);
        let snapshot = PageSnapshot::capture(&session_id, &page);
        let session = PageSession {
            state: Arc::new(Mutex::new(page)),
            pending: None,
            lease: self.editors.acquire(endpoint),
            last_seen: Mutex::new(Instant::now()),
        };
        self.sessions.write().insert(session_id.clone(), session);
        info!(session = %session_id, endpoint = %endpoint, "Opened page");
        snapshot
    }

    pub fn snapshot(&self, session_id: &str) -> GiftDocsResult<PageSnapshot> {
        self.with_state(session_id, |page| PageSnapshot::capture(session_id, page))
    }

    pub fn switch_tab(
        &self,
        session_id: &str,
        representation: Representation,
    ) -> GiftDocsResult<PageSnapshot> {
        self.with_state(session_id, |page| {
            page.switch_tab(representation);
            PageSnapshot::capture(session_id, page)
        })
    }

    /// Replace the text of the active tab.
    pub fn edit(&self, session_id: &str, text: impl Into<String>) -> GiftDocsResult<PageSnapshot> {
        let text = text.into();
        self.with_state(session_id, |page| {
            page.edit_active(text);
            PageSnapshot::capture(session_id, page)
        })
    }

    /// Start executing the active tab. A pending execution of the same page is cancelled.
    pub fn execute(&self, session_id: &str) -> GiftDocsResult<PageSnapshot> {
        self.evict_idle();
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| err!("Unknown page session '{}'", session_id))?;
        session.touch();
        session.cancel_pending();
        let request = session.state.lock().begin_execution();
        debug!(session = %session_id, ticket = request.ticket, "Execution scheduled");

        let state = Arc::clone(&session.state);
        // the job may run right here when there is no delay, so the state lock must be free
        let pending = self.executor.schedule(move || {
            let result = simulate(request.endpoint, &request.text, request.representation);
            state.lock().complete(request.ticket, result);
        });
        session.pending = Some(pending);
        let snapshot = PageSnapshot::capture(session_id, &session.state.lock());
        Ok(snapshot)
    }

    /// Restore the default samples and drop any pending execution.
    pub fn reset(&self, session_id: &str) -> GiftDocsResult<PageSnapshot> {
        self.evict_idle();
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| err!("Unknown page session '{}'", session_id))?;
        session.touch();
        session.cancel_pending();
        let mut page = session.state.lock();
        page.reset();
        debug!(session = %session_id, "Page reset");
        Ok(PageSnapshot::capture(session_id, &page))
    }

    /// Indented response text, or `None` while there is no response.
    pub fn copy(&self, session_id: &str) -> GiftDocsResult<Option<String>> {
        self.with_state(session_id, |page| page.copy_response())
    }

    pub fn close(&self, session_id: &str) -> GiftDocsResult<()> {
        let session = self
            .sessions
            .write()
            .remove(session_id)
            .ok_or_else(|| err!("Unknown page session '{}'", session_id))?;
        info!(session = %session_id, endpoint = %session.lease.endpoint(), "Closed page");
        drop(session);
        Ok(())
    }

    /// Close every page idle for longer than the idle timeout. Returns how many were closed.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let evicted: Vec<(String, PageSession)> = {
            let mut sessions = self.sessions.write();
            let idle: Vec<String> = sessions
                .iter()
                .filter(|(_, session)| session.idle_for(now) > self.idle_timeout)
                .map(|(id, _)| id.clone())
                .collect();
            idle.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|session| (id, session)))
                .collect()
        };
        for (id, session) in &evicted {
            info!(
                session = %id,
                endpoint = %session.lease.endpoint(),
                idle_secs = session.idle_for(now).as_secs(),
                "Evicted idle page"
            );
        }
        let count = evicted.len();
        // outside the map lock: cancels pending runs and releases the leases
        drop(evicted);
        count
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Editors currently held by open pages.
    pub fn live_editors(&self) -> usize {
        self.editors.live_count()
    }

    fn with_state<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut PageState) -> T,
    ) -> GiftDocsResult<T> {
        self.evict_idle();
        let sessions = self.sessions.read();
        let session = sessions
            .get(session_id)
            .ok_or_else(|| err!("Unknown page session '{}'", session_id))?;
        session.touch();
        let mut page = session.state.lock();
        Ok(f(&mut page))
    }
}
