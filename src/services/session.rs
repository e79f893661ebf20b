//! Session service: one runner task per conversation plus the live store.
//!
//! DESIGN
//! ======
//! Each session is owned by a runner task. Routes talk to it through a
//! `SessionHandle`: events go in over an mpsc queue, and every applied event
//! publishes a fresh `SessionSnapshot` on a watch channel that websocket
//! clients follow. Because the runner is the only code that touches the
//! `Session`, user actions and advisor settles are applied strictly in
//! arrival order.
//!
//! Effects returned by the machine run as detached tasks that hold only a
//! weak sender. They report back with an ordinary event that queues behind
//! any user action already submitted. When the last handle is dropped the
//! runner exits and any late settle is discarded.
//!
//! TRADE-OFFS
//! ==========
//! Advisor calls are not cancelled on reset or eviction. They run to
//! completion (bounded by the settle timeout) and their results are ignored
//! as stale.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{RwLock, mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::advisor::Advisor;
use crate::advisor::types::AdvisorError;
use crate::chat::machine::{AdvisoryCallFailed, Effect, Event, Outcome, Session, Step, TransitionError};
use crate::chat::message::Message;
use crate::config::SessionConfig;
use crate::error::ErrorCode;

const COMMAND_QUEUE_CAPACITY: usize = 32;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("session {0} is no longer running")]
    Closed(Uuid),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "E_SESSION_NOT_FOUND",
            Self::Closed(_) => "E_SESSION_CLOSED",
            Self::Transition(e) => e.error_code(),
        }
    }
}

/// Render-ready view of one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: Uuid,
    pub step: Step,
    pub messages: Vec<Message>,
    pub can_visualize: bool,
}

impl SessionSnapshot {
    fn of(id: Uuid, session: &Session) -> Self {
        Self {
            id,
            step: session.step(),
            messages: session.log().as_slice().to_vec(),
            can_visualize: session.can_visualize(),
        }
    }
}

type Reply = oneshot::Sender<Result<SessionSnapshot, TransitionError>>;

struct Command {
    event: Event,
    /// `None` for events fed back by effect tasks.
    reply: Option<Reply>,
}

// =============================================================================
// HANDLE
// =============================================================================

/// Cheap, clonable handle to a running session.
#[derive(Clone)]
pub struct SessionHandle {
    id: Uuid,
    commands: mpsc::Sender<Command>,
    updates: watch::Receiver<SessionSnapshot>,
    last_active: Arc<Mutex<Instant>>,
}

impl SessionHandle {
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Submit an event and wait for the session to apply it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Transition` when the current step rejects the
    /// event, or `SessionError::Closed` if the runner has stopped.
    pub async fn send(&self, event: Event) -> Result<SessionSnapshot, SessionError> {
        self.touch();
        let (reply, rx) = oneshot::channel();
        self.commands
            .send(Command { event, reply: Some(reply) })
            .await
            .map_err(|_| SessionError::Closed(self.id))?;
        let snapshot = rx.await.map_err(|_| SessionError::Closed(self.id))??;
        Ok(snapshot)
    }

    /// Latest published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.updates.borrow().clone()
    }

    /// Follow snapshots as they are published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.updates.clone()
    }

    pub fn touch(&self) {
        *self
            .last_active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Instant::now();
    }

    fn idle_for(&self, now: Instant) -> Duration {
        let last = *self
            .last_active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        now.saturating_duration_since(last)
    }
}

// =============================================================================
// RUNNER
// =============================================================================

/// Spawn a runner for a fresh session and return its handle.
#[must_use]
pub fn spawn_session(id: Uuid, advisor: Option<Arc<dyn Advisor>>, config: SessionConfig) -> SessionHandle {
    let session = Session::new();
    let (commands, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
    let (updates_tx, updates) = watch::channel(SessionSnapshot::of(id, &session));

    let runner = Runner { id, session, advisor, config, feedback: commands.downgrade(), updates: updates_tx };
    tokio::spawn(runner.run(rx));

    SessionHandle { id, commands, updates, last_active: Arc::new(Mutex::new(Instant::now())) }
}

struct Runner {
    id: Uuid,
    session: Session,
    advisor: Option<Arc<dyn Advisor>>,
    config: SessionConfig,
    feedback: mpsc::WeakSender<Command>,
    updates: watch::Sender<SessionSnapshot>,
}

impl Runner {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        info!(session_id = %self.id, "session: runner started");
        while let Some(command) = rx.recv().await {
            self.handle(command);
        }
        info!(session_id = %self.id, "session: runner stopped");
    }

    fn handle(&mut self, command: Command) {
        let event_name = command.event.name();
        let result = match self.session.apply(command.event) {
            Ok(effects) => {
                info!(
                    session_id = %self.id,
                    event = event_name,
                    step = %self.session.step(),
                    effects = effects.len(),
                    "session: event applied"
                );
                for effect in effects {
                    self.execute(effect);
                }
                let snapshot = SessionSnapshot::of(self.id, &self.session);
                self.updates.send_replace(snapshot.clone());
                Ok(snapshot)
            }
            Err(e) => {
                info!(session_id = %self.id, event = event_name, error = %e, "session: event rejected");
                Err(e)
            }
        };
        if let Some(reply) = command.reply {
            // The caller may have gone away; the event is applied regardless.
            let _ = reply.send(result);
        }
    }

    fn execute(&self, effect: Effect) {
        let session_id = self.id;
        let settle_timeout = self.config.settle_timeout;
        match effect {
            Effect::SchedulePrompt { epoch, prompt } => {
                let delay = self.config.prompt_delay;
                self.spawn_feedback(async move {
                    tokio::time::sleep(delay).await;
                    Event::PromptDue { epoch, prompt }
                });
            }
            Effect::StartAnalyze { ticket, image, budget, mood } => {
                let advisor = self.advisor.clone();
                self.spawn_feedback(async move {
                    info!(%session_id, %budget, %mood, "advisor: analyze started");
                    let outcome = match advisor {
                        Some(advisor) => {
                            settle(session_id, "analyze", settle_timeout, advisor.analyze(&image, budget, mood)).await
                        }
                        None => unconfigured(session_id, "analyze"),
                    };
                    Event::AnalyzeSettled { ticket, outcome }
                });
            }
            Effect::StartVisualize { ticket, image, verdict, mood } => {
                let advisor = self.advisor.clone();
                self.spawn_feedback(async move {
                    info!(%session_id, %mood, "advisor: visualize started");
                    let outcome = match advisor {
                        Some(advisor) => {
                            settle(session_id, "visualize", settle_timeout, advisor.visualize(&image, &verdict, mood))
                                .await
                        }
                        None => unconfigured(session_id, "visualize"),
                    };
                    Event::VisualizeSettled { ticket, outcome }
                });
            }
        }
    }

    /// Run `task` detached and feed its event back into this session.
    fn spawn_feedback<F>(&self, task: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let feedback = self.feedback.clone();
        let session_id = self.id;
        tokio::spawn(async move {
            let event = task.await;
            let Some(commands) = feedback.upgrade() else {
                debug!(%session_id, event = event.name(), "session: gone; dropping feedback");
                return;
            };
            if commands.send(Command { event, reply: None }).await.is_err() {
                debug!(%session_id, "session: runner stopped; dropping feedback");
            }
        });
    }
}

/// Await one advisor call under `limit`, collapsing every failure.
async fn settle<T>(
    session_id: Uuid,
    call: &'static str,
    limit: Duration,
    request: impl Future<Output = Result<T, AdvisorError>>,
) -> Outcome<T> {
    let started = Instant::now();
    match tokio::time::timeout(limit, request).await {
        Ok(Ok(value)) => {
            let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
            info!(%session_id, call, elapsed_ms, "advisor: call succeeded");
            Ok(value)
        }
        Ok(Err(e)) => {
            warn!(%session_id, call, error = %e, code = e.error_code(), retryable = e.retryable(), "advisor: call failed");
            Err(AdvisoryCallFailed)
        }
        Err(_) => {
            warn!(%session_id, call, timeout_secs = limit.as_secs(), "advisor: call timed out");
            Err(AdvisoryCallFailed)
        }
    }
}

fn unconfigured<T>(session_id: Uuid, call: &'static str) -> Outcome<T> {
    warn!(%session_id, call, "advisor: not configured");
    Err(AdvisoryCallFailed)
}

// =============================================================================
// STORE
// =============================================================================

/// Live sessions keyed by id.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
    advisor: Option<Arc<dyn Advisor>>,
    config: SessionConfig,
}

impl SessionStore {
    #[must_use]
    pub fn new(advisor: Option<Arc<dyn Advisor>>, config: SessionConfig) -> Self {
        Self { sessions: Arc::new(RwLock::new(HashMap::new())), advisor, config }
    }

    /// Start a new session at the upload step.
    pub async fn create(&self) -> SessionHandle {
        let id = Uuid::new_v4();
        let handle = spawn_session(id, self.advisor.clone(), self.config);
        self.sessions.write().await.insert(id, handle.clone());
        info!(session_id = %id, "session: created");
        handle
    }

    /// Look up a session and mark it active.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for unknown or evicted ids.
    pub async fn get(&self, id: Uuid) -> Result<SessionHandle, SessionError> {
        let handle = self
            .sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))?;
        handle.touch();
        Ok(handle)
    }

    /// Drop a session. Its runner stops once outstanding handles are gone.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotFound` for unknown ids.
    pub async fn remove(&self, id: Uuid) -> Result<(), SessionError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(SessionError::NotFound(id));
        }
        info!(session_id = %id, "session: removed");
        Ok(())
    }

    /// Remove sessions idle longer than the configured timeout. Returns the
    /// evicted ids.
    pub async fn evict_idle(&self) -> Vec<Uuid> {
        let now = Instant::now();
        let idle_timeout = self.config.idle_timeout;
        let mut sessions = self.sessions.write().await;
        let expired: Vec<Uuid> = sessions
            .values()
            .filter(|h| h.idle_for(now) > idle_timeout)
            .map(SessionHandle::id)
            .collect();
        for id in &expired {
            sessions.remove(id);
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
