mod router;

pub use router::Router;

use crate::catalog::CatalogService;
use crate::config::Config;
use crate::controller::{DebounceTicket, Effect, LookupTicket, SuggestionController};
use crate::{Error, Result};
use marquee_types::{ControllerEvent, ControllerUpdate, Key, ResultItem, SuggestionSnapshot};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Messages processed by the engine loop, in arrival order
#[derive(Debug)]
enum EngineMessage {
    Event(ControllerEvent),
    DebounceElapsed(DebounceTicket),
    LookupResolved(LookupTicket, Result<Vec<ResultItem>>),
    Snapshot(oneshot::Sender<SuggestionSnapshot>),
    Shutdown,
}

/// Drives a [`SuggestionController`] on a tokio task.
///
/// The engine is the only owner of the controller state. Timers and catalog
/// lookups run as separate tasks that report back through the engine's own
/// channel, so every transition happens in order on a single task.
pub struct SuggestionEngine {
    controller: SuggestionController,
    catalog: Arc<dyn CatalogService>,
    router: Arc<dyn Router>,

    /// Weak, so the loop ends once every handle and task sender is gone
    tx: WeakUnboundedSender<EngineMessage>,
    rx: UnboundedReceiver<EngineMessage>,

    /// Channel to send updates to the front end
    update_tx: UnboundedSender<ControllerUpdate>,

    /// Sleeping debounce timer, aborted when superseded
    timer: Option<JoinHandle<()>>,

    /// Last snapshot published, to skip unchanged ones
    published: Option<SuggestionSnapshot>,
}

impl SuggestionEngine {
    /// Create an engine, a handle to feed it events, and a receiver for updates.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn new(
        config: &Config,
        catalog: Arc<dyn CatalogService>,
        router: Arc<dyn Router>,
    ) -> Result<(Self, EngineHandle, UnboundedReceiver<ControllerUpdate>)> {
        let controller = SuggestionController::new(config)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let weak_tx = tx.downgrade();
        let handle = EngineHandle { tx };

        Ok((
            Self {
                controller,
                catalog,
                router,
                tx: weak_tx,
                rx,
                update_tx,
                timer: None,
                published: None,
            },
            handle,
            update_rx,
        ))
    }

    /// Create an engine and run it on a new tokio task.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration fails validation.
    pub fn spawn(
        config: &Config,
        catalog: Arc<dyn CatalogService>,
        router: Arc<dyn Router>,
    ) -> Result<(EngineHandle, UnboundedReceiver<ControllerUpdate>, JoinHandle<()>)> {
        let (engine, handle, updates) = Self::new(config, catalog, router)?;
        let task = tokio::spawn(engine.run());
        Ok((handle, updates, task))
    }

    /// Process messages until shutdown, or until every handle is dropped and
    /// no timer or lookup is left to report back.
    pub async fn run(mut self) {
        info!("Suggestion engine started");
        self.publish();

        while let Some(message) = self.rx.recv().await {
            if !self.process(message) {
                break;
            }
        }

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        info!("Suggestion engine stopped");
    }

    /// Returns false when the loop should stop
    fn process(&mut self, message: EngineMessage) -> bool {
        let effects = match message {
            EngineMessage::Event(event) => {
                debug!(?event, "Controller event");
                self.controller.handle(event)
            }
            EngineMessage::DebounceElapsed(ticket) => self.controller.debounce_elapsed(ticket),
            EngineMessage::LookupResolved(ticket, result) => {
                self.controller.lookup_resolved(&ticket, result)
            }
            EngineMessage::Snapshot(reply) => {
                let _ = reply.send(self.controller.snapshot());
                return true;
            }
            EngineMessage::Shutdown => return false,
        };

        for effect in effects {
            self.apply(effect);
        }
        self.publish();
        true
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleDebounce { ticket, delay } => {
                if let Some(previous) = self.timer.take() {
                    previous.abort();
                }
                let Some(tx) = self.tx.upgrade() else {
                    return;
                };
                self.timer = Some(tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let _ = tx.send(EngineMessage::DebounceElapsed(ticket));
                }));
            }
            Effect::Lookup(ticket) => {
                let Some(tx) = self.tx.upgrade() else {
                    return;
                };
                let lookup = self.catalog.lookup(&ticket.query);
                tokio::spawn(async move {
                    let result = lookup.await;
                    let _ = tx.send(EngineMessage::LookupResolved(ticket, result));
                });
            }
            Effect::Navigate(target) => {
                self.router.navigate(&target);
                let _ = self.update_tx.send(ControllerUpdate::Navigated { target });
            }
            Effect::Close => {
                let _ = self.update_tx.send(ControllerUpdate::Closed);
            }
        }
    }

    fn publish(&mut self) {
        let snapshot = self.controller.snapshot();
        if self.published.as_ref() == Some(&snapshot) {
            return;
        }
        self.published = Some(snapshot.clone());
        let _ = self.update_tx.send(ControllerUpdate::Snapshot(snapshot));
    }
}

/// Cheap, cloneable sender side of a running engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    tx: UnboundedSender<EngineMessage>,
}

impl EngineHandle {
    /// Queue an event.
    ///
    /// # Errors
    ///
    /// Returns `Error::EngineStopped` if the engine loop has exited.
    pub fn send(&self, event: ControllerEvent) -> Result<()> {
        self.tx
            .send(EngineMessage::Event(event))
            .map_err(|_| Error::EngineStopped)
    }

    /// # Errors
    ///
    /// Returns `Error::EngineStopped` if the engine loop has exited.
    pub fn set_query(&self, query: impl Into<String>) -> Result<()> {
        self.send(ControllerEvent::QueryChanged {
            query: query.into(),
        })
    }

    /// # Errors
    ///
    /// Returns `Error::EngineStopped` if the engine loop has exited.
    pub fn key(&self, key: Key) -> Result<()> {
        self.send(ControllerEvent::KeyPressed { key })
    }

    /// # Errors
    ///
    /// Returns `Error::EngineStopped` if the engine loop has exited.
    pub fn click_outside(&self) -> Result<()> {
        self.send(ControllerEvent::ClickedOutside)
    }

    /// Current state, after every message queued before this call.
    ///
    /// # Errors
    ///
    /// Returns `Error::EngineStopped` if the engine loop has exited.
    pub async fn snapshot(&self) -> Result<SuggestionSnapshot> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(EngineMessage::Snapshot(reply_tx))
            .map_err(|_| Error::EngineStopped)?;
        reply_rx.await.map_err(|_| Error::EngineStopped)
    }

    /// Stop the engine loop. Lookups still in flight are abandoned.
    pub fn shutdown(&self) {
        let _ = self.tx.send(EngineMessage::Shutdown);
    }
}
