//! The orchestrator: owns the reducer loop and the reactive surfaces.
//!
//! `AppCore` wires the whole core together: one unbounded intent channel
//! feeds one spawned reducer loop (UI input and executor results share it,
//! which is what makes state single-writer and marshals async results onto
//! the state-owning context); the loop publishes each new state to a
//! `watch` channel and routes effects: presentation effects to broadcast
//! channels, session persistence straight to the cache, everything else to
//! the effect executor. Effects are routed before the state is published,
//! so an observer woken by the watch channel sees the cache already
//! committed.
//!
//! ```text
//! send(Intent) ─filter─► intent mpsc ─► reducer loop ─► watch<AppState>
//!                              ▲              │
//!                              │              ├─ Navigate/ShowToast ─► broadcast
//!                              │              ├─ PersistSession ─► session cache
//!                         executor ◄──────────┘  async effects
//! ```

use crate::config::AppConfig;
use crate::effect::{Effect, NavigationTarget, Toast};
use crate::executor::EffectExecutor;
use crate::input::{debounce_loop, InputFilter, TextField};
use crate::intent::Intent;
use crate::reducer::{reduce, ReducerEnv};
use crate::resolve::{ResolveFault, ResolverChain};
use crate::state::AppState;
use crate::usecases::{AuthBoundary, ProfileBoundary, UseCases};
use halo_core::{RequestIdSource, UuidRequestIds};
use halo_session::SessionCache;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

/// Everything [`AppCore::start`] needs injected.
pub struct AppDeps {
    auth: Arc<dyn AuthBoundary>,
    profile: Arc<dyn ProfileBoundary>,
    session: Arc<SessionCache>,
    ids: Arc<dyn RequestIdSource>,
    resolvers: Vec<Arc<dyn ResolveFault>>,
}

impl AppDeps {
    /// Build with production defaults: random request ids and the standard
    /// resolver chain.
    pub fn new(
        auth: Arc<dyn AuthBoundary>,
        profile: Arc<dyn ProfileBoundary>,
        session: Arc<SessionCache>,
    ) -> Self {
        Self {
            auth,
            profile,
            session,
            ids: Arc::new(UuidRequestIds),
            resolvers: Vec::new(),
        }
    }

    /// Substitute the request-id source (deterministic ids in tests).
    pub fn with_request_ids(mut self, ids: Arc<dyn RequestIdSource>) -> Self {
        self.ids = ids;
        self
    }

    /// Add a feature resolver consulted ahead of the standard chain.
    pub fn with_resolver(mut self, resolver: Arc<dyn ResolveFault>) -> Self {
        self.resolvers.push(resolver);
        self
    }
}

/// Sender side of a bound text input; see [`AppCore::bind_text_input`].
pub struct TextInput {
    edits: mpsc::UnboundedSender<String>,
}

impl TextInput {
    /// Report the field's new contents.
    pub fn edit(&self, value: impl Into<String>) {
        let _ = self.edits.send(value.into());
    }
}

/// The headless application core.
pub struct AppCore {
    filter: Arc<InputFilter>,
    intent_tx: mpsc::UnboundedSender<Intent>,
    state_rx: watch::Receiver<AppState>,
    nav_tx: broadcast::Sender<NavigationTarget>,
    toast_tx: broadcast::Sender<Toast>,
    executor: Arc<EffectExecutor>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    debounce_window: Duration,
    closed: Arc<AtomicBool>,
}

impl AppCore {
    /// Wire and start the core. The returned handle is the public surface;
    /// the reducer loop runs until [`AppCore::shutdown`] or drop.
    pub fn start(config: AppConfig, deps: AppDeps) -> Arc<Self> {
        let mut chain = ResolverChain::standard();
        for resolver in deps.resolvers.into_iter().rev() {
            chain.prepend_resolver(resolver);
        }
        let env = ReducerEnv::new(deps.ids, Arc::new(chain));

        let session = deps.session.clone();
        let usecases = Arc::new(UseCases::new(deps.auth, deps.profile, deps.session));
        let (intent_tx, mut intent_rx) = mpsc::unbounded_channel();
        let executor = Arc::new(EffectExecutor::new(usecases, intent_tx.clone()));

        let (state_tx, state_rx) = watch::channel(AppState::default());
        let capacity = config.ui_event_capacity.max(1);
        let (nav_tx, _) = broadcast::channel(capacity);
        let (toast_tx, _) = broadcast::channel(capacity);

        let loop_executor = executor.clone();
        let loop_nav = nav_tx.clone();
        let loop_toast = toast_tx.clone();
        let reducer_loop = tokio::spawn(async move {
            let mut state = AppState::default();
            while let Some(intent) = intent_rx.recv().await {
                trace!(intent = intent.description(), "reducing");
                let effects = reduce(&mut state, intent, &env);
                for effect in effects {
                    match effect {
                        Effect::Navigate(target) => {
                            let _ = loop_nav.send(target);
                        }
                        Effect::ShowToast(toast) => {
                            let _ = loop_toast.send(toast);
                        }
                        // Committed here, on the single intent-ordered loop,
                        // so only an accepted redemption ever reaches the
                        // cache and writes land in reduce order.
                        Effect::PersistSession { credential } => {
                            if let Err(e) = session.update(credential).await {
                                warn!(
                                    error = %e,
                                    "redeemed session could not be persisted; continuing in memory"
                                );
                            }
                        }
                        other => loop_executor.perform(other),
                    }
                }
                // Publish after routing, so a state observer never sees
                // `authenticated` ahead of the cache commit.
                let _ = state_tx.send(state.clone());
            }
        });

        Arc::new(Self {
            filter: Arc::new(InputFilter::new(config.submit_throttle)),
            intent_tx,
            state_rx,
            nav_tx,
            toast_tx,
            executor,
            tasks: Mutex::new(vec![reducer_loop]),
            debounce_window: config.debounce_window,
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Feed one intent through the input filter into the reducer loop.
    pub fn send(&self, intent: Intent) {
        if self.closed.load(Ordering::SeqCst) {
            debug!(intent = intent.description(), "core is shut down; dropping");
            return;
        }
        if !self.filter.admit(&intent) {
            return;
        }
        let _ = self.intent_tx.send(intent);
    }

    /// Watch receiver over the state; updated after every reduce.
    pub fn state(&self) -> watch::Receiver<AppState> {
        self.state_rx.clone()
    }

    /// The latest published state.
    pub fn current_state(&self) -> AppState {
        self.state_rx.borrow().clone()
    }

    /// Subscribe to navigation requests.
    pub fn navigation(&self) -> broadcast::Receiver<NavigationTarget> {
        self.nav_tx.subscribe()
    }

    /// Subscribe to one-off toasts.
    pub fn toasts(&self) -> broadcast::Receiver<Toast> {
        self.toast_tx.subscribe()
    }

    /// Bind a text field: edits reported through the returned handle are
    /// debounced, then fed through the same filter and channel as `send`.
    pub fn bind_text_input(&self, field: TextField) -> TextInput {
        let (edits_tx, edits_rx) = mpsc::unbounded_channel();
        let filter = self.filter.clone();
        let intent_tx = self.intent_tx.clone();
        let closed = self.closed.clone();
        let task = tokio::spawn(debounce_loop(
            edits_rx,
            self.debounce_window,
            move |value: String| {
                let intent = field.intent(value);
                if !closed.load(Ordering::SeqCst) && filter.admit(&intent) {
                    let _ = intent_tx.send(intent);
                }
            },
        ));
        self.tasks.lock().push(task);
        TextInput { edits: edits_tx }
    }

    /// Stop the core: cancel in-flight work, stop the reducer loop and
    /// bindings, and drop any intent sent afterwards.
    pub fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.executor.cancel_all();
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
    }
}

impl Drop for AppCore {
    fn drop(&mut self) {
        self.shutdown();
    }
}
