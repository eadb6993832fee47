//! The effect executor: the only place async work starts.
//!
//! Async effects run as spawned tasks keyed by their [`OpSlot`]. Starting
//! work on an occupied slot flips the previous task's cancellation flag
//! (cooperative latest-wins; superseded work is never hard-aborted, it runs
//! to its join point and goes silent). Both the flag flip and the
//! post-await flag check happen under the slot-map lock, so at most one
//! result per superseded chain ever reaches the intent channel — and that
//! channel feeds the single reducer loop, which is how results are
//! marshaled back onto the state-owning context.
//!
//! The executor never constructs a [`halo_core::RequestId`]; it copies the
//! id from the effect onto the result intent unchanged.

use crate::effect::{Effect, LogEvent, LogLevel, OpSlot};
use crate::intent::{Intent, InternalIntent};
use crate::usecases::UseCases;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, trace, warn};

struct InFlight {
    request: halo_core::RequestId,
    cancel: watch::Sender<bool>,
}

/// Runs async effects and reports their results as `Internal` intents.
pub struct EffectExecutor {
    usecases: Arc<UseCases>,
    send: mpsc::UnboundedSender<Intent>,
    in_flight: Mutex<HashMap<OpSlot, InFlight>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl EffectExecutor {
    /// Build over the use cases and the intent channel back into the
    /// reducer loop.
    pub fn new(usecases: Arc<UseCases>, send: mpsc::UnboundedSender<Intent>) -> Self {
        Self {
            usecases,
            send,
            in_flight: Mutex::new(HashMap::new()),
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Perform one effect.
    ///
    /// `Log` effects execute synchronously and produce no intent.
    /// Presentation and session-persist effects should have been routed by
    /// the orchestrator before reaching here; they are ignored with a debug
    /// log.
    pub fn perform(self: &Arc<Self>, effect: Effect) {
        match effect {
            Effect::Log(event) => emit_log(&event),
            Effect::Navigate(_) | Effect::ShowToast(_) | Effect::PersistSession { .. } => {
                debug!(?effect, "orchestrator-routed effect reached the executor; ignoring");
            }
            Effect::RequestCode { request, email } => {
                let usecases = self.usecases.clone();
                self.launch(OpSlot::Login, request, async move {
                    let result = usecases.request_code.run(&email).await;
                    Intent::Internal(InternalIntent::CodeRequestFinished { request, result })
                });
            }
            Effect::RedeemCode {
                request,
                email,
                code,
            } => {
                let usecases = self.usecases.clone();
                self.launch(OpSlot::Login, request, async move {
                    let result = usecases.redeem_code.run(&email, &code).await;
                    Intent::Internal(InternalIntent::RedeemFinished { request, result })
                });
            }
            Effect::RedeemGrant { request, grant } => {
                let usecases = self.usecases.clone();
                self.launch(OpSlot::Login, request, async move {
                    let result = usecases.redeem_grant.run(&grant).await;
                    Intent::Internal(InternalIntent::RedeemFinished { request, result })
                });
            }
            Effect::LoadProfile { request } => {
                let usecases = self.usecases.clone();
                self.launch(OpSlot::Profile, request, async move {
                    let result = usecases.load_profile.run().await;
                    Intent::Internal(InternalIntent::ProfileLoadFinished { request, result })
                });
            }
            Effect::SaveProfile { request, draft } => {
                let usecases = self.usecases.clone();
                self.launch(OpSlot::Profile, request, async move {
                    let result = usecases.save_profile.run(&draft).await;
                    Intent::Internal(InternalIntent::ProfileSaveFinished { request, result })
                });
            }
            Effect::SignOut { request } => {
                let usecases = self.usecases.clone();
                self.launch(OpSlot::Session, request, async move {
                    let result = usecases.sign_out.run().await;
                    Intent::Internal(InternalIntent::SignOutFinished { request, result })
                });
            }
        }
    }

    /// Cancel every in-flight operation and abort its task.
    pub fn cancel_all(&self) {
        for (_, flight) in self.in_flight.lock().drain() {
            let _ = flight.cancel.send(true);
        }
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
    }

    fn launch<F>(self: &Arc<Self>, slot: OpSlot, request: halo_core::RequestId, operation: F)
    where
        F: Future<Output = Intent> + Send + 'static,
    {
        let (cancel_tx, cancel_rx) = watch::channel(false);

        // The slot entry is replaced before spawning, so a completing task
        // can never race the insertion of its successor.
        {
            let mut in_flight = self.in_flight.lock();
            if let Some(previous) = in_flight.insert(
                slot,
                InFlight {
                    request,
                    cancel: cancel_tx,
                },
            ) {
                let _ = previous.cancel.send(true);
                debug!(
                    ?slot,
                    superseded = %previous.request,
                    by = %request,
                    "superseding in-flight operation"
                );
            }
        }

        let executor = self.clone();
        let handle = tokio::spawn(async move {
            let intent = operation.await;

            // Single post-await join point. The cancellation check shares
            // the slot-map lock with the flag flip in `launch`, so a
            // superseded task can never slip a send past its successor.
            let live = {
                let mut in_flight = executor.in_flight.lock();
                if *cancel_rx.borrow() {
                    false
                } else {
                    if in_flight
                        .get(&slot)
                        .is_some_and(|flight| flight.request == request)
                    {
                        in_flight.remove(&slot);
                    }
                    true
                }
            };

            if live {
                let _ = executor.send.send(intent);
            } else {
                debug!(%request, ?slot, "operation superseded; dropping result");
            }
        });
        // Reap finished tasks before recording the new one, so the handle
        // list stays bounded by the number of genuinely in-flight tasks.
        let mut handles = self.handles.lock();
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
    }
}

impl Drop for EffectExecutor {
    fn drop(&mut self) {
        for (_, flight) in self.in_flight.lock().drain() {
            let _ = flight.cancel.send(true);
        }
        for handle in self.handles.lock().drain(..) {
            handle.abort();
        }
    }
}

/// Map a [`LogEvent`] onto the matching `tracing` macro.
fn emit_log(event: &LogEvent) {
    match event.level {
        LogLevel::Trace => trace!("{}", event.message),
        LogLevel::Debug => debug!("{}", event.message),
        LogLevel::Info => info!("{}", event.message),
        LogLevel::Warn => warn!("{}", event.message),
        LogLevel::Error => error!("{}", event.message),
    }
}
