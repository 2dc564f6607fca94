//! Latest-wins bookkeeping for cancellable effects.
//!
//! Every [`EffectId`] has a generation counter. Claiming the id bumps the
//! generation and aborts the tasks registered under the previous one; the
//! returned [`Lease`] stays valid only while its generation is the newest.
//! The Store checks [`Lease::is_current`] under its state write lock before
//! applying an action an effect produced, so an overtaken effect can never
//! reach the reducer.

use admin_console_core::effect::EffectId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::AbortHandle;

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    tasks: Vec<AbortHandle>,
}

/// Registry of effect ids and their current generation
#[derive(Debug, Default)]
pub(crate) struct LeaseRegistry {
    slots: Mutex<HashMap<EffectId, Slot>>,
}

impl LeaseRegistry {
    fn slots(&self) -> MutexGuard<'_, HashMap<EffectId, Slot>> {
        // A poisoned map is still consistent: every mutation is a single
        // field write or push.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Supersede everything in flight under `id` and hand out a new lease
    pub(crate) fn claim(self: &Arc<Self>, id: EffectId) -> Lease {
        let mut slots = self.slots();
        let slot = slots.entry(id).or_default();
        slot.generation += 1;

        let superseded = slot.tasks.len();
        for task in slot.tasks.drain(..) {
            task.abort();
        }
        if superseded > 0 {
            tracing::debug!(effect_id = %id, superseded, "Superseding in-flight effects");
            metrics::counter!("store.effects.superseded", "id" => id.as_str())
                .increment(superseded as u64);
        }

        Lease {
            id,
            generation: slot.generation,
            registry: Arc::clone(self),
        }
    }

    fn is_current(&self, id: EffectId, generation: u64) -> bool {
        self.slots()
            .get(&id)
            .is_some_and(|slot| slot.generation == generation)
    }

    fn attach(&self, id: EffectId, generation: u64, task: AbortHandle) {
        let mut slots = self.slots();
        match slots.get_mut(&id) {
            Some(slot) if slot.generation == generation => {
                slot.tasks.retain(|t| !t.is_finished());
                slot.tasks.push(task);
            },
            // Claimed again between spawn and attach
            _ => task.abort(),
        }
    }
}

/// A claim on an effect id for one generation
#[derive(Debug, Clone)]
pub(crate) struct Lease {
    id: EffectId,
    generation: u64,
    registry: Arc<LeaseRegistry>,
}

impl Lease {
    pub(crate) const fn id(&self) -> EffectId {
        self.id
    }

    /// Whether no newer effect has been started under this id
    pub(crate) fn is_current(&self) -> bool {
        self.registry.is_current(self.id, self.generation)
    }

    /// Register the task running this lease's effect so a later claim can abort it
    pub(crate) fn attach(&self, task: AbortHandle) {
        self.registry.attach(self.id, self.generation, task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const LOGIN: EffectId = EffectId::new("auth/login");
    const LOGOUT: EffectId = EffectId::new("auth/logout");

    #[test]
    fn newer_claim_supersedes_older_lease() {
        let registry = Arc::new(LeaseRegistry::default());

        let first = registry.claim(LOGIN);
        assert!(first.is_current());

        let second = registry.claim(LOGIN);
        assert!(!first.is_current());
        assert!(second.is_current());
    }

    #[test]
    fn ids_are_independent() {
        let registry = Arc::new(LeaseRegistry::default());

        let login = registry.claim(LOGIN);
        let _logout = registry.claim(LOGOUT);

        assert!(login.is_current());
    }

    #[tokio::test]
    async fn claim_aborts_attached_task() {
        let registry = Arc::new(LeaseRegistry::default());
        let lease = registry.claim(LOGIN);

        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        lease.attach(task.abort_handle());

        let _newer = registry.claim(LOGIN);

        let result = task.await;
        assert!(result.is_err_and(|e| e.is_cancelled()));
    }

    #[tokio::test]
    async fn attaching_a_stale_lease_aborts_immediately() {
        let registry = Arc::new(LeaseRegistry::default());
        let stale = registry.claim(LOGIN);
        let _newer = registry.claim(LOGIN);

        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        stale.attach(task.abort_handle());

        assert!(task.await.is_err_and(|e| e.is_cancelled()));
    }
}
