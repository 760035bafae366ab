//! Scripted network probe for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::network::RawNetworkState;
use crate::traits::{NetworkProbe, ProbeError};

type Outcome = Result<RawNetworkState, ProbeError>;

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<Outcome>,
    last: Option<Outcome>,
    ip_address: Option<String>,
    delay: Option<Duration>,
}

/// Network probe that replays a scripted sequence of outcomes.
///
/// Each query takes the next outcome; once the script runs out the last
/// outcome repeats. Queries on an empty script fail with
/// [`ProbeError::Unavailable`].
///
/// # Example
///
/// ```ignore
/// use netkit::adapters::mock::ScriptedProbe;
/// use netkit::network;
///
/// let probe = ScriptedProbe::sequence(&[true, false]);
/// assert!(network::is_online(&probe).await);
/// assert!(!network::is_online(&probe).await);
/// assert!(!network::is_online(&probe).await);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedProbe {
    script: Arc<Mutex<Script>>,
    polls: Arc<AtomicUsize>,
    active: Arc<AtomicUsize>,
    max_active: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a sequence of connected / disconnected states.
    pub fn sequence(connected: &[bool]) -> Self {
        let probe = Self::new();
        for &is_connected in connected {
            probe.push_connected(is_connected);
        }
        probe
    }

    pub fn push_state(&self, state: RawNetworkState) {
        self.script().queue.push_back(Ok(state));
    }

    pub fn push_connected(&self, is_connected: bool) {
        self.push_state(if is_connected {
            RawNetworkState::connected(None)
        } else {
            RawNetworkState::disconnected()
        });
    }

    pub fn push_failure(&self, error: ProbeError) {
        self.script().queue.push_back(Err(error));
    }

    pub fn set_ip_address(&self, ip_address: Option<String>) {
        self.script().ip_address = ip_address;
    }

    /// Make every state query take `delay`.
    pub fn set_delay(&self, delay: Duration) {
        self.script().delay = Some(delay);
    }

    /// Number of state queries so far.
    pub fn poll_count(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }

    /// Largest number of state queries that were running at once.
    pub fn max_concurrent_polls(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_outcome(&self) -> (Outcome, Option<Duration>) {
        let mut script = self.script();
        let outcome = match script.queue.pop_front() {
            Some(outcome) => {
                script.last = Some(outcome.clone());
                outcome
            }
            None => script.last.clone().unwrap_or(Err(ProbeError::Unavailable)),
        };
        (outcome, script.delay)
    }
}

#[async_trait]
impl NetworkProbe for ScriptedProbe {
    async fn network_state(&self) -> Result<RawNetworkState, ProbeError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        let (outcome, delay) = self.next_outcome();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.active.fetch_sub(1, Ordering::SeqCst);
        outcome
    }

    async fn ip_address(&self) -> Result<String, ProbeError> {
        self.script()
            .ip_address
            .clone()
            .ok_or(ProbeError::Unavailable)
    }
}
