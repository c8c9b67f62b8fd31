use crate::{
    cpu::clamp_percent,
    history::SharedHistory,
    memory::compute_ram_percent,
    provider::MetricProvider,
    rate::RateTracker,
};
use meter_core::{MetricKind, Readings, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Current value and rolling history of one metric.
#[derive(Debug, Clone)]
pub struct MetricState {
    current: f32,
    history: SharedHistory<f32>,
}

impl MetricState {
    fn new(capacity: usize) -> Self {
        Self { current: 0.0, history: SharedHistory::new(capacity) }
    }

    fn record(&mut self, value: f32) {
        self.current = value;
        self.history.push(value);
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    /// Handle to the history; clones share the same buffer.
    pub fn history(&self) -> &SharedHistory<f32> {
        &self.history
    }
}

/// The provider call of one metric, possibly still running on the blocking
/// pool from an earlier tick.
///
/// At most one call per metric exists at a time: a call that overran its
/// budget is awaited again on the next tick rather than replaced.
struct Acquisition<T> {
    kind:    MetricKind,
    pending: Option<JoinHandle<Result<T>>>,
}

impl<T: Send + 'static> Acquisition<T> {
    fn new(kind: MetricKind) -> Self {
        Self { kind, pending: None }
    }

    /// Wait up to `budget` for a reading.  `read` only runs if no earlier
    /// call is still outstanding.
    async fn run<F>(&mut self, budget: Duration, read: F) -> Option<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let kind = self.kind;
        if self.pending.is_some() {
            debug!(metric = %kind, "previous provider call still running; waiting on it");
        }
        // The handle stays in `self` while awaited, so dropping this future
        // mid-tick does not lose track of the call.
        let handle = self
            .pending
            .get_or_insert_with(|| tokio::task::spawn_blocking(read));

        let finished = match timeout(budget, handle).await {
            Ok(finished) => finished,
            Err(_) => {
                debug!(metric = %kind, ?budget, "provider timed out; keeping previous value");
                return None;
            }
        };
        self.pending = None;

        match finished {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                debug!(metric = %kind, "provider failed: {e}; keeping previous value");
                None
            }
            Err(e) => {
                warn!(metric = %kind, "provider task aborted: {e}; keeping previous value");
                None
            }
        }
    }

    fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Wait until `deadline` for the outstanding call, discarding its result.
    async fn settle(&mut self, deadline: tokio::time::Instant) -> bool {
        let Some(handle) = self.pending.as_mut() else {
            return true;
        };
        if tokio::time::timeout_at(deadline, handle).await.is_err() {
            return false;
        }
        self.pending = None;
        true
    }
}

/// Produces one sample per metric per tick.
///
/// The three acquisitions run concurrently on the blocking pool, each under
/// the same time budget.  A metric whose provider fails or runs late keeps
/// its previous value for the tick; the others are unaffected.
pub struct MetricSampler {
    provider: Arc<dyn MetricProvider>,
    budget:   Duration,
    cpu:      MetricState,
    ram:      MetricState,
    net:      MetricState,
    net_rate: RateTracker,
    cpu_call: Acquisition<f64>,
    ram_call: Acquisition<f32>,
    net_call: Acquisition<(u64, Instant)>,
}

impl MetricSampler {
    pub fn new(provider: Arc<dyn MetricProvider>, capacity: usize, budget: Duration) -> Self {
        Self {
            provider,
            budget,
            cpu:      MetricState::new(capacity),
            ram:      MetricState::new(capacity),
            net:      MetricState::new(capacity),
            net_rate: RateTracker::new(),
            cpu_call: Acquisition::new(MetricKind::Cpu),
            ram_call: Acquisition::new(MetricKind::Ram),
            net_call: Acquisition::new(MetricKind::Network),
        }
    }

    /// Per-metric time budget of a tick.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Sample every metric once and append the results to their histories.
    pub async fn tick(&mut self) -> Readings {
        let cpu_provider = Arc::clone(&self.provider);
        let ram_provider = Arc::clone(&self.provider);
        let net_provider = Arc::clone(&self.provider);
        let budget = self.budget;

        let (cpu, ram, net) = tokio::join!(
            self.cpu_call.run(budget, move || cpu_provider.read_cpu_percent()),
            self.ram_call.run(budget, move || read_ram_percent(&*ram_provider)),
            self.net_call.run(budget, move || {
                let total = net_provider
                    .list_active_network_interfaces()?
                    .iter()
                    .fold(0u64, |acc, i| acc.saturating_add(i.total()));
                Ok((total, Instant::now()))
            }),
        );

        let cpu = cpu.map(clamp_percent).unwrap_or(self.cpu.current);
        let ram = ram.unwrap_or(self.ram.current);
        let net = match net {
            Some((total, observed_at)) => {
                let rate = self.net_rate.sample(total, observed_at) as f32;
                if rate.is_finite() { rate.max(0.0) } else { 0.0 }
            }
            None => self.net.current,
        };

        self.cpu.record(cpu);
        self.ram.record(ram);
        self.net.record(net);

        Readings { cpu, ram, net }
    }

    /// Number of provider calls still running from earlier ticks (0–3).
    pub fn pending_calls(&self) -> usize {
        [self.cpu_call.is_pending(), self.ram_call.is_pending(), self.net_call.is_pending()]
            .into_iter()
            .filter(|&pending| pending)
            .count()
    }

    /// Wait up to `limit` for outstanding provider calls to finish; their
    /// results are discarded.  Returns `true` when none is left running.
    ///
    /// Blocking calls cannot be interrupted, so a provider stuck for longer
    /// than `limit` stays pending.
    pub async fn settle(&mut self, limit: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + limit;
        let (cpu, ram, net) = tokio::join!(
            self.cpu_call.settle(deadline),
            self.ram_call.settle(deadline),
            self.net_call.settle(deadline),
        );
        cpu && ram && net
    }

    pub fn state(&self, kind: MetricKind) -> &MetricState {
        match kind {
            MetricKind::Cpu     => &self.cpu,
            MetricKind::Ram     => &self.ram,
            MetricKind::Network => &self.net,
        }
    }

    /// Shorthand for `state(kind).history()`.
    pub fn history(&self, kind: MetricKind) -> &SharedHistory<f32> {
        self.state(kind).history()
    }

    /// Latest values, without sampling.
    pub fn current(&self) -> Readings {
        Readings {
            cpu: self.cpu.current,
            ram: self.ram.current,
            net: self.net.current,
        }
    }
}

fn read_ram_percent(provider: &dyn MetricProvider) -> Result<f32> {
    let total = provider.read_total_memory_mb()?;
    let available = provider.read_available_memory_mb()?;
    Ok(compute_ram_percent(total, available))
}
