//! The periodic sample → render → present loop.
//!
//! One task owns the [`MetricSampler`] and the [`ChartRenderer`]; every tick
//! it samples all metrics, renders each history and hands the indicators to
//! the [`Presenter`].  [`Scheduler::stop`] cancels that task and waits for it,
//! then for any provider call still running on the blocking pool, so nothing
//! touches the sampler or the presenter once it returns.

pub mod presenter;
pub mod settings;
pub mod slot;

pub use presenter::{ChannelPresenter, SlotPresenter};
pub use settings::RenderSettings;
pub use slot::IndicatorSlot;

use chrono::Local;
use meter_config::MeterConfig;
use meter_core::{ChartImage, Indicator, MetricKind, Presenter, Readings};
use meter_renderer::{ChartRenderer, ChartRequest};
use meter_system::{network::normalize_throughput, overlay_text, status_text, MetricProvider, MetricSampler};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Upper bound on how long [`Scheduler::stop`] waits for provider calls that
/// are still running when the loop exits.
pub const DRAIN_LIMIT: Duration = Duration::from_secs(2);

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

struct Running {
    cancel: CancellationToken,
    /// Resolves to the sampler once the loop has exited.
    handle: JoinHandle<MetricSampler>,
}

/// Drives sampling and rendering on a fixed period.
pub struct Scheduler {
    period:      Duration,
    presenter:   Arc<dyn Presenter>,
    settings_tx: watch::Sender<RenderSettings>,
    /// Present while stopped; moved into the loop task while running.
    sampler:     Option<MetricSampler>,
    running:     Option<Running>,
}

impl Scheduler {
    pub fn new(
        sampler: MetricSampler,
        period: Duration,
        settings: RenderSettings,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let (settings_tx, _) = watch::channel(settings);
        Self {
            period,
            presenter,
            settings_tx,
            sampler: Some(sampler),
            running: None,
        }
    }

    /// Build the sampler and scheduler described by `config`.
    pub fn from_config(
        config: &MeterConfig,
        provider: Arc<dyn MetricProvider>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        let sampler = MetricSampler::new(
            provider,
            config.sampler.history_capacity,
            Duration::from_millis(config.sampler.timeout_ms),
        );
        Self::new(
            sampler,
            Duration::from_millis(config.sampler.interval_ms),
            RenderSettings::from_config(config),
            presenter,
        )
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// The sampler, while stopped.
    pub fn sampler(&self) -> Option<&MetricSampler> {
        self.sampler.as_ref()
    }

    /// Start ticking.  Does nothing if already running.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self) {
        if self.running.is_some() {
            debug!("scheduler already running");
            return;
        }
        let Some(sampler) = self.sampler.take() else {
            warn!("scheduler cannot start: its sampler was lost when the loop task failed");
            return;
        };

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            sampler,
            self.period,
            cancel.clone(),
            self.settings_tx.subscribe(),
            Arc::clone(&self.presenter),
        ));

        info!(period = ?self.period, "scheduler started");
        self.running = Some(Running { cancel, handle });
    }

    /// Stop ticking and wait for any in-flight tick to finish.
    ///
    /// Once this returns no tick is running and none will present again.
    /// Provider calls left over from the last tick are awaited for at most
    /// [`DRAIN_LIMIT`].
    pub async fn stop(&mut self) {
        let Some(Running { cancel, handle }) = self.running.take() else {
            return;
        };
        cancel.cancel();

        match handle.await {
            Ok(mut sampler) => {
                if !sampler.settle(DRAIN_LIMIT).await {
                    warn!(
                        pending = sampler.pending_calls(),
                        "provider calls still running after {DRAIN_LIMIT:?}; leaving them behind"
                    );
                }
                self.sampler = Some(sampler);
            }
            Err(e) => error!("scheduler loop task failed: {e}"),
        }
        info!("scheduler stopped");
    }

    /// Apply new colours, geometry or network scaling from the next tick on.
    pub fn update_render_settings(&self, settings: RenderSettings) {
        self.settings_tx.send_replace(settings);
    }
}

async fn run_loop(
    mut sampler: MetricSampler,
    period: Duration,
    cancel: CancellationToken,
    mut settings: watch::Receiver<RenderSettings>,
    presenter: Arc<dyn Presenter>,
) -> MetricSampler {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut renderer = ChartRenderer::default();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // Dropping an unfinished `tick` is safe: histories are only written
        // after every acquisition has come back, and a call still on the
        // blocking pool stays recorded in the sampler for `stop` to drain.
        let readings = tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            readings = sampler.tick() => readings,
        };

        let current = settings.borrow_and_update().clone();
        renderer.set_style(current.theme.style.clone());
        let indicators = render_all(&renderer, &sampler, &current, readings);

        if cancel.is_cancelled() {
            break;
        }
        presenter.present(&indicators);
    }

    sampler
}

fn render_all(
    renderer: &ChartRenderer,
    sampler: &MetricSampler,
    settings: &RenderSettings,
    readings: Readings,
) -> Vec<Arc<Indicator>> {
    MetricKind::ALL
        .iter()
        .map(|&kind| {
            let value = readings.get(kind);
            let mut samples = sampler.history(kind).snapshot();
            if kind == MetricKind::Network {
                samples = normalize_throughput(&samples, settings.net_scale_floor);
            }

            let status = status_text(kind, value);
            let caption = overlay_text(kind, value);
            let request = ChartRequest {
                samples: &samples,
                palette: settings.theme.palette(kind),
                caption: &caption,
                label:   &status,
            };

            let image = match renderer.render(request) {
                Ok(image) => image,
                Err(e) => {
                    if cfg!(debug_assertions) {
                        panic!("{kind} chart rendering failed: {e}");
                    }
                    error!(metric = %kind, "chart rendering failed: {e}; showing label only");
                    ChartImage::label_only(status.clone())
                }
            };

            Arc::new(Indicator {
                kind,
                image: Arc::new(image),
                status,
                updated_at: Local::now(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use meter_core::{Message, Result};
    use meter_system::InterfaceCounters;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

    /// Steady host: 25% CPU, half the RAM used, 1 MB/s of traffic.
    #[derive(Default)]
    struct SteadyProvider {
        bytes: AtomicU64,
    }

    impl MetricProvider for SteadyProvider {
        fn read_cpu_percent(&self) -> Result<f64> {
            Ok(25.0)
        }

        fn read_available_memory_mb(&self) -> Result<f64> {
            Ok(2_048.0)
        }

        fn read_total_memory_mb(&self) -> Result<f64> {
            Ok(4_096.0)
        }

        fn list_active_network_interfaces(&self) -> Result<Vec<InterfaceCounters>> {
            let rx = self.bytes.fetch_add(50_000, Ordering::SeqCst);
            Ok(vec![InterfaceCounters { name: "eth0".into(), bytes_received: rx, bytes_sent: 0 }])
        }
    }

    #[derive(Default)]
    struct CountingPresenter {
        calls: AtomicUsize,
    }

    impl Presenter for CountingPresenter {
        fn present(&self, indicators: &[Arc<Indicator>]) {
            assert_eq!(indicators.len(), 3);
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn scheduler(presenter: Arc<dyn Presenter>) -> Scheduler {
        let sampler = MetricSampler::new(
            Arc::new(SteadyProvider::default()),
            8,
            Duration::from_millis(200),
        );
        Scheduler::new(sampler, Duration::from_millis(20), RenderSettings::default(), presenter)
    }

    async fn wait_for(presenter: &CountingPresenter, calls: usize) {
        time::timeout(Duration::from_secs(5), async {
            while presenter.calls.load(Ordering::SeqCst) < calls {
                time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("scheduler never reached the expected tick count");
    }

    #[tokio::test]
    async fn ticks_present_every_metric() {
        let (presenter, mut rx) = ChannelPresenter::channel(8);
        let mut s = scheduler(Arc::new(presenter));
        s.start();

        let Some(Message::Indicators(first)) = rx.recv().await else {
            panic!("expected indicators");
        };
        let kinds: Vec<_> = first.iter().map(|i| i.kind).collect();
        assert_eq!(kinds, MetricKind::ALL);
        assert_eq!(first[0].status, "CPU: 25.0%");
        assert_eq!(first[1].status, "RAM: 50.0%");
        assert!(first[2].status.starts_with("Network: "));
        assert_eq!(first[0].image.width(), 32);
        assert_eq!(first[0].image.label(), "CPU: 25.0%");

        s.stop().await;
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_is_final() {
        let presenter = Arc::new(CountingPresenter::default());
        let mut s = scheduler(presenter.clone());
        assert_eq!(s.state(), SchedulerState::Stopped);

        s.start();
        s.start();
        assert_eq!(s.state(), SchedulerState::Running);
        assert!(s.sampler().is_none());

        wait_for(&presenter, 3).await;
        s.stop().await;
        assert_eq!(s.state(), SchedulerState::Stopped);

        let after_stop = presenter.calls.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(presenter.calls.load(Ordering::SeqCst), after_stop);

        // Stopping twice is harmless.
        s.stop().await;
    }

    #[tokio::test]
    async fn restart_keeps_history() {
        let presenter = Arc::new(CountingPresenter::default());
        let mut s = scheduler(presenter.clone());

        s.start();
        wait_for(&presenter, 2).await;
        s.stop().await;
        let before = s.sampler().unwrap().history(MetricKind::Cpu).len();
        assert!(before >= 2);

        s.start();
        wait_for(&presenter, presenter.calls.load(Ordering::SeqCst) + 2).await;
        s.stop().await;
        let after = s.sampler().unwrap().history(MetricKind::Cpu).len();
        assert!(after > before);
        assert!(after <= 8);
    }

    #[tokio::test]
    async fn render_settings_apply_on_next_tick() {
        let slots = Arc::new(SlotPresenter::new());
        let mut s = scheduler(slots.clone());

        let mut settings = RenderSettings::default();
        settings.theme.style.width = 16;
        settings.theme.style.height = 16;
        s.update_render_settings(settings);
        s.start();

        time::timeout(Duration::from_secs(5), async {
            while slots.current(MetricKind::Ram).is_none() {
                time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();
        s.stop().await;

        let ram = slots.current(MetricKind::Ram).unwrap();
        assert_eq!((ram.image.width(), ram.image.height()), (16, 16));
    }

    #[test]
    fn render_all_normalizes_network_history() {
        let sampler = MetricSampler::new(
            Arc::new(SteadyProvider::default()),
            4,
            Duration::from_millis(200),
        );
        sampler.history(MetricKind::Network).push(0.0);
        sampler.history(MetricKind::Network).push(2_000_000.0);
        let settings = RenderSettings { net_scale_floor: 1_000.0, ..RenderSettings::default() };
        let readings = Readings { cpu: 0.0, ram: 0.0, net: 2_000_000.0 };

        let indicators = render_all(&ChartRenderer::default(), &sampler, &settings, readings);
        let net = &indicators[2];
        assert_eq!(net.status, "Network: 2.0 MB/s");

        // Peak-scaled: the newest sample reaches the top row at the right edge.
        let palette = settings.theme.palette(MetricKind::Network);
        assert_eq!(net.image.pixel(31, 0), Some(palette.line.to_rgba()));
    }

    /// CPU readings take longer than several scheduler periods.
    #[derive(Default)]
    struct SluggishProvider {
        running: AtomicUsize,
    }

    impl MetricProvider for SluggishProvider {
        fn read_cpu_percent(&self) -> Result<f64> {
            self.running.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(150));
            self.running.fetch_sub(1, Ordering::SeqCst);
            Ok(60.0)
        }

        fn read_available_memory_mb(&self) -> Result<f64> {
            Ok(1_024.0)
        }

        fn read_total_memory_mb(&self) -> Result<f64> {
            Ok(4_096.0)
        }

        fn list_active_network_interfaces(&self) -> Result<Vec<InterfaceCounters>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn stop_mid_tick_waits_out_slow_provider() {
        let provider = Arc::new(SluggishProvider::default());
        let presenter = Arc::new(CountingPresenter::default());
        let sampler = MetricSampler::new(provider.clone(), 8, Duration::from_millis(100));
        let mut s = Scheduler::new(
            sampler,
            Duration::from_millis(20),
            RenderSettings::default(),
            presenter.clone(),
        );

        s.start();
        // The first tick is now blocked on the CPU reading.
        time::sleep(Duration::from_millis(30)).await;
        assert_eq!(provider.running.load(Ordering::SeqCst), 1);

        let started = std::time::Instant::now();
        s.stop().await;
        assert!(started.elapsed() < Duration::from_secs(1), "stop took {:?}", started.elapsed());
        assert_eq!(s.state(), SchedulerState::Stopped);

        assert_eq!(provider.running.load(Ordering::SeqCst), 0);
        assert_eq!(s.sampler().map(MetricSampler::pending_calls), Some(0));

        let presented = presenter.calls.load(Ordering::SeqCst);
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(presenter.calls.load(Ordering::SeqCst), presented);
        assert_eq!(provider.running.load(Ordering::SeqCst), 0);
    }
}
