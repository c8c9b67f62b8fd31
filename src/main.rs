//! meter: CPU, RAM and network sparklines for the notification area.
//!
//! Headless build: the indicators are logged instead of drawn into a tray.
//! Run with:  `RUST_LOG=debug meter`

use anyhow::Result;
use meter_config::{default_path, load as load_config, ConfigWatcher, MeterConfig};
use meter_core::Message;
use meter_scheduler::{ChannelPresenter, RenderSettings, Scheduler};
use meter_system::SysinfoProvider;
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging. RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("meter v{} starting", env!("CARGO_PKG_VERSION"));

    let path = default_path();
    let mut config = load_config(&path).unwrap_or_else(|e| {
        warn!("{e}; using defaults");
        MeterConfig::default()
    });

    let provider = tokio::task::spawn_blocking(SysinfoProvider::new).await?;
    let (presenter, mut indicators) = ChannelPresenter::channel(4);
    let mut scheduler = Scheduler::from_config(&config, Arc::new(provider), Arc::new(presenter));
    let (_watcher, mut config_changes) = ConfigWatcher::spawn(&path);

    scheduler.start();

    loop {
        let message = tokio::select! {
            Some(msg) = indicators.recv() => msg,
            Some(()) = config_changes.recv() => Message::ConfigReloaded,
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    error!("cannot listen for Ctrl-C: {e}");
                }
                Message::Shutdown
            }
        };

        if handle(message, &scheduler, &mut config).is_break() {
            break;
        }
    }

    scheduler.stop().await;
    info!("meter stopped");
    Ok(())
}

fn handle(message: Message, scheduler: &Scheduler, config: &mut MeterConfig) -> ControlFlow<()> {
    match message {
        Message::Indicators(list) => {
            for indicator in list {
                debug!(metric = %indicator.kind, "{}", indicator.status);
            }
        }
        Message::ConfigReloaded => match load_config(default_path()) {
            Ok(cfg) => {
                if cfg.sampler != config.sampler {
                    warn!("[sampler] changes take effect after a restart");
                }
                scheduler.update_render_settings(RenderSettings::from_config(&cfg));
                *config = cfg;
                info!("Config reloaded");
            }
            Err(e) => warn!("Config reload failed: {e}"),
        },
        Message::Shutdown => {
            info!("Shutdown requested");
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}
