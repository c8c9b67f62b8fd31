use crate::slot::IndicatorSlot;
use meter_core::{Indicator, Message, MetricKind, Presenter};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Keeps the latest indicator of each metric for on-demand readers
/// (a tray icon redraw, a tooltip query).
#[derive(Debug, Default)]
pub struct SlotPresenter {
    cpu:     IndicatorSlot,
    ram:     IndicatorSlot,
    network: IndicatorSlot,
}

impl SlotPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: MetricKind) -> &IndicatorSlot {
        match kind {
            MetricKind::Cpu     => &self.cpu,
            MetricKind::Ram     => &self.ram,
            MetricKind::Network => &self.network,
        }
    }

    /// Shorthand for `slot(kind).current()`.
    pub fn current(&self, kind: MetricKind) -> Option<Arc<Indicator>> {
        self.slot(kind).current()
    }
}

impl Presenter for SlotPresenter {
    fn present(&self, indicators: &[Arc<Indicator>]) {
        for indicator in indicators {
            self.slot(indicator.kind).install(Arc::clone(indicator));
        }
    }
}

/// Forwards each tick's indicators to an event loop as
/// [`Message::Indicators`].
///
/// Never waits: if the consumer has fallen behind, the update is dropped
/// (the next tick supersedes it anyway).
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    tx: mpsc::Sender<Message>,
}

impl ChannelPresenter {
    pub fn new(tx: mpsc::Sender<Message>) -> Self {
        Self { tx }
    }

    /// A presenter and the receiving end of its channel.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Message>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self::new(tx), rx)
    }
}

impl Presenter for ChannelPresenter {
    fn present(&self, indicators: &[Arc<Indicator>]) {
        match self.tx.try_send(Message::Indicators(indicators.to_vec())) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                debug!("presentation is lagging; dropping indicator update");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("presentation channel closed; dropping indicator update");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use meter_core::ChartImage;

    fn indicators() -> Vec<Arc<Indicator>> {
        MetricKind::ALL
            .iter()
            .map(|&kind| {
                Arc::new(Indicator {
                    kind,
                    image:      Arc::new(ChartImage::label_only(kind.title())),
                    status:     kind.title().to_string(),
                    updated_at: Local::now(),
                })
            })
            .collect()
    }

    #[test]
    fn slot_presenter_routes_by_kind() {
        let presenter = SlotPresenter::new();
        presenter.present(&indicators());
        for kind in MetricKind::ALL {
            assert_eq!(presenter.current(kind).unwrap().status, kind.title());
        }
    }

    #[tokio::test]
    async fn channel_presenter_drops_when_full() {
        let (presenter, mut rx) = ChannelPresenter::channel(1);
        presenter.present(&indicators());
        presenter.present(&indicators());

        assert!(matches!(rx.recv().await, Some(Message::Indicators(v)) if v.len() == 3));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn channel_presenter_tolerates_closed_receiver() {
        let (presenter, rx) = ChannelPresenter::channel(1);
        drop(rx);
        presenter.present(&indicators());
    }
}
