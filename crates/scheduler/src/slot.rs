use meter_core::Indicator;
use std::sync::{Arc, PoisonError, RwLock};

/// Holds the indicator currently shown for one metric.
///
/// A new indicator is built completely before [`install`](Self::install)
/// swaps it in; the previous one is released only after the swap, and
/// readers holding an `Arc` keep theirs alive until they let go.
#[derive(Debug, Default)]
pub struct IndicatorSlot {
    current: RwLock<Option<Arc<Indicator>>>,
}

impl IndicatorSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the shown indicator.
    pub fn install(&self, next: Arc<Indicator>) {
        let previous = {
            let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
            guard.replace(next)
        };
        drop(previous);
    }

    /// The indicator currently shown, if any.
    pub fn current(&self) -> Option<Arc<Indicator>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use meter_core::{ChartImage, MetricKind};

    fn indicator(status: &str) -> Arc<Indicator> {
        Arc::new(Indicator {
            kind:       MetricKind::Cpu,
            image:      Arc::new(ChartImage::label_only(status)),
            status:     status.to_string(),
            updated_at: Local::now(),
        })
    }

    #[test]
    fn install_replaces_and_releases_previous() {
        let slot = IndicatorSlot::new();
        assert!(slot.current().is_none());

        let first = indicator("CPU: 1.0%");
        slot.install(Arc::clone(&first));
        assert_eq!(Arc::strong_count(&first), 2);

        slot.install(indicator("CPU: 2.0%"));
        assert_eq!(Arc::strong_count(&first), 1, "slot still holds the old indicator");
        assert_eq!(slot.current().unwrap().status, "CPU: 2.0%");
    }

    #[test]
    fn readers_keep_their_copy_alive() {
        let slot = IndicatorSlot::new();
        slot.install(indicator("CPU: 1.0%"));
        let held = slot.current().unwrap();
        slot.install(indicator("CPU: 2.0%"));
        assert_eq!(held.status, "CPU: 1.0%");
        assert_eq!(held.image.label(), "CPU: 1.0%");
    }
}
