use crate::{memory::bytes_to_mb, network::is_loopback};
use meter_core::{MeterError, Result};
use std::sync::{Mutex, MutexGuard, PoisonError};
use sysinfo::{Networks, System};

/// Cumulative byte counters of one network interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceCounters {
    pub name:           String,
    pub bytes_received: u64,
    pub bytes_sent:     u64,
}

impl InterfaceCounters {
    /// Received plus sent.
    pub fn total(&self) -> u64 {
        self.bytes_received.saturating_add(self.bytes_sent)
    }
}

/// Host metric source.
///
/// Calls may block on the OS and may fail; the sampler runs them on the
/// blocking pool under a time budget and treats an error as "no new data".
pub trait MetricProvider: Send + Sync {
    /// Overall CPU utilisation in percent.
    fn read_cpu_percent(&self) -> Result<f64>;

    fn read_available_memory_mb(&self) -> Result<f64>;

    fn read_total_memory_mb(&self) -> Result<f64>;

    /// Counters of every active, non-loopback interface.
    fn list_active_network_interfaces(&self) -> Result<Vec<InterfaceCounters>>;
}

/// [`MetricProvider`] backed by `sysinfo`.
pub struct SysinfoProvider {
    system:   Mutex<System>,
    networks: Mutex<Networks>,
}

impl SysinfoProvider {
    pub fn new() -> Self {
        let mut system = System::new();
        // CPU usage is a delta between refreshes; prime the first one so the
        // first real reading is meaningful.
        system.refresh_cpu_usage();
        system.refresh_memory();

        Self {
            system:   Mutex::new(system),
            networks: Mutex::new(Networks::new_with_refreshed_list()),
        }
    }

    fn system(&self) -> MutexGuard<'_, System> {
        self.system.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SysinfoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricProvider for SysinfoProvider {
    fn read_cpu_percent(&self) -> Result<f64> {
        let mut sys = self.system();
        sys.refresh_cpu_usage();
        if sys.cpus().is_empty() {
            return Err(MeterError::Provider("no CPUs reported".into()));
        }
        Ok(sys.global_cpu_usage() as f64)
    }

    fn read_available_memory_mb(&self) -> Result<f64> {
        let mut sys = self.system();
        sys.refresh_memory();
        Ok(bytes_to_mb(sys.available_memory()))
    }

    fn read_total_memory_mb(&self) -> Result<f64> {
        Ok(bytes_to_mb(self.system().total_memory()))
    }

    fn list_active_network_interfaces(&self) -> Result<Vec<InterfaceCounters>> {
        let mut networks = self.networks.lock().unwrap_or_else(PoisonError::into_inner);
        networks.refresh(true); // true = drop interfaces that went away

        Ok(networks
            .iter()
            .filter(|(name, _)| !is_loopback(name))
            .map(|(name, data)| InterfaceCounters {
                name:           name.clone(),
                bytes_received: data.total_received(),
                bytes_sent:     data.total_transmitted(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interface_total_saturates() {
        let c = InterfaceCounters {
            name:           "eth0".into(),
            bytes_received: u64::MAX,
            bytes_sent:     10,
        };
        assert_eq!(c.total(), u64::MAX);
    }

    #[test]
    fn sysinfo_provider_excludes_loopback() {
        let provider = SysinfoProvider::new();
        let interfaces = provider.list_active_network_interfaces().unwrap();
        assert!(interfaces.iter().all(|i| !is_loopback(&i.name)));
    }

    #[test]
    fn sysinfo_memory_is_consistent() {
        let provider = SysinfoProvider::new();
        let total = provider.read_total_memory_mb().unwrap();
        let available = provider.read_available_memory_mb().unwrap();
        assert!(total >= 0.0);
        assert!(available >= 0.0);
    }
}
