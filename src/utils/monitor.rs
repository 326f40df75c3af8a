use std::sync::Mutex;
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, RefreshKind, System};

#[derive(Debug, Clone)]
pub struct StageTiming {
    pub stage: String,
    pub elapsed: Duration,
    pub memory_mb: Option<u64>,
}

#[cfg(feature = "cli")]
struct ProcessSampler {
    system: System,
    pid: Pid,
}

#[cfg(feature = "cli")]
impl ProcessSampler {
    fn new() -> Option<Self> {
        let pid = sysinfo::get_current_pid().ok()?;
        let mut system = System::new_with_specifics(RefreshKind::everything());
        system.refresh_all();
        Some(Self { system, pid })
    }

    fn memory_mb(&mut self) -> Option<u64> {
        self.system.refresh_all();
        self.system
            .process(self.pid)
            .map(|process| process.memory() / 1024 / 1024)
    }
}

/// Records how long each import stage takes. Memory sampling is only
/// available with the `cli` feature and only when monitoring is enabled.
pub struct StageMonitor {
    enabled: bool,
    start_time: Instant,
    timings: Mutex<Vec<StageTiming>>,
    peak_memory: Mutex<u64>,
    #[cfg(feature = "cli")]
    sampler: Option<Mutex<ProcessSampler>>,
}

impl StageMonitor {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            start_time: Instant::now(),
            timings: Mutex::new(Vec::new()),
            peak_memory: Mutex::new(0),
            #[cfg(feature = "cli")]
            sampler: if enabled {
                ProcessSampler::new().map(Mutex::new)
            } else {
                None
            },
        }
    }

    #[cfg(feature = "cli")]
    fn sample_memory(&self) -> Option<u64> {
        let mut sampler = self.sampler.as_ref()?.lock().ok()?;
        let memory_mb = sampler.memory_mb()?;

        // 更新峰值記憶體
        if let Ok(mut peak) = self.peak_memory.lock() {
            if memory_mb > *peak {
                *peak = memory_mb;
            }
        }
        Some(memory_mb)
    }

    #[cfg(not(feature = "cli"))]
    fn sample_memory(&self) -> Option<u64> {
        None
    }

    pub fn record_stage(&self, stage: &str, started: Instant) {
        let timing = StageTiming {
            stage: stage.to_string(),
            elapsed: started.elapsed(),
            memory_mb: if self.enabled { self.sample_memory() } else { None },
        };

        if self.enabled {
            match timing.memory_mb {
                Some(memory) => tracing::info!(
                    "📊 {} - Time: {:?}, Memory: {}MB",
                    timing.stage,
                    timing.elapsed,
                    memory
                ),
                None => tracing::info!("📊 {} - Time: {:?}", timing.stage, timing.elapsed),
            }
        } else {
            tracing::debug!("{} finished in {:?}", timing.stage, timing.elapsed);
        }

        if let Ok(mut timings) = self.timings.lock() {
            timings.push(timing);
        }
    }

    pub fn timings(&self) -> Vec<StageTiming> {
        self.timings
            .lock()
            .map(|timings| timings.clone())
            .unwrap_or_default()
    }

    pub fn peak_memory_mb(&self) -> u64 {
        self.peak_memory.lock().map(|peak| *peak).unwrap_or(0)
    }

    pub fn log_final_stats(&self) {
        if !self.enabled {
            return;
        }
        tracing::info!(
            "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
            self.start_time.elapsed(),
            self.peak_memory_mb()
        );
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for StageMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_stages_in_order() {
        let monitor = StageMonitor::new(false);
        monitor.record_stage("extract", Instant::now());
        monitor.record_stage("transform", Instant::now());

        let stages: Vec<String> = monitor.timings().into_iter().map(|t| t.stage).collect();
        assert_eq!(stages, vec!["extract", "transform"]);
    }

    #[test]
    fn test_disabled_monitor_skips_memory_sampling() {
        let monitor = StageMonitor::default();
        monitor.record_stage("load", Instant::now());

        assert!(!monitor.is_enabled());
        assert!(monitor.timings()[0].memory_mb.is_none());
        assert_eq!(monitor.peak_memory_mb(), 0);
    }
}
