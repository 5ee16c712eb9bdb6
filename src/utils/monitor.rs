//! Process resource sampling around the measurement phases.
//!
//! The series phase re-evaluates every size from scratch and keeps the
//! recursion stack of the deepest size alive, so it is where resident memory
//! peaks. The engine opens a phase around it and samples from the progress
//! callback, so the reported peak covers the inside of the loop and not just
//! its endpoints.

use std::time::Duration;

/// Resident memory and CPU for one phase of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    pub phase: String,
    pub start_rss_mb: u64,
    pub end_rss_mb: u64,
    pub peak_rss_mb: u64,
    pub samples: u64,
    pub cpu_usage: f32,
    pub elapsed: Duration,
}

impl PhaseReport {
    pub fn growth_mb(&self) -> u64 {
        self.peak_rss_mb.saturating_sub(self.start_rss_mb)
    }
}

#[cfg(feature = "cli")]
pub use sampled::{PhaseMark, SystemMonitor};

#[cfg(not(feature = "cli"))]
pub use noop::{PhaseMark, SystemMonitor};

#[cfg(feature = "cli")]
mod sampled {
    use super::PhaseReport;
    use std::sync::Mutex;
    use std::time::Instant;
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, RefreshKind, System};

    /// Opaque start marker returned by [`SystemMonitor::begin_phase`].
    #[derive(Debug)]
    pub struct PhaseMark {
        phase: String,
        start_rss_mb: u64,
        started: Instant,
    }

    #[derive(Debug, Default)]
    struct Peaks {
        run_mb: u64,
        phase_mb: u64,
        phase_samples: u64,
    }

    pub struct SystemMonitor {
        system: Mutex<System>,
        pid: Option<Pid>,
        started: Instant,
        peaks: Mutex<Peaks>,
        enabled: bool,
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            let pid = match sysinfo::get_current_pid() {
                Ok(pid) => Some(pid),
                Err(e) => {
                    tracing::warn!("System monitor cannot resolve current PID: {}", e);
                    None
                }
            };

            Self {
                system: Mutex::new(System::new_with_specifics(RefreshKind::nothing())),
                pid,
                started: Instant::now(),
                peaks: Mutex::new(Peaks::default()),
                enabled,
            }
        }

        pub fn is_enabled(&self) -> bool {
            self.enabled
        }

        /// Resident memory in MB and CPU percentage of this process.
        fn read_process(&self) -> Option<(u64, f32)> {
            let pid = self.pid?;
            let mut system = self.system.lock().ok()?;
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[pid]),
                true,
                ProcessRefreshKind::nothing().with_memory().with_cpu(),
            );
            let process = system.process(pid)?;
            Some((process.memory() / 1024 / 1024, process.cpu_usage()))
        }

        /// Takes one sample and folds it into the run and phase peaks.
        pub fn record(&self) -> Option<u64> {
            if !self.enabled {
                return None;
            }
            let (rss_mb, _) = self.read_process()?;
            let mut peaks = self.peaks.lock().ok()?;
            peaks.run_mb = peaks.run_mb.max(rss_mb);
            peaks.phase_mb = peaks.phase_mb.max(rss_mb);
            peaks.phase_samples += 1;
            Some(rss_mb)
        }

        pub fn begin_phase(&self, phase: &str) -> Option<PhaseMark> {
            if !self.enabled {
                return None;
            }
            let (start_rss_mb, _) = self.read_process()?;
            {
                let mut peaks = self.peaks.lock().ok()?;
                peaks.run_mb = peaks.run_mb.max(start_rss_mb);
                peaks.phase_mb = start_rss_mb;
                peaks.phase_samples = 1;
            }
            Some(PhaseMark {
                phase: phase.to_string(),
                start_rss_mb,
                started: Instant::now(),
            })
        }

        /// Closes the phase opened by `mark` and logs its memory profile.
        pub fn end_phase(&self, mark: Option<PhaseMark>) -> Option<PhaseReport> {
            let mark = mark?;
            let end_rss_mb = self.record()?;
            let (_, cpu_usage) = self.read_process()?;
            let peaks = self.peaks.lock().ok()?;

            let report = PhaseReport {
                phase: mark.phase,
                start_rss_mb: mark.start_rss_mb,
                end_rss_mb,
                peak_rss_mb: peaks.phase_mb,
                samples: peaks.phase_samples,
                cpu_usage,
                elapsed: mark.started.elapsed(),
            };
            tracing::info!(
                "📊 {} - RSS: {}MB -> {}MB, Peak: {}MB (+{}MB over {} samples), CPU: {:.1}%, Time: {:?}",
                report.phase,
                report.start_rss_mb,
                report.end_rss_mb,
                report.peak_rss_mb,
                report.growth_mb(),
                report.samples,
                report.cpu_usage,
                report.elapsed
            );
            Some(report)
        }

        pub fn log_final_stats(&self) {
            if !self.enabled {
                return;
            }
            self.record();
            if let Ok(peaks) = self.peaks.lock() {
                tracing::info!(
                    "📊 Final Stats - Total Time: {:?}, Peak RSS: {}MB",
                    self.started.elapsed(),
                    peaks.run_mb
                );
            }
        }
    }

    impl Default for SystemMonitor {
        fn default() -> Self {
            Self::new(false)
        }
    }
}

// No-op monitor when sysinfo is not compiled in
#[cfg(not(feature = "cli"))]
mod noop {
    use super::PhaseReport;

    #[derive(Debug)]
    pub struct PhaseMark;

    #[derive(Default)]
    pub struct SystemMonitor;

    impl SystemMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn record(&self) -> Option<u64> {
            None
        }

        pub fn begin_phase(&self, _phase: &str) -> Option<PhaseMark> {
            None
        }

        pub fn end_phase(&self, _mark: Option<PhaseMark>) -> Option<PhaseReport> {
            None
        }

        pub fn log_final_stats(&self) {}
    }
}
