use crate::core::harness::{self, Evaluator};
use crate::core::recursive::{on_recursion_stack, RecursionLimit};
use crate::core::report;
use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{SequenceParams, SeriesProgress, SingleRunReport, TimingSeries};
use crate::utils::error::{GeoError, Result};
use crate::utils::monitor::SystemMonitor;
use crate::utils::validation::validate_range;
use std::sync::Arc;

/// Everything produced by one engine run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub report: SingleRunReport,
    pub series: Vec<TimingSeries>,
    pub exported: Vec<String>,
}

/// Runs the single evaluation, the optional series and the exports for one
/// set of parameters.
///
/// Evaluations run on a thread whose stack is sized for the configured
/// recursion limit, so any runtime can host the engine.
pub struct BenchEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    monitor: Arc<SystemMonitor>,
}

impl<S: Storage, C: ConfigProvider> BenchEngine<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self::new_with_monitoring(storage, config, false)
    }

    pub fn new_with_monitoring(storage: S, config: C, monitor_enabled: bool) -> Self {
        Self {
            storage,
            config,
            monitor: Arc::new(SystemMonitor::new(monitor_enabled)),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    /// Parameters from the config, with `n` checked against `[1, max_n]`.
    pub fn params(&self) -> Result<SequenceParams> {
        let params = self.config.sequence_params();
        validate_range("n", params.n, 1, self.config.max_n())?;
        Ok(params)
    }

    fn evaluator(&self) -> Evaluator {
        Evaluator::new(RecursionLimit::new(self.config.recursion_limit()))
    }

    pub async fn run(&self) -> Result<RunSummary> {
        self.run_with_progress(|_| true).await
    }

    /// Single run, then the series when enabled, then the exports.
    ///
    /// `on_progress` is forwarded to every series measurement; returning
    /// `false` cancels the series in progress.
    pub async fn run_with_progress<F>(&self, on_progress: F) -> Result<RunSummary>
    where
        F: FnMut(SeriesProgress) -> bool + Send + 'static,
    {
        let params = self.params()?;

        let report = self.run_single(&params).await?;
        let series = if self.config.series_enabled() {
            self.run_series(&params, on_progress).await?
        } else {
            Vec::new()
        };

        let exported = self.export(&params, &report, &series).await?;
        self.monitor.log_final_stats();

        Ok(RunSummary {
            report,
            series,
            exported,
        })
    }

    /// Every configured operation once per strategy at `params.n`.
    pub async fn run_single(&self, params: &SequenceParams) -> Result<SingleRunReport> {
        let evaluator = self.evaluator();
        let operations = self.config.operations().operations();

        tracing::info!(
            "🚀 Evaluating a = {}, r = {}, n = {} ({} operation(s))",
            params.a,
            params.r,
            params.n,
            operations.len()
        );

        let phase = self.monitor.begin_phase("Single run");
        let limit = evaluator.recursion_limit();
        let worker_params = params.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            on_recursion_stack(limit, move || {
                harness::run_single(&evaluator, &operations, &worker_params)
            })
        })
        .await;
        self.monitor.end_phase(phase);

        let report = outcome.map_err(|e| GeoError::WorkerError {
            message: e.to_string(),
        })??;

        for line in report::format_single_run(&report) {
            tracing::debug!("{}", line);
        }

        Ok(report)
    }

    /// Timing series `1..=params.n` for every configured operation.
    ///
    /// With monitoring on, memory is sampled about ten times per operation
    /// from inside the loop.
    pub async fn run_series<F>(
        &self,
        params: &SequenceParams,
        mut on_progress: F,
    ) -> Result<Vec<TimingSeries>>
    where
        F: FnMut(SeriesProgress) -> bool + Send + 'static,
    {
        let evaluator = self.evaluator();
        let operations = self.config.operations().operations();

        let phase = self.monitor.begin_phase("Series");
        let monitor = Arc::clone(&self.monitor);
        let stride = (params.n / 10).max(1);
        let mut on_progress = move |progress: SeriesProgress| {
            if monitor.is_enabled() && (progress.completed % stride == 0 || progress.is_done()) {
                monitor.record();
            }
            on_progress(progress)
        };

        let limit = evaluator.recursion_limit();
        let worker_params = params.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            on_recursion_stack(limit, move || {
                let mut series = Vec::with_capacity(operations.len());
                for &operation in &operations {
                    tracing::info!(
                        "📈 Measuring {} series for n = 1..={}",
                        operation,
                        worker_params.n
                    );
                    series.push(harness::measure_series(
                        &evaluator,
                        operation,
                        &worker_params,
                        &mut on_progress,
                    )?);
                }
                Ok(series)
            })
        })
        .await;
        self.monitor.end_phase(phase);

        outcome.map_err(|e| GeoError::WorkerError {
            message: e.to_string(),
        })?
    }

    /// Writes the configured export formats and returns the written paths.
    pub async fn export(
        &self,
        params: &SequenceParams,
        report: &SingleRunReport,
        series: &[TimingSeries],
    ) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.config.export_formats() {
            match format.as_str() {
                "json" => {
                    let path = self
                        .storage
                        .write_file("single_run.json", &report::single_run_json(report)?)
                        .await?;
                    written.push(path);
                    for s in series {
                        let name = format!("series_{}.json", s.operation);
                        let path = self
                            .storage
                            .write_file(&name, &report::series_json(s, params)?)
                            .await?;
                        written.push(path);
                    }
                }
                "csv" => {
                    for s in series {
                        let name = format!("series_{}.csv", s.operation);
                        let path = self.storage.write_file(&name, &report::series_csv(s)?).await?;
                        written.push(path);
                    }
                }
                other => {
                    tracing::warn!("Skipping unsupported export format: {}", other);
                }
            }
        }

        for path in &written {
            tracing::info!("📁 Wrote {}", path);
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfig;
    use crate::domain::model::OperationSelection;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStorage {
        files: Mutex<Vec<(String, Vec<u8>)>>,
    }

    impl Storage for MemoryStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            self.files
                .lock()
                .unwrap()
                .push((path.to_string(), data.to_vec()));
            Ok(format!("mem://{}", path))
        }
    }

    #[tokio::test]
    async fn test_exports_follow_configured_formats() {
        let config = RunConfig {
            n: 6,
            operation: OperationSelection::Term,
            series: true,
            export_formats: vec!["json".to_string()],
            ..RunConfig::default()
        };
        let engine = BenchEngine::new(MemoryStorage::default(), config);

        let summary = engine.run().await.unwrap();

        assert_eq!(
            summary.exported,
            vec!["mem://single_run.json".to_string(), "mem://series_term.json".to_string()]
        );
        let files = engine.storage.files.lock().unwrap();
        assert_eq!(files.len(), 2);
        assert!(!files[1].1.is_empty());
    }

    #[tokio::test]
    async fn test_params_checks_bounds() {
        let config = RunConfig {
            n: 0,
            ..RunConfig::default()
        };
        let engine = BenchEngine::new(MemoryStorage::default(), config);
        assert!(matches!(engine.params(), Err(GeoError::InvalidParameter { .. })));
    }

    #[tokio::test]
    async fn test_no_series_when_disabled() {
        let engine = BenchEngine::new(MemoryStorage::default(), RunConfig::default());
        let summary = engine.run().await.unwrap();
        assert!(summary.series.is_empty());
        assert_eq!(summary.report.params.n, 10);
    }
}
