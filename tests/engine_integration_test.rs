use geoseq::utils::validation::Validate;
use geoseq::{
    BenchEngine, GeoError, LocalStorage, Operation, OperationSelection, RecursionLimit, RunConfig,
    Strategy,
};
use num_bigint::BigInt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn config_in(dir: &Path) -> RunConfig {
    RunConfig {
        output_path: dir.to_string_lossy().to_string(),
        ..RunConfig::default()
    }
}

#[tokio::test]
async fn test_single_run_without_exports() {
    let temp_dir = TempDir::new().unwrap();
    let config = RunConfig {
        a: BigInt::from(2),
        r: BigInt::from(3),
        n: 3,
        ..config_in(temp_dir.path())
    };

    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let summary = engine.run().await.unwrap();

    assert!(summary.series.is_empty());
    assert!(summary.exported.is_empty());
    assert_eq!(summary.report.results.len(), 4);
    for strategy in Strategy::ALL {
        let sum = summary.report.get(Operation::Sum, strategy).unwrap();
        let term = summary.report.get(Operation::Term, strategy).unwrap();
        assert_eq!(sum.value, BigInt::from(26));
        assert_eq!(term.value, BigInt::from(18));
    }
}

#[tokio::test]
async fn test_series_with_exports() {
    let temp_dir = TempDir::new().unwrap();
    let config = RunConfig {
        a: BigInt::from(1),
        r: BigInt::from(2),
        n: 25,
        operation: OperationSelection::Sum,
        series: true,
        export_formats: vec!["csv".to_string(), "json".to_string()],
        ..config_in(temp_dir.path())
    };

    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let summary = engine.run().await.unwrap();

    assert_eq!(summary.series.len(), 1);
    assert_eq!(summary.series[0].len(), 25);
    assert_eq!(summary.exported.len(), 3);

    let csv = std::fs::read_to_string(temp_dir.path().join("series_sum.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("n,iterative_ms,recursive_ms"));
    assert_eq!(lines.count(), 25);

    let single: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("single_run.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(single["params"]["n"], 25);
    assert_eq!(single["results"][0]["value"], "33554431");

    let series: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("series_sum.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(series["inputs"].as_array().unwrap().len(), 25);
    assert_eq!(series["series"][1]["label"], "Recursive");
}

#[tokio::test]
async fn test_progress_reaches_completion() {
    let temp_dir = TempDir::new().unwrap();
    let config = RunConfig {
        n: 10,
        series: true,
        ..config_in(temp_dir.path())
    };

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let summary = engine
        .run_with_progress(move |p| {
            sink.lock().unwrap().push((p.operation, p.completed, p.fraction()));
            true
        })
        .await
        .unwrap();

    assert_eq!(summary.series.len(), 2);
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 20);
    assert_eq!(seen[9], (Operation::Sum, 10, 1.0));
    assert_eq!(seen[19], (Operation::Term, 10, 1.0));
}

#[tokio::test]
async fn test_series_cancellation_surfaces() {
    let temp_dir = TempDir::new().unwrap();
    let config = RunConfig {
        n: 50,
        series: true,
        ..config_in(temp_dir.path())
    };

    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let err = engine
        .run_with_progress(|p| p.completed < 5)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GeoError::Cancelled {
            completed: 5,
            total: 50
        }
    ));
    assert_eq!(err.exit_code(), 0);
}

#[tokio::test]
async fn test_n_above_max_is_rejected_before_measuring() {
    let temp_dir = TempDir::new().unwrap();
    let config = RunConfig {
        n: 1_000,
        ..config_in(temp_dir.path())
    };

    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let err = engine.run().await.unwrap_err();
    assert!(matches!(err, GeoError::InvalidParameter { ref field, .. } if field == "n"));
}

#[tokio::test]
async fn test_recursion_limit_surfaces_from_engine() {
    let temp_dir = TempDir::new().unwrap();
    // bypasses RunConfig::validate to reach the evaluator with n above the ceiling
    let config = RunConfig {
        n: 40,
        recursion_limit: 20,
        ..config_in(temp_dir.path())
    };

    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let err = engine.run().await.unwrap_err();
    assert!(matches!(
        err,
        GeoError::RecursionLimitExceeded {
            depth: 40,
            limit: 20
        }
    ));
}

#[tokio::test]
async fn test_deepest_valid_run_under_default_limit() {
    let temp_dir = TempDir::new().unwrap();
    let limit = RecursionLimit::default().max_depth();
    let config = RunConfig {
        a: BigInt::from(1),
        r: BigInt::from(1),
        n: limit - 1,
        max_n: limit - 1,
        ..config_in(temp_dir.path())
    };
    assert!(config.validate().is_ok());

    // the test runtime's own threads are far too small for these frames
    let engine = BenchEngine::new(LocalStorage::new(temp_dir.path()), config);
    let summary = engine.run().await.unwrap();

    for strategy in Strategy::ALL {
        let sum = summary.report.get(Operation::Sum, strategy).unwrap();
        let term = summary.report.get(Operation::Term, strategy).unwrap();
        assert_eq!(sum.value, BigInt::from(limit - 1));
        assert_eq!(term.value, BigInt::from(1));
    }
}

#[tokio::test]
async fn test_monitored_series_still_reports_every_size() {
    let temp_dir = TempDir::new().unwrap();
    let config = RunConfig {
        n: 25,
        series: true,
        operation: OperationSelection::Sum,
        ..config_in(temp_dir.path())
    };

    let engine = BenchEngine::new_with_monitoring(LocalStorage::new(temp_dir.path()), config, true);
    let completed = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&completed);
    let summary = engine
        .run_with_progress(move |p| {
            sink.lock().unwrap().push(p.completed);
            true
        })
        .await
        .unwrap();

    assert_eq!(summary.series[0].len(), 25);
    assert_eq!(*completed.lock().unwrap(), (1..=25).collect::<Vec<u64>>());
}
