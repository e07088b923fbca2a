use budget_allocator::config::scenario::TomlScenario;
use budget_allocator::utils::validation::Validate;
use budget_allocator::{
    AllocError, AllocationEngine, AllocationRequestBuilder, ArtifactModel, FittedModel,
    ScenarioProvider,
};
use std::collections::BTreeMap;
use tempfile::TempDir;

const CHANNELS: [&str; 4] = [
    "google_ads_c",
    "facebook_ads_c",
    "amazon_ads_c",
    "microsoft_ads_c",
];

fn write_artifact(dir: &TempDir) -> String {
    let artifact = serde_json::json!({
        "name": "mmm-fixture",
        "version": "1",
        "trained_at": "2025-06-30T12:00:00Z",
        "channels": [
            {"channel": "google_ads_c",    "alpha": 2400.0, "lam": 250.0},
            {"channel": "facebook_ads_c",  "alpha": 1800.0, "lam": 400.0},
            {"channel": "amazon_ads_c",    "alpha": 1200.0, "lam": 350.0},
            {"channel": "microsoft_ads_c", "alpha": 600.0,  "lam": 500.0}
        ]
    });
    let path = dir.path().join("model.json");
    std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();
    path.to_str().unwrap().to_string()
}

fn open_bounds(total_budget: f64) -> BTreeMap<String, (f64, f64)> {
    CHANNELS
        .iter()
        .map(|c| (c.to_string(), (0.0, total_budget)))
        .collect()
}

fn builder() -> AllocationRequestBuilder {
    AllocationRequestBuilder::new(CHANNELS.iter().map(|c| c.to_string()).collect())
}

#[tokio::test]
async fn test_end_to_end_allocation_from_artifact_on_disk() {
    let temp_dir = TempDir::new().unwrap();
    let model_path = write_artifact(&temp_dir);

    let model = ArtifactModel::load(&model_path).unwrap();
    assert_eq!(model.channels().len(), 4);

    let request = builder()
        .collect_and_validate(50000.0, 90, &open_bounds(50000.0))
        .unwrap();

    let engine = AllocationEngine::new(model);
    let report = engine.run(&request).await.unwrap();

    for channel in CHANNELS {
        assert!(report.contains(channel));
    }
    assert!(report.contains("Response vs spent per channel"));
    assert!(report.contains("Optimized Budget Allocation"));
    assert!(report.contains("Disclaimer"));

    // The whole budget is spendable, so the optimizer should use almost all of it.
    let cached = engine.model().optimal_allocation().unwrap();
    let total: f64 = cached.values().sum();
    assert!(total <= 50000.0 + 1e-6);
    assert!(total > 49000.0);
}

#[tokio::test]
async fn test_allocation_honors_tight_channel_bounds() {
    let temp_dir = TempDir::new().unwrap();
    let model = ArtifactModel::load(write_artifact(&temp_dir)).unwrap();

    let mut bounds = open_bounds(50000.0);
    bounds.insert("google_ads_c".to_string(), (0.0, 2000.0));
    let request = builder()
        .collect_and_validate(50000.0, 90, &bounds)
        .unwrap();

    let engine = AllocationEngine::new(model);
    engine.run(&request).await.unwrap();

    let cached = engine.model().optimal_allocation().unwrap();
    assert!(cached["google_ads_c"] <= 2000.0 + 1e-6);
}

#[test]
fn test_load_model_missing_path_fails_with_model_not_found() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("does_not_exist.json");

    let err = ArtifactModel::load(&missing).unwrap_err();
    match err {
        AllocError::ModelNotFound { path } => {
            assert!(path.contains("does_not_exist.json"));
        }
        other => panic!("expected ModelNotFound, got {other:?}"),
    }
}

#[test]
fn test_load_model_rejects_malformed_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("model.json");
    std::fs::write(&path, "{ not json at all").unwrap();

    let err = ArtifactModel::load(&path).unwrap_err();
    assert!(matches!(err, AllocError::ModelNotFound { .. }));
}

#[tokio::test]
async fn test_invalid_inputs_never_reach_the_optimizer() {
    // A zero budget fails validation before any model call, so no model
    // artifact is needed at all.
    let err = builder()
        .collect_and_validate(0.0, 90, &open_bounds(50000.0))
        .unwrap_err();
    assert!(matches!(err, AllocError::InvalidBudgetPeriod { .. }));

    let mut degenerate = BTreeMap::new();
    for channel in CHANNELS {
        degenerate.insert(channel.to_string(), (100.0, 100.0));
    }
    let err = builder()
        .collect_and_validate(50000.0, 90, &degenerate)
        .unwrap_err();
    assert!(matches!(err, AllocError::InvalidBounds { .. }));
}

#[tokio::test]
async fn test_scenario_file_drives_a_full_run() {
    let temp_dir = TempDir::new().unwrap();
    let model_path = write_artifact(&temp_dir);

    let scenario_toml = format!(
        r#"
[scenario]
name = "integration"

[model]
path = "{}"

[budget]
total = 40000.0
time_period_days = 60

[bounds.facebook_ads_c]
min = 5000.0
max = 20000.0
"#,
        model_path
    );
    let scenario_path = temp_dir.path().join("scenario.toml");
    std::fs::write(&scenario_path, scenario_toml).unwrap();

    let scenario = TomlScenario::from_file(&scenario_path).unwrap();
    scenario.validate().unwrap();
    assert_eq!(scenario.channels().len(), 4);

    let model = ArtifactModel::load(scenario.model_path()).unwrap();
    let request = AllocationRequestBuilder::new(scenario.channels().to_vec())
        .collect_and_validate(
            scenario.total_budget(),
            scenario.time_period(),
            &scenario.bounds().unwrap(),
        )
        .unwrap();

    assert_eq!(request.bounds["facebook_ads_c"].min, 5000.0);
    assert_eq!(request.bounds["facebook_ads_c"].max, 20000.0);

    let engine = AllocationEngine::new(model);
    let report = engine.run(&request).await.unwrap();
    assert!(report.contains("facebook_ads_c"));

    let cached = engine.model().optimal_allocation().unwrap();
    assert!(cached["facebook_ads_c"] >= 5000.0 - 1e-6);
    assert!(cached["facebook_ads_c"] <= 20000.0 + 1e-6);
}

#[tokio::test]
async fn test_infeasible_scenario_surfaces_optimizer_failure() {
    let temp_dir = TempDir::new().unwrap();
    let model = ArtifactModel::load(write_artifact(&temp_dir)).unwrap();

    // Valid per-channel bounds, but the minimums add up past the budget.
    let mut bounds = BTreeMap::new();
    for channel in CHANNELS {
        bounds.insert(channel.to_string(), (400.0, 1000.0));
    }
    let request = builder()
        .collect_and_validate(1000.0, 30, &bounds)
        .unwrap();

    let engine = AllocationEngine::new(model);
    let err = engine.run(&request).await.unwrap_err();
    assert!(matches!(err, AllocError::OptimizerFailure { .. }));
}
