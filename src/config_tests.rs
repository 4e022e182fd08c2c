use crate::config::Config;
use crate::domain::series::Requirement;
use std::env;
use std::sync::{Mutex, OnceLock};

// Global lock to prevent race conditions when modifying environment variables in tests
static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn get_env_lock() -> &'static Mutex<()> {
    ENV_LOCK.get_or_init(|| Mutex::new(()))
}

fn clear_perfchart_env() {
    for key in [
        "PERFCHART_INPUT",
        "PERFCHART_CHART",
        "PERFCHART_CSV",
        "PERFCHART_RATE_COLUMN",
        "PERFCHART_SMOOTHING_WINDOW",
        "PERFCHART_YEAR_SECONDS",
        "PERFCHART_CHART_WIDTH",
        "PERFCHART_CHART_HEIGHT",
        "PERFCHART_STRATEGIES",
    ] {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_config_defaults() {
    let _guard = get_env_lock().lock().unwrap();
    clear_perfchart_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.input_path.to_str().unwrap(), "results/comparison.json");
    assert_eq!(config.smoothing_window, 5);
    assert_eq!(config.year_seconds, 31_536_000.0);
    assert_eq!(config.rate_column, "pricePerShareBlend");
    assert!(config.csv_path.is_none());
    // Default schema: two spots plus the three recorded vaults
    assert_eq!(config.schema.columns.len(), 5);
}

#[test]
fn test_config_env_overrides() {
    let _guard = get_env_lock().lock().unwrap();
    clear_perfchart_env();

    unsafe {
        env::set_var("PERFCHART_INPUT", "/tmp/series.json");
        env::set_var("PERFCHART_SMOOTHING_WINDOW", "9");
        env::set_var("PERFCHART_CSV", "/tmp/out.csv");
    }

    let config = Config::from_env().unwrap();

    assert_eq!(config.input_path.to_str().unwrap(), "/tmp/series.json");
    assert_eq!(config.smoothing_window, 9);
    assert_eq!(config.csv_path.as_ref().unwrap().to_str().unwrap(), "/tmp/out.csv");

    clear_perfchart_env();
}

#[test]
fn test_config_strategy_schema_parsing() {
    let _guard = get_env_lock().lock().unwrap();
    clear_perfchart_env();

    unsafe {
        env::set_var(
            "PERFCHART_STRATEGIES",
            "pricePerShareBlend:Blend Vault, pricePerShareCharm?:Charm Vault",
        );
    }

    let config = Config::from_env().unwrap();
    let columns = &config.schema.columns;

    assert_eq!(columns.len(), 4);
    assert_eq!(columns[2].key, "pricePerShareBlend");
    assert_eq!(columns[2].requirement, Requirement::Required);
    assert_eq!(columns[3].key, "pricePerShareCharm");
    assert_eq!(columns[3].label, "Charm Vault");
    assert_eq!(
        columns[3].requirement,
        Requirement::OptionalWithDefault(1.0)
    );

    clear_perfchart_env();
}

#[test]
fn test_config_rejects_malformed_strategy_entry() {
    let _guard = get_env_lock().lock().unwrap();
    clear_perfchart_env();

    unsafe { env::set_var("PERFCHART_STRATEGIES", "no-label-here") };

    assert!(Config::from_env().is_err());

    clear_perfchart_env();
}
