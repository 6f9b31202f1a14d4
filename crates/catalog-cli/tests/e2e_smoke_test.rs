use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::tempdir;

use catalog::CatalogError;
use catalog_cli::{Args, run};

/// Collects all .json files from a directory
fn collect_models(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

/// Demos are at workspace root, relative to workspace not the crate
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args(input: &Path, output: &Path) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: Some(output.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
        inline: false,
        mermaid: true,
        title: None,
    }
}

#[test]
fn e2e_smoke_test_valid_models() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let models = collect_models(demos_path());
    assert!(!models.is_empty(), "No demo models found in demos/");

    let mut failed = Vec::new();

    for model in &models {
        let output = temp_dir.path().join(model.file_stem().unwrap());
        if let Err(e) = run(&args(model, &output)) {
            failed.push((model.clone(), e));
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo models that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo model(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_orders_demo_layout() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let model = demos_path().join("orders.json");

    let args = Args {
        title: Some("Shop".to_string()),
        ..args(&model, temp_dir.path())
    };
    run(&args).expect("orders demo should document cleanly");

    let out = temp_dir.path();
    let integration = fs::read_to_string(out.join("Shop/integration.mmd")).unwrap();
    assert!(integration.contains("graph LR"));
    assert!(out.join("Shop/integrationEPA.mmd").exists());

    assert!(out.join("shop/Orders/GetOrder_seq_.mmd").exists());
    assert!(out.join("shop/Orders/ListOrdersReturnVal.mmd").exists());
    assert!(out.join("shop/Orders/Order.mmd").exists());
    assert!(out.join("shop/OrdersDb/types.mmd").exists());
    assert!(
        !out.join("shop/Orders/Debug_seq_.mmd").exists(),
        "Ignored endpoints are not documented"
    );
}

#[test]
fn e2e_inline_mode_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let model = demos_path().join("orders.json");

    let args = Args {
        inline: true,
        ..args(&model, temp_dir.path())
    };
    run(&args).expect("inline run should succeed");

    assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[test]
fn e2e_smoke_test_error_models() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let models = collect_models(demos_path().join("errors"));
    assert!(!models.is_empty(), "No error models found in demos/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for model in &models {
        match run(&args(model, temp_dir.path())) {
            Ok(()) => unexpectedly_succeeded.push(model.clone()),
            Err(err) => assert!(
                matches!(err, CatalogError::Model { .. }),
                "{}: expected a model error, got {err}",
                model.display()
            ),
        }
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "Error models succeeded unexpectedly: {unexpectedly_succeeded:?}"
    );
}

#[test]
fn e2e_invalid_config_fails_fast() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "[render]\nmax_attempts = 0\n").unwrap();

    let args = Args {
        config: Some(config.to_string_lossy().to_string()),
        ..args(&demos_path().join("orders.json"), &temp_dir.path().join("out"))
    };

    let err = run(&args).unwrap_err();
    assert!(matches!(err, CatalogError::Config(_)));
    assert!(!temp_dir.path().join("out").exists());
}
