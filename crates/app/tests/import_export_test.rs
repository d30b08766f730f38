//! Integration tests for importing and exporting through the file-backed
//! adapters.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;

use varsync_application::import::ResolveError;
use varsync_application::{
    ExportVariables, ImportError, ImportOutcome, ImportVariables, ListCollections, LoadSettings,
    SaveSettings,
};
use varsync_domain::{ColorFormat, Document, Settings, StoreValue, ValidationErrorCode};
use varsync_infrastructure::{
    DEFAULT_MODE_LIMIT, FileClientStorage, load_store, read_document, save_store, write_document,
};

fn document(value: Value) -> Document {
    serde_json::from_value(value).expect("valid document")
}

fn palette() -> Value {
    json!({
        "collections": [{
            "name": "Palette",
            "modes": ["light", "dark"],
            "variables": {
                "base": {
                    "blue": {
                        "type": "color",
                        "values": { "light": "#0000ff", "dark": "#000080" }
                    }
                },
                "accent": {
                    "type": "color",
                    "values": { "light": "Palette:base/blue", "dark": "Palette:base/blue" }
                },
                "radius": { "type": "number", "values": { "light": 4, "dark": 6.5 } },
                "rounded": { "type": "boolean", "values": { "light": true, "dark": false } }
            }
        }]
    })
}

async fn import_into(path: &Path, source: Value, settings: &Settings) -> ImportOutcome {
    let store = load_store(path, DEFAULT_MODE_LIMIT).await.unwrap();
    let mut import = ImportVariables::new(store);
    let outcome = import.execute(&document(source), settings).await.unwrap();
    if outcome.is_applied() {
        save_store(path, import.store()).await.unwrap();
    }
    outcome
}

#[tokio::test]
async fn test_round_trip_through_store_file() {
    let temp = tempdir().unwrap();
    let store_path = temp.path().join("store.json");

    let outcome = import_into(&store_path, palette(), &Settings::default()).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.entries.len(), 4);
    assert!(outcome.entries.iter().all(|entry| entry.complete));

    let store = load_store(&store_path, DEFAULT_MODE_LIMIT).await.unwrap();
    let exported = ExportVariables::new(store)
        .execute(Some("Palette"), ColorFormat::Hex)
        .await
        .unwrap();

    assert_eq!(serde_json::to_value(&exported).unwrap(), palette());
}

#[tokio::test]
async fn test_export_file_can_be_imported_again() {
    let temp = tempdir().unwrap();
    let first = temp.path().join("first.json");
    let second = temp.path().join("second.json");
    let exported_path = temp.path().join("out/palette.json");

    import_into(&first, palette(), &Settings::default()).await;
    let store = load_store(&first, DEFAULT_MODE_LIMIT).await.unwrap();
    let exported = ExportVariables::new(store)
        .execute(None, ColorFormat::Rgba)
        .await
        .unwrap();
    write_document(&exported_path, &exported).await.unwrap();

    let reread = read_document(&exported_path).await.unwrap();
    let store = load_store(&second, DEFAULT_MODE_LIMIT).await.unwrap();
    let mut import = ImportVariables::new(store);
    let outcome = import.execute(&reread, &Settings::default()).await.unwrap();

    assert!(outcome.is_success(), "{:?}", outcome.errors);
    assert_eq!(outcome.entries.len(), 4);
}

#[tokio::test]
async fn test_aliases_to_previous_import_survive_restart() {
    let temp = tempdir().unwrap();
    let store_path = temp.path().join("store.json");
    import_into(&store_path, palette(), &Settings::default()).await;

    let theme = json!({
        "collections": [{
            "name": "Theme",
            "modes": ["default"],
            "variables": {
                "link": { "type": "color", "values": { "default": "Palette:accent" } }
            }
        }]
    });
    let outcome = import_into(&store_path, theme, &Settings::default()).await;
    assert!(outcome.is_success(), "{:?}", outcome.errors);

    let store = load_store(&store_path, DEFAULT_MODE_LIMIT).await.unwrap();
    let state = store.state();
    let accent = state.variables.iter().find(|v| v.name == "accent").unwrap();
    let link = state.variables.iter().find(|v| v.name == "link").unwrap();
    assert_eq!(
        link.values_by_mode.values().next(),
        Some(&StoreValue::Alias(accent.id.clone()))
    );
}

#[tokio::test]
async fn test_rejected_import_leaves_store_untouched() {
    let temp = tempdir().unwrap();
    let store_path = temp.path().join("store.json");

    let broken = json!({
        "collections": [{
            "name": "Sizes",
            "modes": ["default"],
            "variables": {
                "gap": { "type": "number", "values": { "default": "wide" } },
                "tint": { "type": "color", "values": { "default": "#ggg" } }
            }
        }]
    });
    let outcome = import_into(&store_path, broken, &Settings::default()).await;

    let codes: Vec<_> = outcome.errors.iter().map(|e| e.error_code).collect();
    assert_eq!(
        codes,
        vec![
            ValidationErrorCode::InvalidNumberValue,
            ValidationErrorCode::InvalidColorFormat,
        ]
    );
    assert!(!outcome.is_applied());
    assert!(!store_path.exists());
}

#[tokio::test]
async fn test_missing_reference_uses_fallback_when_allowed() {
    let temp = tempdir().unwrap();
    let store_path = temp.path().join("store.json");
    let settings = Settings {
        fail_on_null_alias: false,
        number_fallback: 12.0,
        ..Settings::default()
    };

    let source = json!({
        "collections": [{
            "name": "Sizes",
            "modes": ["default"],
            "variables": {
                "gap": { "type": "number", "values": { "default": "Sizes:missing" } }
            }
        }]
    });
    let outcome = import_into(&store_path, source, &settings).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.substitutions.len(), 1);
    assert_eq!(outcome.substitutions[0].reference, "Sizes:missing");

    let store = load_store(&store_path, DEFAULT_MODE_LIMIT).await.unwrap();
    let gap = &store.state().variables[0];
    assert_eq!(
        gap.values_by_mode.values().next(),
        Some(&StoreValue::Float(12.0))
    );
}

#[tokio::test]
async fn test_cycle_is_reported() {
    let temp = tempdir().unwrap();
    let store = load_store(&temp.path().join("store.json"), DEFAULT_MODE_LIMIT)
        .await
        .unwrap();
    let source = json!({
        "collections": [{
            "name": "Loop",
            "modes": ["default"],
            "variables": {
                "a": { "type": "string", "values": { "default": "Loop:b" } },
                "b": { "type": "string", "values": { "default": "Loop:a" } }
            }
        }]
    });

    let mut import = ImportVariables::new(store);
    let err = import
        .execute(&document(source), &Settings::default())
        .await
        .unwrap_err();

    let ImportError::Resolve(ResolveError::Unresolved { unresolved, .. }) = &err else {
        panic!("expected an unresolved report, got {err:?}");
    };
    assert_eq!(unresolved.len(), 2);
    assert!(import.store().state().collections.is_empty());
}

#[tokio::test]
async fn test_duplicate_keys_are_rejected() {
    let temp = tempdir().unwrap();
    let store_path = temp.path().join("store.json");
    let source = json!({
        "collections": [
            {
                "name": "Dup",
                "modes": ["default"],
                "variables": { "x": { "type": "string", "values": { "default": "one" } } }
            },
            {
                "name": "Dup",
                "modes": ["default"],
                "variables": { "x": { "type": "string", "values": { "default": "two" } } }
            }
        ]
    });

    let outcome = import_into(&store_path, source, &Settings::default()).await;

    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(
        outcome.errors[0].error_code,
        ValidationErrorCode::DuplicateVariableKey
    );
    assert_eq!(outcome.errors[0].variable_name, "Dup:x");
}

#[tokio::test]
async fn test_mode_limit_is_reported() {
    let temp = tempdir().unwrap();
    let store_path = temp.path().join("store.json");
    let store = load_store(&store_path, 2).await.unwrap();
    let source = json!({
        "collections": [{
            "name": "Sizes",
            "modes": ["s", "m", "l"],
            "variables": {
                "gap": { "type": "number", "values": { "s": 1, "m": 2, "l": 3 } }
            }
        }]
    });

    let mut import = ImportVariables::new(store);
    let outcome = import
        .execute(&document(source), &Settings::default())
        .await
        .unwrap();

    assert!(outcome.is_applied());
    assert_eq!(outcome.errors.len(), 1);
    assert_eq!(outcome.errors[0].error_code, ValidationErrorCode::UnableToAddMode);
    assert!(!outcome.entries[0].complete);

    let summaries = ListCollections::new(import.into_store()).execute().await.unwrap();
    assert_eq!(summaries[0].modes, vec!["s".to_string(), "m".to_string()]);
}

#[tokio::test]
async fn test_settings_persist_in_config_dir() {
    let temp = tempdir().unwrap();
    let storage = FileClientStorage::new(temp.path());

    let settings = Settings {
        color_fallback: "#ff00ff".to_string(),
        extend_existing_collections: false,
        ..Settings::default()
    };
    SaveSettings::new(&storage).execute(&settings).await.unwrap();
    assert!(temp.path().join("import-export-settings.json").exists());

    let loaded = LoadSettings::new(&storage).execute().await.unwrap();
    assert_eq!(loaded, settings);

    SaveSettings::new(&storage).reset().await.unwrap();
    let loaded = LoadSettings::new(&storage).execute().await.unwrap();
    assert_eq!(loaded, Settings::default());
}
