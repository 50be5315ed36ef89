//! End-to-end dataset scenarios, run against every backend kind.

use snapset_core::{DatasetConfig, DatasetErrorKind, DatasetWarning};
use snapset_storage::{StorageBackend, WriteMode};
use snapset_testkit::prelude::*;

#[test]
fn save_then_load_round_trips() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(None, None));
        dataset.save(&sample_frame()).unwrap();

        let reloaded = store
            .json_dataset("test.json", versioned(None, None))
            .load()
            .unwrap();
        assert_eq!(reloaded, sample_frame());
    });
}

#[test]
fn unversioned_round_trip_uses_logical_path() {
    for_each_store(|store| {
        let dataset = store.json_dataset("data/01_raw/test.json", Default::default());
        let outcome = dataset.save(&sample_frame()).unwrap();
        assert_eq!(outcome.path, "data/01_raw/test.json");
        assert_eq!(outcome.version, None);
        assert_eq!(dataset.load().unwrap(), sample_frame());
    });
}

#[test]
fn fixed_save_version_is_refused_the_second_time() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(None, Some(V2)));
        let outcome = dataset.save(&sample_frame()).unwrap();
        let expected = format!("test.json/{V2}/test.json");
        assert_eq!(outcome.path, expected);
        assert!(outcome.warning.is_none());

        let err = dataset.save(&other_frame()).unwrap_err();
        assert_eq!(err.kind(), DatasetErrorKind::OverwriteRefused);
        assert!(err.to_string().contains(&expected));
        assert!(err
            .to_string()
            .ends_with("must not exist if versioning is enabled."));

        assert_eq!(dataset.load().unwrap(), sample_frame());
    });
}

#[test]
fn generated_save_version_is_refused_the_second_time() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(None, None));
        let first = dataset.save(&sample_frame()).unwrap();
        let err = dataset.save(&sample_frame()).unwrap_err();
        assert_eq!(err.kind(), DatasetErrorKind::OverwriteRefused);
        assert!(err.to_string().contains(&first.path));
    });
}

#[test]
fn mismatched_fixed_versions_warn_then_fail_to_load() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(Some(V1), Some(V2)));
        let outcome = dataset.save(&sample_frame()).unwrap();

        let warning = outcome.warning.expect("expected a mismatch warning");
        assert!(matches!(warning, DatasetWarning::PathMismatch { .. }));
        assert_eq!(
            warning.to_string(),
            format!(
                "Save path `test.json/{V2}/test.json` did not match load path \
                 `test.json/{V1}/test.json` for {dataset}"
            )
        );

        let err = dataset.load().unwrap_err();
        assert_eq!(err.kind(), DatasetErrorKind::VersionNotFound);
    });
}

#[test]
fn matching_fixed_versions_do_not_warn() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(Some(V2), Some(V2)));
        let outcome = dataset.save(&sample_frame()).unwrap();
        assert!(outcome.warning.is_none());
        assert_eq!(dataset.load().unwrap(), sample_frame());
    });
}

#[test]
fn load_without_snapshots_reports_no_versions() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(None, None));
        let err = dataset.load().unwrap_err();
        assert_eq!(err.kind(), DatasetErrorKind::NoVersionsFound);
        assert_eq!(
            err.to_string(),
            format!("Did not find any versions for {dataset}")
        );
    });
}

#[test]
fn latest_snapshot_wins_across_instances() {
    for_each_store(|store| {
        store
            .json_dataset("test.json", versioned(None, Some(V1)))
            .save(&other_frame())
            .unwrap();
        store
            .json_dataset("test.json", versioned(None, Some(V2)))
            .save(&sample_frame())
            .unwrap();

        let latest = store.json_dataset("test.json", versioned(None, None));
        assert_eq!(latest.load().unwrap(), sample_frame());
        assert_eq!(latest.load_path().unwrap(), format!("test.json/{V2}/test.json"));

        let pinned = store.json_dataset("test.json", versioned(Some(V1), None));
        assert_eq!(pinned.load().unwrap(), other_frame());
    });
}

#[test]
fn exists_before_and_after_save() {
    for_each_store(|store| {
        let dataset = store.json_dataset("test.json", versioned(None, None));
        assert!(!dataset.exists().unwrap());

        dataset.save(&sample_frame()).unwrap();
        assert!(dataset.exists().unwrap());
        assert!(store
            .json_dataset("test.json", versioned(None, None))
            .exists()
            .unwrap());
    });
}

#[test]
fn exists_with_missing_pinned_version_is_false() {
    for_each_store(|store| {
        store
            .json_dataset("test.json", versioned(None, Some(V2)))
            .save(&sample_frame())
            .unwrap();
        let pinned = store.json_dataset("test.json", versioned(Some(V1), None));
        assert!(!pinned.exists().unwrap());
    });
}

#[test]
fn unversioned_overwrite_is_opt_in() {
    for_each_store(|store| {
        let strict = store.json_dataset("test.json", Default::default());
        strict.save(&sample_frame()).unwrap();
        let err = strict.save(&other_frame()).unwrap_err();
        assert_eq!(err.kind(), DatasetErrorKind::Backend);
        assert!(err
            .to_string()
            .starts_with("Failed while saving data to data set JSON"));

        let lenient = store.json_dataset("test.json", DatasetConfig::new().overwrite(true));
        lenient.save(&other_frame()).unwrap();
        assert_eq!(lenient.load().unwrap(), other_frame());
    });
}

#[test]
fn save_args_reach_the_codec() {
    for_each_store(|store| {
        let config = versioned(None, Some(V1)).save_arg("indent", "2");
        let dataset = store.json_dataset("test.json", config);
        let outcome = dataset.save(&sample_frame()).unwrap();

        let bytes = store.backend.read_bytes(&outcome.path).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("{\n  \"columns\""));
    });
}

#[test]
fn invalid_save_args_fail_before_writing() {
    for_each_store(|store| {
        let config = versioned(None, Some(V1)).save_arg("indent", "lots");
        let dataset = store.json_dataset("test.json", config);
        let err = dataset.save(&sample_frame()).unwrap_err();
        assert_eq!(err.kind(), DatasetErrorKind::Codec);
        assert!(err
            .to_string()
            .starts_with("Failed while saving data to data set"));
        assert!(!store.backend.exists(&format!("test.json/{V1}/test.json")).unwrap());
    });
}

#[test]
fn stray_entries_next_to_versions_are_ignored() {
    for_each_store(|store| {
        store
            .json_dataset("test.json", versioned(None, Some(V1)))
            .save(&sample_frame())
            .unwrap();
        store
            .backend
            .write_bytes(
                "test.json/README/test.json",
                b"not a snapshot",
                WriteMode::CreateNew,
            )
            .unwrap();

        let dataset = store.json_dataset("test.json", versioned(None, None));
        assert_eq!(dataset.load().unwrap(), sample_frame());
        assert_eq!(dataset.resolved_load_version().as_deref(), Some(V1));
    });
}

#[test]
fn text_datasets_share_the_same_layout() {
    for_each_store(|store| {
        let dataset = store.text_dataset("notes/today.txt", versioned(None, Some(V1)));
        let outcome = dataset.save(&"hello".to_string()).unwrap();
        assert_eq!(outcome.path, format!("notes/today.txt/{V1}/today.txt"));
        assert_eq!(dataset.load().unwrap(), "hello");
    });
}

#[test]
fn file_store_writes_real_files() {
    with_file_store(|store| {
        let dataset = store.json_dataset("data/test.json", versioned(None, Some(V2)));
        dataset.save(&sample_frame()).unwrap();

        let root = store.root().unwrap();
        let on_disk = root.join("data").join("test.json").join(V2).join("test.json");
        let content = std::fs::read(on_disk).unwrap();
        let frame: Frame = serde_json::from_slice(&content).unwrap();
        assert_eq!(frame, sample_frame());
    });
}
