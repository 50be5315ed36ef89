//! Property tests over generated versions, paths and frames.

use proptest::prelude::*;
use snapset_core::PathBuilder;
use snapset_testkit::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_frame_round_trips(path in logical_path_strategy(), frame in frame_strategy()) {
        with_memory_store(|store| {
            let dataset = store.json_dataset(&path, versioned(None, None));
            dataset.save(&frame).unwrap();
            assert_eq!(dataset.load().unwrap(), frame);
        });
    }

    #[test]
    fn latest_of_many_is_loaded(versions in version_set_strategy(6)) {
        with_memory_store(|store| {
            for (i, version) in versions.iter().enumerate() {
                let frame = Frame { columns: vec!["i".to_string()], rows: vec![vec![i as i64]] };
                store
                    .json_dataset("test.json", versioned(None, Some(version)))
                    .save(&frame)
                    .unwrap();
            }

            let dataset = store.json_dataset("test.json", versioned(None, None));
            let loaded = dataset.load().unwrap();
            assert_eq!(loaded.rows, vec![vec![versions.len() as i64 - 1]]);
        });
    }

    #[test]
    fn saved_path_nests_under_logical(path in logical_path_strategy(), version in version_strategy()) {
        let built = PathBuilder::new(path.clone()).unwrap().build(Some(&version));
        let basename = path.rsplit('/').next().unwrap();
        prop_assert_eq!(built, format!("{path}/{version}/{basename}"));
    }
}
