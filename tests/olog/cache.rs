use std::sync::Arc;

use ologstyle::core::olog::{self, AttributeAxis, SpecCache, SpecHandle, SpecLoader, StyleParams};

use crate::olog_fixture::{CATCH_ALL_RULE, EXACT_RULE, OlogDir, attrs, small_olog};

#[test]
fn cache_hands_out_one_model_per_unchanged_document() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let cache = SpecCache::new(SpecLoader::new());
    let first = olog.cached(&cache);
    let second = olog.cached(&cache);
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn changed_document_is_reparsed_and_old_model_survives() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let cache = SpecCache::default();
    let old = olog.cached(&cache);

    olog.rewrite(&small_olog(&[CATCH_ALL_RULE, EXACT_RULE]));
    let new = olog.cached(&cache);

    assert!(!Arc::ptr_eq(&old, &new));
    assert_eq!(old.registry().len(), 1);
    assert_eq!(new.registry().len(), 2);
    assert_eq!(cache.len(), 1);
}

#[test]
fn intentionality_change_invalidates_the_entry() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let cache = SpecCache::default();
    let without = olog.cached(&cache);
    assert!(without.intentionality().is_none());

    olog.write_sibling(
        "styles_intentionality.olog.yaml",
        "olog:\n  instances:\n    kid_chaos:\n      core_intention: loud\n",
    );
    let with = olog.cached(&cache);
    assert!(!Arc::ptr_eq(&without, &with));
    assert!(with.intentionality().is_some());
}

#[test]
fn handle_reload_does_not_disturb_inflight_snapshot() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let handle = SpecHandle::open(SpecLoader::new(), olog.path()).unwrap();
    let input = attrs(&[(AttributeAxis::Energy, "high")]);

    let snapshot = handle.load_full();
    assert!(!handle.reload_if_changed().unwrap());

    olog.rewrite(&small_olog(&[CATCH_ALL_RULE, EXACT_RULE]));
    assert!(handle.reload_if_changed().unwrap());

    let before = olog::transform(&input, "kid_chaos", &StyleParams::new(), &snapshot).unwrap();
    let after = olog::transform(&input, "kid_chaos", &StyleParams::new(), &handle.load()).unwrap();
    assert_eq!(before.attributes().get(AttributeAxis::Energy).unwrap(), "extreme");
    assert_eq!(after.attributes().get(AttributeAxis::Energy).unwrap(), "low");
}

#[test]
fn failed_reload_keeps_serving_previous_model() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let handle = SpecHandle::open(SpecLoader::new(), olog.path()).unwrap();
    let clone = handle.clone();

    olog.rewrite("olog: [broken\n");
    assert!(handle.reload_if_changed().is_err());
    assert_eq!(clone.load().registry().len(), 1);
}

#[test]
fn concurrent_readers_share_the_cached_model() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let cache = SpecCache::default();
    let first = olog.cached(&cache);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| olog.cached(&cache)))
            .collect();
        for handle in handles {
            let model = handle.join().unwrap();
            assert!(Arc::ptr_eq(&first, &model));
        }
    });
}

#[test]
fn concurrent_reloads_swap_the_model_once() {
    let olog = OlogDir::new(&small_olog(&[EXACT_RULE]));
    let handle = SpecHandle::open(SpecLoader::new(), olog.path()).unwrap();
    olog.rewrite(&small_olog(&[CATCH_ALL_RULE, EXACT_RULE]));

    let swapped = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let handle = handle.clone();
                scope.spawn(move || handle.reload_if_changed().unwrap())
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .filter(|swapped| *swapped)
            .count()
    });

    // compare, load, store and signature update happen under one lock
    assert_eq!(swapped, 1);
    assert_eq!(handle.load().registry().len(), 2);
    assert!(!handle.reload_if_changed().unwrap());
}
