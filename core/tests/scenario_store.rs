//! SQLite scenario store tests.

use invoice_roi_core::{
    calculator::RoiCalculator,
    error::RoiError,
    scenario::{SimulationInput, SimulationResult},
    store::ScenarioStore,
};

fn store() -> ScenarioStore {
    let store = ScenarioStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

fn inputs() -> SimulationInput {
    SimulationInput {
        monthly_invoice_volume:       2500,
        num_ap_staff:                 4,
        avg_hours_per_invoice:        0.17,
        hourly_wage:                  31.37,
        error_rate_manual:            3.3,
        error_cost:                   42.1,
        time_horizon_months:          18,
        one_time_implementation_cost: 12345.67,
    }
}

/// Verify that a saved scenario reads back with identical inputs and results.
#[test]
fn saved_scenario_round_trips_bit_identical() {
    let store = store();
    let results = RoiCalculator::default().compute(&inputs());

    let saved = store.save("baseline", &inputs(), &results).unwrap();
    let loaded = store.get(saved.id).unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.inputs.hourly_wage.to_bits(), 31.37f64.to_bits());
    assert_eq!(loaded.results.monthly_savings.to_bits(), results.monthly_savings.to_bits());
    assert_eq!(loaded.results.roi_percentage.to_bits(), results.roi_percentage.to_bits());
}

/// Verify that reads return the stored snapshot, not a fresh computation.
#[test]
fn stored_results_are_not_recomputed() {
    let store = store();
    // Deliberately inconsistent with the inputs: the store must hand back
    // exactly what it was given.
    let results = SimulationResult {
        monthly_savings:    1.23,
        cumulative_savings: 4.56,
        net_savings:        -7.89,
        payback_months:     0.1,
        roi_percentage:     f64::INFINITY,
    };
    let saved = store.save("snapshot", &inputs(), &results).unwrap();
    let loaded = store.get(saved.id).unwrap();
    assert_eq!(loaded.results, results);
    assert!(loaded.results.roi_percentage.is_infinite());
}

/// Verify that a duplicate name fails with DuplicateName and leaves one row.
#[test]
fn duplicate_name_is_rejected_and_only_one_row_persists() {
    let store = store();
    let results = RoiCalculator::default().compute(&inputs());

    store.save("q3-plan", &inputs(), &results).unwrap();
    let err = store.save("q3-plan", &inputs(), &results).unwrap_err();

    assert!(
        matches!(err, RoiError::DuplicateName { ref name } if name == "q3-plan"),
        "unexpected error: {err:?}"
    );
    assert_eq!(store.count().unwrap(), 1);
}

/// Verify that an unknown id maps to NotFound.
#[test]
fn missing_id_is_not_found() {
    let store = store();
    let err = store.get(404).unwrap_err();
    assert!(matches!(err, RoiError::NotFound { id: 404 }), "unexpected error: {err:?}");
}

/// Verify that listing is ordered by id and honors skip and limit.
#[test]
fn list_is_ordered_by_id_and_paginated() {
    let store = store();
    let results = RoiCalculator::default().compute(&inputs());
    let names = ["alpha", "bravo", "charlie", "delta", "echo"];
    for name in names {
        store.save(name, &inputs(), &results).unwrap();
    }

    let all = store.list(0, 100).unwrap();
    let listed: Vec<_> = all.iter().map(|s| s.scenario_name.as_str()).collect();
    assert_eq!(listed, names);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));

    let page = store.list(1, 2).unwrap();
    let paged: Vec<_> = page.iter().map(|s| s.scenario_name.as_str()).collect();
    assert_eq!(paged, ["bravo", "charlie"]);

    assert!(store.list(10, 5).unwrap().is_empty());
    assert!(store.list(0, 0).unwrap().is_empty());
}

/// Verify that running migrations twice is harmless.
#[test]
fn migrate_is_idempotent() {
    let store = store();
    store.migrate().unwrap();
    assert_eq!(store.count().unwrap(), 0);
}

/// Verify that a file store persists across reopen and enforces unique names across connections.
#[test]
fn file_store_survives_reopen_and_enforces_uniqueness_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roi.db");
    let path = path.to_str().unwrap();
    let results = RoiCalculator::default().compute(&inputs());

    let first = ScenarioStore::open(path).unwrap();
    first.migrate().unwrap();
    let saved = first.save("shared", &inputs(), &results).unwrap();

    let second = first.reopen().unwrap();
    assert_eq!(second.get(saved.id).unwrap(), saved);
    let err = second.save("shared", &inputs(), &results).unwrap_err();
    assert!(matches!(err, RoiError::DuplicateName { .. }));
    assert_eq!(first.count().unwrap(), 1);
}

/// Verify that racing creates of one name leave exactly one row.
#[test]
fn concurrent_creates_of_one_name_yield_a_single_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("race.db").to_str().unwrap().to_string();
    {
        let store = ScenarioStore::open(&path).unwrap();
        store.migrate().unwrap();
    }
    let results = RoiCalculator::default().compute(&inputs());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let path = path.clone();
            std::thread::spawn(move || {
                let store = ScenarioStore::open(&path).unwrap();
                store.save("contested", &inputs(), &results)
            })
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let created = outcomes.iter().filter(|o| o.is_ok()).count();
    let duplicates = outcomes
        .iter()
        .filter(|o| matches!(o, Err(RoiError::DuplicateName { .. })))
        .count();

    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
    assert_eq!(ScenarioStore::open(&path).unwrap().count().unwrap(), 1);
}
