use bridge_store::{load_snapshot, save_snapshot, FileStateStore, Migrator, StateStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Ledger {
    executed: Vec<u64>,
}

#[test]
fn snapshot_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    {
        let store = FileStateStore::open(dir.path()).unwrap();
        Migrator::run(&store).unwrap();
        save_snapshot(&store, "remote_state", &Ledger { executed: vec![1, 4] }).unwrap();
    }

    let store = FileStateStore::open(dir.path()).unwrap();
    Migrator::run(&store).unwrap();
    let ledger: Ledger = load_snapshot(&store, "remote_state").unwrap().unwrap();
    assert_eq!(ledger.executed, vec![1, 4]);
}

#[test]
fn keys_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStateStore::open(dir.path()).unwrap();
    save_snapshot(&store, "home_state", &Ledger { executed: vec![1] }).unwrap();
    save_snapshot(&store, "remote_state", &Ledger { executed: vec![2] }).unwrap();
    store.delete_blob("home_state").unwrap();

    assert!(load_snapshot::<Ledger>(&store, "home_state").unwrap().is_none());
    assert_eq!(
        load_snapshot::<Ledger>(&store, "remote_state").unwrap().unwrap().executed,
        vec![2]
    );
}
