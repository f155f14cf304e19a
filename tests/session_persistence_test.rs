//! Durable session state across process restarts.
//!
//! Exercises the storage and state stack the way the binary wires it:
//! config file pointing at a storage directory, a user store under that
//! directory, and a state store whose user cell persists through it.

use std::fs;
use std::sync::{Arc, Mutex};

use smelterdeck::config::DeckConfig;
use smelterdeck::state::StateStore;
use smelterdeck::storage::{LocalStore, StoredUser, UserCreds, UserStore};
use tempfile::TempDir;

fn store_under(temp_dir: &TempDir) -> UserStore {
    UserStore::new(LocalStore::new(temp_dir.path().join("deck")))
}

// =============================================================================
// Raw key-value store
// =============================================================================

#[test]
fn test_raw_values_survive_store_instances() {
    let temp_dir = TempDir::new().unwrap();
    let dir = temp_dir.path().join("deck");

    let store = LocalStore::new(dir.clone());
    assert!(store.write_raw("favorites", r#"["jobs","queue"]"#));

    let reopened = LocalStore::new(dir);
    assert_eq!(
        reopened.read_raw("favorites").as_deref(),
        Some(r#"["jobs","queue"]"#)
    );

    assert!(reopened.remove("favorites"));
    assert!(reopened.read_raw("favorites").is_none());
}

#[test]
fn test_keys_map_to_separate_files() {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path().join("deck"));

    store.write_raw("alpha", "1");
    store.write_raw("beta", "2");

    assert!(store.key_path("alpha").exists());
    assert!(store.key_path("beta").exists());
    assert_ne!(store.key_path("alpha"), store.key_path("beta"));
}

// =============================================================================
// User record round trips
// =============================================================================

#[test]
fn test_user_creds_round_trip() {
    let temp_dir = TempDir::new().unwrap();

    let creds = UserCreds {
        username: "operator".to_string(),
        is_admin: true,
    };
    assert!(store_under(&temp_dir).save(&creds));

    let loaded = store_under(&temp_dir).load();
    match loaded {
        Some(StoredUser::Creds(stored)) => assert_eq!(stored, creds),
        other => panic!("expected stored creds, got {:?}", other),
    }
}

#[test]
fn test_cleared_user_stays_cleared() {
    let temp_dir = TempDir::new().unwrap();

    let store = store_under(&temp_dir);
    store.save(&UserCreds {
        username: "operator".to_string(),
        is_admin: false,
    });
    assert!(store.clear());

    assert!(store_under(&temp_dir).load().is_none());
}

#[test]
fn test_unparseable_record_loads_as_opaque() {
    let temp_dir = TempDir::new().unwrap();

    let store = store_under(&temp_dir);
    let path = store.user_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not json at all").unwrap();

    match store.load() {
        Some(StoredUser::Opaque(raw)) => {
            assert_eq!(raw, "not json at all");
        }
        other => panic!("expected opaque record, got {:?}", other),
    }

    // Opaque records never grant admin.
    let stored = store.load().unwrap();
    assert!(!stored.is_admin());
    assert!(stored.creds().is_none());
}

// =============================================================================
// State store over durable storage
// =============================================================================

#[test]
fn test_state_store_user_survives_restart() {
    let temp_dir = TempDir::new().unwrap();

    {
        let state = StateStore::with_user_store(store_under(&temp_dir));
        state.set_user_creds(Some(UserCreds {
            username: "admin".to_string(),
            is_admin: true,
        }));
    }

    let reopened = StateStore::with_user_store(store_under(&temp_dir));
    assert!(reopened.is_admin());
    assert_eq!(reopened.user_creds().unwrap().username, "admin");
}

#[test]
fn test_user_cell_notifies_on_sign_out() {
    let temp_dir = TempDir::new().unwrap();
    let state = StateStore::with_user_store(store_under(&temp_dir));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_in_cb = seen.clone();
    state.user().subscribe(move |user| {
        seen_in_cb.lock().unwrap().push(user.is_some());
    });

    state.set_user_creds(Some(UserCreds {
        username: "admin".to_string(),
        is_admin: true,
    }));
    state.set_user_creds(None);

    assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    assert!(store_under(&temp_dir).load().is_none());
}

// =============================================================================
// Config file to state store, the binary's startup path
// =============================================================================

#[test]
fn test_config_storage_dir_feeds_the_user_store() {
    let temp_dir = TempDir::new().unwrap();
    let storage_dir = temp_dir.path().join("deck-state");

    let config_path = temp_dir.path().join("deck.json");
    fs::write(
        &config_path,
        format!(
            r#"{{"api_root": "http://smelter:8000/api", "storage_dir": {:?}}}"#,
            storage_dir
        ),
    )
    .unwrap();

    let config = DeckConfig::load(Some(&config_path));
    assert_eq!(config.api_root, "http://smelter:8000/api");
    // Fields absent from the file keep their defaults.
    assert_eq!(config.api_version, "v4");
    assert_eq!(config.queue_thresholds.danger, 16);

    let dir = config.storage_dir.expect("storage dir not loaded");
    {
        let state = StateStore::with_user_store(UserStore::new(LocalStore::new(dir.clone())));
        state.set_user_creds(Some(UserCreds {
            username: "operator".to_string(),
            is_admin: false,
        }));
    }

    let reopened = StateStore::with_user_store(UserStore::new(LocalStore::new(dir)));
    let creds = reopened.user_creds().unwrap();
    assert_eq!(creds.username, "operator");
    assert!(!reopened.is_admin());
}
