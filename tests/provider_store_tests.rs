use biops::{BiopsError, Provider, ProviderKind, ProviderStore};
use tempfile::TempDir;

fn store_in(dir: &TempDir) -> ProviderStore {
    ProviderStore::new(dir.path().join("store").join("providers.json"))
}

fn provider(name: &str) -> Provider {
    Provider {
        name: name.to_string(),
        kind: ProviderKind::Redash,
        url: "example.com".to_string(),
        credential: "example".to_string(),
        current: false,
    }
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn test_no_active_provider_is_a_configuration_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let err = store.current().unwrap_err();
    assert!(matches!(err, BiopsError::Configuration(_)));
}

#[test]
fn test_add_makes_provider_current() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.add(provider("first")).unwrap();
    store.add(provider("second")).unwrap();

    let current = store.current().unwrap();
    assert_eq!(current.name, "second");

    let providers = store.load().unwrap();
    assert_eq!(providers.len(), 2);
    assert!(!providers[0].current);
    assert!(providers[1].current);
}

#[test]
fn test_add_duplicate_name_rejected() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.add(provider("dup")).unwrap();
    let err = store.add(provider("dup")).unwrap_err();
    assert!(matches!(err, BiopsError::Provider(_)));
}

#[test]
fn test_use_switches_current() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.add(provider("first")).unwrap();
    store.add(provider("second")).unwrap();
    store.use_provider("first").unwrap();

    assert_eq!(store.current().unwrap().name, "first");
}

#[test]
fn test_use_unknown_provider_rejected() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let err = store.use_provider("ghost").unwrap_err();
    assert!(matches!(err, BiopsError::Provider(_)));
}

#[test]
fn test_delete_removes_provider() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.add(provider("first")).unwrap();
    store.add(provider("second")).unwrap();
    store.delete("second").unwrap();

    let providers = store.load().unwrap();
    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].name, "first");
}

#[test]
fn test_delete_unknown_provider_rejected() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let err = store.delete("ghost").unwrap_err();
    assert!(matches!(err, BiopsError::Provider(_)));
}

#[test]
fn test_round_trip_preserves_fields() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    let mut p = provider("redash-prod");
    p.kind = ProviderKind::Metabase;
    store.add(p).unwrap();

    let loaded = store.current().unwrap();
    assert_eq!(loaded.kind, ProviderKind::Metabase);
    assert_eq!(loaded.url, "example.com");
    assert_eq!(loaded.credential, "example");
}

#[cfg(unix)]
#[test]
fn test_saved_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.add(provider("first")).unwrap();

    let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}
