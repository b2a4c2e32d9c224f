//! Restart tests: a registry reopened over the same database file must
//! reproduce identical enumeration and lookup results.

use origin_domain::{ContentFingerprint, CreatorId, DerivativeRequest};
use origin_store::{Registry, RegistryConfig, RegistryError};
use tempfile::TempDir;

fn fp(byte: u8) -> ContentFingerprint {
    ContentFingerprint::from_bytes([byte; 64])
}

fn creator(name: &str) -> CreatorId {
    CreatorId::new(name).unwrap()
}

#[test]
fn test_reopen_preserves_order_and_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("origin.db");

    let (fingerprints, page, parent_id) = {
        let registry = Registry::open(&path, RegistryConfig::default()).unwrap();
        let parent = registry.insert(fp(5), "cid-5", "Oslo", "NTB", creator("alice")).unwrap();
        registry.insert(fp(2), "cid-2", "Bergen", "NTB", creator("bob")).unwrap();
        registry
            .insert_derivative(
                &parent,
                DerivativeRequest::new(fp(9), "cid-9", "cropped", creator("alice")),
            )
            .unwrap();

        (
            registry.list_all_fingerprints(),
            registry.paginate(0, 10).unwrap(),
            parent.record_id(),
        )
    };

    let reopened = Registry::open(&path, RegistryConfig::default()).unwrap();
    assert_eq!(reopened.list_all_fingerprints(), fingerprints);
    assert_eq!(reopened.paginate(0, 10).unwrap(), page);
    assert_eq!(reopened.count(), 3);

    let child = reopened.lookup(&fp(9)).unwrap();
    assert_eq!(child.parent_id(), Some(parent_id));
    assert_eq!(child.edit_type(), "cropped");
    assert_eq!(reopened.list_by_creator(&creator("alice")).len(), 2);
}

#[test]
fn test_duplicates_rejected_after_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("origin.db");

    {
        let registry = Registry::open(&path, RegistryConfig::default()).unwrap();
        registry.insert(fp(1), "cid-1", "", "", creator("alice")).unwrap();
    }

    let reopened = Registry::open(&path, RegistryConfig::default()).unwrap();
    let result = reopened.insert(fp(1), "cid-1", "", "", creator("alice"));
    assert!(matches!(result, Err(RegistryError::DuplicateFingerprint(_))));
    assert_eq!(reopened.count(), 1);
}

#[test]
fn test_handles_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("origin.db");

    {
        let registry = Registry::open(&path, RegistryConfig::default()).unwrap();
        registry.insert(fp(1), "cid-1", "Lagos", "AFP", creator("alice")).unwrap();
    }

    let reopened = Registry::open(&path, RegistryConfig::default()).unwrap();
    let parent = reopened.handle(&fp(1)).unwrap();
    let child = reopened
        .insert_derivative(&parent, DerivativeRequest::new(fp(2), "cid-2", "resized", creator("bob")))
        .unwrap();

    assert_eq!(child.record().location_tag(), "Lagos");
    assert_eq!(reopened.lineage(&fp(2)).unwrap().len(), 2);
}
