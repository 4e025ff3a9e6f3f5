//! Integration tests for dedup index verification and rebuild.

use vault_core::error::ErrorKind;

use crate::helpers::TestVault;

#[tokio::test]
async fn test_clean_catalog_verifies_without_drift() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("a.txt", "text/plain", b"verified content")
        .await;
    vault
        .upload_bytes("b.txt", "text/plain", b"verified content")
        .await;

    let drift = vault.reconcile.verify_index().await.unwrap();
    assert!(drift.is_empty());
}

#[tokio::test]
async fn test_verify_detects_and_rebuild_repairs_drift() {
    let vault = TestVault::new().await;
    let (record, _) = vault
        .upload_bytes("a.txt", "text/plain", b"drifting content")
        .await;
    vault
        .upload_bytes("b.txt", "text/plain", b"drifting content")
        .await;

    sqlx::query("UPDATE dedup_index SET reference_count = 5 WHERE content_hash = ?")
        .bind(&record.content_hash)
        .execute(&vault.pool)
        .await
        .unwrap();

    let drift = vault.reconcile.verify_index().await.unwrap();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].content_hash, record.content_hash);
    assert_eq!(drift[0].catalog_references, 2);
    assert_eq!(drift[0].index_references, 5);

    let summary = vault.reconcile.rebuild_index().await.unwrap();
    assert_eq!(summary.entries_removed, 1);
    assert_eq!(summary.entries_created, 1);
    assert_eq!(summary.records_updated, 2);

    assert!(vault.reconcile.verify_index().await.unwrap().is_empty());
    let entry = vault
        .dedup
        .entry(&record.content_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.reference_count, 2);
    assert_eq!(entry.canonical_id, record.id);
}

#[tokio::test]
async fn test_rebuild_restores_a_lost_index() {
    let vault = TestVault::new().await;
    let (first, _) = vault
        .upload_bytes("a.txt", "text/plain", b"first content")
        .await;
    let (dup, _) = vault
        .upload_bytes("a_copy.txt", "text/plain", b"first content")
        .await;
    vault
        .upload_bytes("b.txt", "text/plain", b"second content")
        .await;

    sqlx::query("DELETE FROM dedup_index")
        .execute(&vault.pool)
        .await
        .unwrap();

    let drift = vault.reconcile.verify_index().await.unwrap();
    assert_eq!(drift.len(), 2);
    assert!(drift.iter().all(|d| d.index_references == 0));

    let summary = vault.reconcile.rebuild_index().await.unwrap();
    assert_eq!(summary.entries_removed, 0);
    assert_eq!(summary.entries_created, 2);
    assert_eq!(summary.records_updated, 3);

    let entry = vault
        .dedup
        .entry(&first.content_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.reference_count, 2);
    assert_eq!(entry.canonical_id, first.id);

    let rebuilt_dup = vault.files.get(dup.id).await.unwrap();
    assert!(rebuilt_dup.is_duplicate);
    assert_eq!(rebuilt_dup.canonical_reference_id, Some(first.id));
}

#[tokio::test]
async fn test_release_with_missing_entry_is_a_consistency_error() {
    let vault = TestVault::new().await;
    let (record, _) = vault
        .upload_bytes("orphaned.txt", "text/plain", b"entry vanishes")
        .await;

    sqlx::query("DELETE FROM dedup_index WHERE content_hash = ?")
        .bind(&record.content_hash)
        .execute(&vault.pool)
        .await
        .unwrap();

    let err = vault.files.delete(record.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Consistency);

    // The failed release rolled back; the record is still there and a
    // rebuild makes it deletable again.
    assert!(vault.files.get(record.id).await.is_ok());
    vault.reconcile.rebuild_index().await.unwrap();
    assert!(vault.files.delete(record.id).await.is_ok());
}
