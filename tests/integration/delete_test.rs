//! Integration tests for deletion and reference-count semantics.

use uuid::Uuid;

use vault_core::error::ErrorKind;
use vault_core::types::query::SearchQuery;

use crate::helpers::TestVault;

#[tokio::test]
async fn test_delete_unknown_record_is_not_found() {
    let vault = TestVault::new().await;

    let err = vault.files.delete(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_last_reference_purges_blob() {
    let vault = TestVault::new().await;
    let (record, _) = vault
        .upload_bytes("solo.txt", "text/plain", b"only copy")
        .await;

    assert!(vault.store.exists(&record.content_hash).await.unwrap());

    let outcome = vault.files.delete(record.id).await.unwrap();
    assert!(outcome.blob_released);
    assert_eq!(outcome.remaining_references, 0);

    assert!(!vault.store.exists(&record.content_hash).await.unwrap());
    assert!(vault.dedup.entry(&record.content_hash).await.unwrap().is_none());

    let err = vault.files.get(record.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_keeps_blob_shared_by_other_records() {
    let vault = TestVault::new().await;
    let (first, _) = vault
        .upload_bytes("one.txt", "text/plain", b"shared bytes")
        .await;
    let (second, _) = vault
        .upload_bytes("two.txt", "text/plain", b"shared bytes")
        .await;

    let outcome = vault.files.delete(second.id).await.unwrap();
    assert!(!outcome.blob_released);
    assert_eq!(outcome.remaining_references, 1);

    assert!(vault.store.exists(&first.content_hash).await.unwrap());
    let (_, content) = vault.files.download_bytes(first.id).await.unwrap();
    assert_eq!(content.as_ref(), b"shared bytes");
}

#[tokio::test]
async fn test_deleting_canonical_promotes_oldest_survivor() {
    let vault = TestVault::new().await;
    let (first, _) = vault
        .upload_bytes("a.txt", "text/plain", b"promoted content")
        .await;
    let (second, _) = vault
        .upload_bytes("b.txt", "text/plain", b"promoted content")
        .await;
    let (third, _) = vault
        .upload_bytes("c.txt", "text/plain", b"promoted content")
        .await;

    vault.files.delete(first.id).await.unwrap();

    let entry = vault
        .dedup
        .entry(&first.content_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.canonical_id, second.id);
    assert_eq!(entry.reference_count, 2);

    let promoted = vault.files.get(second.id).await.unwrap();
    assert!(!promoted.is_duplicate);
    assert_eq!(promoted.canonical_reference_id, None);

    let repointed = vault.files.get(third.id).await.unwrap();
    assert!(repointed.is_duplicate);
    assert_eq!(repointed.canonical_reference_id, Some(second.id));

    // Content is still downloadable through the promoted record.
    let (_, content) = vault.files.download_bytes(second.id).await.unwrap();
    assert_eq!(content.as_ref(), b"promoted content");
}

#[tokio::test]
async fn test_deleted_record_disappears_from_search() {
    let vault = TestVault::new().await;
    let (record, _) = vault
        .upload_bytes("gone.txt", "text/plain", b"soon deleted")
        .await;
    vault.upload_bytes("kept.txt", "text/plain", b"kept").await;

    vault.files.delete(record.id).await.unwrap();

    let page = vault.query.search(&SearchQuery::default()).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.results[0].original_filename, "kept.txt");
}

#[tokio::test]
async fn test_delete_is_not_idempotent() {
    let vault = TestVault::new().await;
    let (record, _) = vault
        .upload_bytes("once.txt", "text/plain", b"delete me once")
        .await;

    vault.files.delete(record.id).await.unwrap();
    let err = vault.files.delete(record.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
