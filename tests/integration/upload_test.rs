//! Integration tests for upload and deduplication behavior.

use bytes::Bytes;
use futures::StreamExt;
use sha2::{Digest, Sha256};

use vault_core::config::storage::StorageConfig;
use vault_core::error::ErrorKind;
use vault_service::{UploadRequest, UploadService};

use crate::helpers::TestVault;

#[tokio::test]
async fn test_duplicate_upload_shares_content() {
    let vault = TestVault::new().await;

    let (first, first_outcome) = vault
        .upload_bytes("report.pdf", "application/pdf", b"quarterly numbers")
        .await;
    let (second, second_outcome) = vault
        .upload_bytes("report_final.pdf", "application/pdf", b"quarterly numbers")
        .await;

    assert!(first_outcome.is_new);
    assert!(!second_outcome.is_new);
    assert_ne!(first.id, second.id);
    assert_eq!(first.content_hash, second.content_hash);
    assert!(!first.is_duplicate);
    assert!(second.is_duplicate);
    assert_eq!(second.canonical_reference_id, Some(first.id));
    assert_eq!(second_outcome.reference_count, 2);

    let entry = vault
        .dedup
        .entry(&first.content_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.reference_count, 2);
    assert_eq!(entry.canonical_id, first.id);
}

#[tokio::test]
async fn test_distinct_content_gets_distinct_entries() {
    let vault = TestVault::new().await;

    let (first, _) = vault.upload_bytes("a.txt", "text/plain", b"alpha").await;
    let (second, _) = vault.upload_bytes("b.txt", "text/plain", b"beta").await;

    assert_ne!(first.content_hash, second.content_hash);
    assert!(!second.is_duplicate);

    let totals = vault.dedup.savings_totals().await.unwrap();
    assert_eq!(totals.distinct_hashes, 2);
    assert_eq!(totals.bytes_saved, 0);
}

#[tokio::test]
async fn test_round_trip_preserves_bytes() {
    let vault = TestVault::new().await;
    let data = b"the exact bytes that went in must come back out";

    let (record, _) = vault
        .upload_bytes("roundtrip.bin", "application/octet-stream", data)
        .await;

    let expected_hash = format!("{:x}", Sha256::digest(data));
    assert_eq!(record.content_hash, expected_hash);
    assert_eq!(record.size_bytes, data.len() as i64);

    let (fetched, content) = vault.files.download_bytes(record.id).await.unwrap();
    assert_eq!(fetched.id, record.id);
    assert_eq!(content.as_ref(), data);
}

#[tokio::test]
async fn test_concurrent_identical_uploads_agree_on_one_canonical() {
    let vault = TestVault::new().await;
    let data = Bytes::from_static(b"raced content");

    let service_a = vault.upload.clone();
    let service_b = vault.upload.clone();

    let (a, b) = tokio::join!(
        service_a.upload(UploadRequest {
            filename: "a.bin".to_string(),
            media_type: None,
            data: data.clone(),
        }),
        service_b.upload(UploadRequest {
            filename: "b.bin".to_string(),
            media_type: None,
            data: data.clone(),
        }),
    );

    let (record_a, outcome_a) = a.unwrap();
    let (record_b, outcome_b) = b.unwrap();

    assert!(outcome_a.is_new ^ outcome_b.is_new);
    assert_eq!(outcome_a.canonical_id, outcome_b.canonical_id);
    assert_eq!(record_a.content_hash, record_b.content_hash);

    let entry = vault
        .dedup
        .entry(&record_a.content_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.reference_count, 2);
}

#[tokio::test]
async fn test_upload_rejects_empty_content_and_blank_filename() {
    let vault = TestVault::new().await;

    let err = vault
        .upload
        .upload(UploadRequest {
            filename: "empty.bin".to_string(),
            media_type: None,
            data: Bytes::new(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .upload
        .upload(UploadRequest {
            filename: "   ".to_string(),
            media_type: None,
            data: Bytes::from_static(b"content"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_upload_respects_size_limit() {
    let vault = TestVault::new().await;

    let capped = UploadService::new(
        vault.dedup.clone(),
        vault.store.clone(),
        StorageConfig {
            max_upload_size_bytes: 8,
            ..StorageConfig::default()
        },
    );

    let err = capped
        .upload(UploadRequest {
            filename: "big.bin".to_string(),
            media_type: None,
            data: Bytes::from_static(b"sixteen bytes!!!"),
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let totals = vault.dedup.savings_totals().await.unwrap();
    assert_eq!(totals.total_references, 0);
}

#[tokio::test]
async fn test_streamed_upload_matches_buffered_upload() {
    let vault = TestVault::new().await;
    let data = b"chunked on the way in, identical once stored";

    let (buffered, _) = vault
        .upload_bytes("buffered.bin", "application/octet-stream", data)
        .await;

    let chunks: Vec<Result<Bytes, std::io::Error>> = data
        .chunks(7)
        .map(|c| Ok(Bytes::copy_from_slice(c)))
        .collect();
    let stream = futures::stream::iter(chunks).boxed();

    let (streamed, outcome) = vault
        .upload
        .upload_stream("streamed.bin", None, stream)
        .await
        .unwrap();

    assert_eq!(streamed.content_hash, buffered.content_hash);
    assert!(!outcome.is_new);
    assert_eq!(outcome.reference_count, 2);
}

#[tokio::test]
async fn test_upload_round_trips_through_memory_store() {
    let vault = TestVault::with_memory_store().await;
    let data = b"kept entirely in memory";

    assert_eq!(vault.store.provider_type(), "memory");

    let (record, _) = vault.upload_bytes("mem.bin", "application/octet-stream", data).await;
    let (_, content) = vault.files.download_bytes(record.id).await.unwrap();
    assert_eq!(content.as_ref(), data);
}
