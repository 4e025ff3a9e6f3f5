//! Integration tests for savings and statistics reporting.

use chrono::Utc;

use crate::helpers::TestVault;

#[tokio::test]
async fn test_empty_catalog_reports_zero_savings() {
    let vault = TestVault::new().await;

    let savings = vault.stats.storage_savings().await.unwrap();
    assert_eq!(savings.total_files, 0);
    assert_eq!(savings.total_duplicate_count, 0);
    assert_eq!(savings.total_bytes_saved, 0);
    assert_eq!(savings.efficiency_percentage, 0.0);
    assert_eq!(savings.formatted_bytes_saved, "0.00 B");

    let stats = vault.stats.file_stats().await.unwrap();
    assert_eq!(stats.total_files, 0);
    assert_eq!(stats.total_size, 0);
    assert_eq!(stats.duplicate_count, 0);
    assert!(stats.file_types.is_empty());
    assert_eq!(stats.size_distribution.small, 0);
    assert!(stats.date_distribution.is_empty());
}

#[tokio::test]
async fn test_savings_for_duplicate_pair() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("a.bin", "application/octet-stream", &[0u8; 100])
        .await;
    vault
        .upload_bytes("b.bin", "application/octet-stream", &[0u8; 100])
        .await;
    vault
        .upload_bytes("c.bin", "application/octet-stream", &[1u8; 40])
        .await;

    let savings = vault.stats.storage_savings().await.unwrap();
    assert_eq!(savings.total_files, 3);
    assert_eq!(savings.total_duplicate_count, 1);
    assert_eq!(savings.total_bytes_saved, 100);
    // 100 saved of 240 logical bytes.
    assert_eq!(savings.efficiency_percentage, 41.67);
    assert_eq!(savings.formatted_bytes_saved, "100.00 B");
}

#[tokio::test]
async fn test_equal_split_gives_fifty_percent_efficiency() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("x.bin", "application/octet-stream", &[7u8; 256])
        .await;
    vault
        .upload_bytes("y.bin", "application/octet-stream", &[7u8; 256])
        .await;

    let savings = vault.stats.storage_savings().await.unwrap();
    assert_eq!(savings.efficiency_percentage, 50.0);
    assert_eq!(savings.total_bytes_saved, 256);
}

#[tokio::test]
async fn test_file_stats_composes_counts_and_distributions() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("photo1.jpg", "image/jpeg", b"first image")
        .await;
    vault
        .upload_bytes("photo2.png", "image/png", b"second image")
        .await;
    vault
        .upload_bytes("notes.txt", "text/plain", b"some notes")
        .await;
    vault
        .upload_bytes("notes_copy.txt", "text/plain", b"some notes")
        .await;

    let stats = vault.stats.file_stats().await.unwrap();
    assert_eq!(stats.total_files, 4);
    assert_eq!(stats.duplicate_count, 1);
    assert_eq!(
        stats.total_size,
        (b"first image".len() + b"second image".len() + b"some notes".len() * 2) as i64
    );
    assert_eq!(stats.bytes_saved, b"some notes".len() as i64);

    // Histogram groups by main type, ordered by count.
    assert_eq!(stats.file_types[0].media_type, "image");
    assert_eq!(stats.file_types[0].count, 2);
    assert_eq!(stats.file_types[1].media_type, "text");
    assert_eq!(stats.file_types[1].count, 2);

    assert_eq!(stats.size_distribution.small, 4);
    assert_eq!(stats.size_distribution.medium, 0);
    assert_eq!(stats.size_distribution.large, 0);

    let this_month = Utc::now().format("%Y-%m").to_string();
    assert_eq!(stats.date_distribution.len(), 1);
    assert_eq!(stats.date_distribution[0].month, this_month);
    assert_eq!(stats.date_distribution[0].count, 4);
}

#[tokio::test]
async fn test_per_hash_savings() {
    let vault = TestVault::new().await;
    let (record, _) = vault
        .upload_bytes("tripled.bin", "application/octet-stream", &[9u8; 50])
        .await;
    vault
        .upload_bytes("tripled2.bin", "application/octet-stream", &[9u8; 50])
        .await;
    vault
        .upload_bytes("tripled3.bin", "application/octet-stream", &[9u8; 50])
        .await;

    let savings = vault
        .dedup
        .savings_for(&record.content_hash)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(savings.reference_count, 3);
    assert_eq!(savings.bytes_saved, 100);
}
