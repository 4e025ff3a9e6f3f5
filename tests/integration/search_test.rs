//! Integration tests for catalog search, filtering, and pagination.

use chrono::Utc;
use uuid::Uuid;

use vault_core::error::ErrorKind;
use vault_core::types::pagination::PageRequest;
use vault_core::types::query::{DateRange, SearchQuery, SizeRange};
use vault_core::types::sorting::{SortKey, SortOrder};

use crate::helpers::TestVault;

fn by_name(text: Option<&str>) -> SearchQuery {
    SearchQuery {
        text_query: text.map(str::to_string),
        sort_by: SortKey::OriginalFilename,
        sort_order: SortOrder::Asc,
        ..SearchQuery::default()
    }
}

#[tokio::test]
async fn test_search_matches_filename_substring() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("report.pdf", "application/pdf", b"annual report")
        .await;
    vault
        .upload_bytes("report_final.pdf", "application/pdf", b"annual report")
        .await;
    vault
        .upload_bytes("photo.jpg", "image/jpeg", b"pixels")
        .await;

    let page = vault.query.search(&by_name(Some("report"))).await.unwrap();
    assert_eq!(page.pagination.total, 2);
    assert!(page
        .results
        .iter()
        .all(|r| r.original_filename.contains("report")));

    // Case-insensitive match on the same rows.
    let upper = vault.query.search(&by_name(Some("REPORT"))).await.unwrap();
    assert_eq!(upper.pagination.total, 2);
}

#[tokio::test]
async fn test_search_filters_compose_with_and() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("notes.txt", "text/plain", b"tiny")
        .await;
    vault
        .upload_bytes("novel.txt", "text/plain", b"a much longer text body")
        .await;
    vault
        .upload_bytes("novel.pdf", "application/pdf", b"a much longer pdf body!")
        .await;

    let query = SearchQuery {
        text_query: Some("novel".to_string()),
        file_type: Some("text/plain".to_string()),
        size_range: SizeRange {
            min: Some(10),
            max: None,
        },
        ..SearchQuery::default()
    };

    let page = vault.query.search(&query).await.unwrap();
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.results[0].original_filename, "novel.txt");
}

#[tokio::test]
async fn test_pagination_pages_concatenate_without_overlap() {
    let vault = TestVault::new().await;
    for i in 0..7 {
        vault
            .upload_bytes(
                &format!("f{i}.txt"),
                "text/plain",
                format!("content {i}").as_bytes(),
            )
            .await;
    }

    let mut seen: Vec<Uuid> = Vec::new();
    for page_number in 1..=3 {
        let query = SearchQuery {
            page: PageRequest::new(page_number, 3),
            ..by_name(None)
        };
        let page = vault.query.search(&query).await.unwrap();

        assert_eq!(page.pagination.total, 7);
        assert_eq!(page.pagination.total_pages, 3);
        assert_eq!(page.pagination.has_previous, page_number > 1);
        assert_eq!(page.pagination.has_next, page_number < 3);
        assert_eq!(page.results.len(), if page_number < 3 { 3 } else { 1 });

        seen.extend(page.results.iter().map(|r| r.id));
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 7);
}

#[tokio::test]
async fn test_page_past_the_end_is_empty_not_an_error() {
    let vault = TestVault::new().await;
    vault.upload_bytes("only.txt", "text/plain", b"one").await;

    let query = SearchQuery {
        page: PageRequest::new(5, 10),
        ..SearchQuery::default()
    };
    let page = vault.query.search(&query).await.unwrap();

    assert!(page.results.is_empty());
    assert_eq!(page.pagination.total, 1);
    assert_eq!(page.pagination.total_pages, 1);
    assert!(!page.pagination.has_next);
    assert!(page.pagination.has_previous);
}

#[tokio::test]
async fn test_inverted_size_range_matches_nothing() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("mid.bin", "application/octet-stream", &[0u8; 64])
        .await;

    let query = SearchQuery {
        size_range: SizeRange {
            min: Some(1000),
            max: Some(10),
        },
        ..SearchQuery::default()
    };
    let page = vault.query.search(&query).await.unwrap();

    assert!(page.results.is_empty());
    assert_eq!(page.pagination.total, 0);
    assert_eq!(page.pagination.total_pages, 0);
}

#[tokio::test]
async fn test_date_range_is_inclusive_of_today() {
    let vault = TestVault::new().await;
    vault.upload_bytes("today.txt", "text/plain", b"now").await;

    let today = Utc::now().date_naive();
    let tomorrow = today.succ_opt().unwrap();

    let query = SearchQuery {
        date_range: DateRange {
            start: Some(today),
            end: Some(today),
        },
        ..SearchQuery::default()
    };
    assert_eq!(vault.query.search(&query).await.unwrap().pagination.total, 1);

    let query = SearchQuery {
        date_range: DateRange {
            start: Some(tomorrow),
            end: None,
        },
        ..SearchQuery::default()
    };
    assert_eq!(vault.query.search(&query).await.unwrap().pagination.total, 0);
}

#[tokio::test]
async fn test_search_is_idempotent() {
    let vault = TestVault::new().await;
    for i in 0..4 {
        vault
            .upload_bytes(
                &format!("stable{i}.log"),
                "text/plain",
                format!("line {i}").as_bytes(),
            )
            .await;
    }

    let query = by_name(Some("stable"));
    let first: Vec<Uuid> = vault
        .query
        .search(&query)
        .await
        .unwrap()
        .results
        .iter()
        .map(|r| r.id)
        .collect();
    let second: Vec<Uuid> = vault
        .query
        .search(&query)
        .await
        .unwrap()
        .results
        .iter()
        .map(|r| r.id)
        .collect();

    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[tokio::test]
async fn test_zero_page_is_rejected() {
    let vault = TestVault::new().await;

    let query = SearchQuery {
        page: PageRequest::new(0, 10),
        ..SearchQuery::default()
    };
    let err = vault.query.search(&query).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let query = SearchQuery {
        page: PageRequest::new(1, 0),
        ..SearchQuery::default()
    };
    let err = vault.query.search(&query).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_sort_by_size_ascending() {
    let vault = TestVault::new().await;
    vault
        .upload_bytes("large.bin", "application/octet-stream", &[1u8; 300])
        .await;
    vault
        .upload_bytes("small.bin", "application/octet-stream", &[1u8; 10])
        .await;
    vault
        .upload_bytes("medium.bin", "application/octet-stream", &[1u8; 50])
        .await;

    let query = SearchQuery {
        sort_by: SortKey::SizeBytes,
        sort_order: SortOrder::Asc,
        ..SearchQuery::default()
    };
    let page = vault.query.search(&query).await.unwrap();

    let sizes: Vec<i64> = page.results.iter().map(|r| r.size_bytes).collect();
    assert_eq!(sizes, vec![10, 50, 300]);
}
