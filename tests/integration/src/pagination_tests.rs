//! Cursor walks across the whole table

use crate::test_utils::{fleet, malformed_record, memory_service};
use launchcore_core::{FilterRequest, LaunchPage};
use launchcore_query::{Cursor, LaunchQueryService, MemoryStore, QueryError};

/// Follow cursors from the first page until `has_more` is false.
async fn walk<F, Fut>(mut fetch: F) -> Vec<LaunchPage>
where
    F: FnMut(Option<Cursor>) -> Fut,
    Fut: std::future::Future<Output = Result<LaunchPage, QueryError>>,
{
    let mut pages = Vec::new();
    let mut cursor = None;
    loop {
        let page = fetch(cursor.clone()).await.unwrap();
        let more = page.has_more;
        cursor = Cursor::from_token(page.last_evaluated_key.as_deref());
        pages.push(page);
        if !more {
            return pages;
        }
        assert!(cursor.is_some(), "has_more without a cursor");
        assert!(pages.len() < 100, "pagination did not terminate");
    }
}

fn all_ids(pages: &[LaunchPage]) -> Vec<String> {
    let mut ids: Vec<String> = pages
        .iter()
        .flat_map(|p| p.launches.iter().map(|l| l.id.clone()))
        .collect();
    ids.sort();
    ids
}

fn assert_cursor_never_repeats(pages: &[LaunchPage]) {
    for pair in pages.windows(2) {
        let cursor = pair[0].last_evaluated_key.as_deref().unwrap();
        assert!(
            pair[1].launches.iter().all(|l| l.id != cursor),
            "page after cursor {cursor} returned it again"
        );
    }
}

#[tokio::test]
async fn test_list_walk_visits_every_launch_once() {
    let mut records = fleet();
    records.push(malformed_record("L05b"));
    let service: LaunchQueryService<MemoryStore> = memory_service(records);

    let pages = walk(|cursor| service.list(4, cursor)).await;

    assert_eq!(pages.len(), 4);
    assert_cursor_never_repeats(&pages);
    let expected: Vec<String> = (1..=12).map(|n| format!("L{n:02}")).collect();
    assert_eq!(all_ids(&pages), expected);
    assert_eq!(pages.last().unwrap().last_evaluated_key, None);
}

#[tokio::test]
async fn test_filter_walk_can_yield_empty_pages() {
    let service = memory_service(fleet());
    let walk_pages = walk(|cursor| {
        let request = FilterRequest {
            rocket_name: Some("Falcon 1".to_string()),
            limit: Some(2),
            last_evaluated_key: cursor.map(Cursor::into_token),
            ..FilterRequest::default()
        };
        let service = &service;
        async move { service.filter(&request).await }
    })
    .await;

    assert_cursor_never_repeats(&walk_pages);
    // limit counts examined records, so later pages hold no matches
    assert!(walk_pages.iter().any(|p| p.count == 0 && p.has_more));
    assert_eq!(all_ids(&walk_pages), vec!["L01", "L02", "L03"]);
}

#[tokio::test]
async fn test_empty_cursor_starts_from_beginning() {
    let service = memory_service(fleet());
    let from_empty = service
        .list(3, Cursor::from_token(Some("")))
        .await
        .unwrap();
    let from_none = service.list(3, None).await.unwrap();
    assert_eq!(from_empty, from_none);
}
