//! Query façade behavior over a realistic launch table

use crate::test_utils::{fleet, launch_record, malformed_record, memory_service};
use launchcore_core::timestamp::parse_iso8601;
use launchcore_core::{FilterRequest, LaunchPage, LaunchStatus};
use launchcore_query::{LaunchQueryService, MemoryStore, QueryError};
use serde_json::json;
use std::collections::BTreeSet;

fn ids(page: &LaunchPage) -> Vec<&str> {
    page.launches.iter().map(|l| l.id.as_str()).collect()
}

#[tokio::test]
async fn test_malformed_record_excluded_from_batch() {
    let mut records: Vec<_> = (1..=5)
        .map(|n| {
            launch_record(
                &format!("ok-{n}"),
                &format!("Mission {n}"),
                "Falcon 9",
                &format!("2020-0{n}-01T00:00:00+00:00"),
                "success",
                n,
            )
        })
        .collect();
    records.push(malformed_record("broken"));

    let service = memory_service(records);
    let page = service.list(100, None).await.unwrap();

    assert_eq!(page.count, 5);
    assert!(page.launches.iter().all(|l| l.id != "broken"));
}

#[tokio::test]
async fn test_inverted_range_rejected_without_store_call() {
    let service = memory_service(fleet());
    let start = parse_iso8601("2024-02-01").unwrap();
    let end = parse_iso8601("2024-01-01").unwrap();

    let err = service
        .list_by_date_range(start, end, 100, None)
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::InvalidRange(_)));
    assert_eq!(service.factory().sessions_opened(), 0);
}

#[tokio::test]
async fn test_lookup_of_unknown_id_is_absent() {
    let service = memory_service(fleet());
    assert_eq!(service.get("L99").await.unwrap(), None);

    let found = service.get("L08").await.unwrap().unwrap();
    assert_eq!(found.mission_name, "FH Demo");
    assert_eq!(found.status, LaunchStatus::Success);
}

#[tokio::test]
async fn test_summary_of_empty_table() {
    let service = memory_service(Vec::new());
    let summary = service.summary().await.unwrap();

    assert_eq!(summary.total_launches, 0);
    assert_eq!(summary.success_rate, 0.0);
    assert!(summary.most_used_rockets.is_empty());
}

#[tokio::test]
async fn test_summary_of_fleet() {
    let service = memory_service(fleet());
    let summary = service.summary().await.unwrap();

    assert_eq!(summary.total_launches, 12);
    assert_eq!(summary.successful_launches, 8);
    assert_eq!(summary.failed_launches, 3);
    assert_eq!(summary.upcoming_launches, 1);
    assert_eq!(summary.success_rate, 66.67);

    let rockets: Vec<_> = summary
        .most_used_rockets
        .iter()
        .map(|r| (r.rocket_name.as_str(), r.count))
        .collect();
    assert_eq!(
        rockets,
        vec![("Falcon 9", 7), ("Falcon 1", 3), ("Starship", 1), ("Falcon Heavy", 1)]
    );
}

#[tokio::test]
async fn test_repeated_query_is_idempotent() {
    let service = memory_service(fleet());
    let request = FilterRequest {
        rocket_name: Some("Falcon".to_string()),
        limit: Some(5),
        ..FilterRequest::default()
    };

    let first = service.filter(&request).await.unwrap();
    let second = service.filter(&request).await.unwrap();

    let a: BTreeSet<_> = ids(&first).into_iter().collect();
    let b: BTreeSet<_> = ids(&second).into_iter().collect();
    assert_eq!(a, b);
    assert_eq!(first.last_evaluated_key, second.last_evaluated_key);
}

#[tokio::test]
async fn test_filter_by_site_and_mission() {
    let service = memory_service(fleet());

    let by_site = FilterRequest {
        launch_site: Some("CCAFS".to_string()),
        ..FilterRequest::default()
    };
    assert_eq!(ids(&service.filter(&by_site).await.unwrap()), vec!["L11", "L09"]);

    let by_mission = FilterRequest {
        mission_name: Some("Starlink".to_string()),
        ..FilterRequest::default()
    };
    assert_eq!(ids(&service.filter(&by_mission).await.unwrap()), vec!["L11", "L09"]);

    // empty strings are unset
    let blank = FilterRequest {
        mission_name: Some(String::new()),
        ..FilterRequest::default()
    };
    assert_eq!(service.filter(&blank).await.unwrap().count, 12);
}

#[tokio::test]
async fn test_date_range_is_inclusive() {
    let service = memory_service(fleet());
    let page = service
        .list_by_date_range(
            parse_iso8601("2015-06-28T14:21:00+00:00").unwrap(),
            parse_iso8601("2015-12-22T01:29:00+00:00").unwrap(),
            100,
            None,
        )
        .await
        .unwrap();
    assert_eq!(ids(&page), vec!["L06", "L07"]);
}

#[tokio::test]
async fn test_json_export_is_queryable() {
    let export = json!([
        {
            "launch_id": "e1",
            "mission_name": "Bangabandhu-1",
            "rocket_name": "Falcon 9",
            "launch_date": "2018-05-11T20:14:00+00:00",
            "status": "success",
            "flight_number": 58.0,
            "payload": {"mass_kg": 3600.5, "orbits": [1, 2]}
        },
        {
            "launch_id": "e2",
            "mission_name": "Zuma",
            "rocket_name": "Falcon 9",
            "launch_date": "2018-01-08T01:00:00Z",
            "status": "success",
            "flight_number": "49"
        },
        {
            "launch_id": "e3",
            "mission_name": "AMOS-6",
            "rocket_name": "Falcon 9",
            "launch_date": "2016-09-01T13:07:00+00:00",
            "status": "failed",
            "flight_number": 28.5
        }
    ]);
    let service = LaunchQueryService::new(MemoryStore::from_json(&export).unwrap());
    let page = service.list(100, None).await.unwrap();

    // fractional flight number makes e3 invalid
    assert_eq!(ids(&page), vec!["e1", "e2"]);
    assert_eq!(page.launches[0].flight_number, Some(58));
    assert_eq!(page.launches[1].flight_number, Some(49));
}

#[tokio::test]
async fn test_offset_date_bounds_select_chronologically() {
    let service = memory_service(fleet());

    // 2015-06-28T16:21+02:00 is exactly L06; 2015-12-21T20:29-05:00 is exactly L07
    let page = service
        .list_by_date_range(
            parse_iso8601("2015-06-28T16:21:00+02:00").unwrap(),
            parse_iso8601("2015-12-21T20:29:00-05:00").unwrap(),
            100,
            None,
        )
        .await
        .unwrap();
    assert_eq!(ids(&page), vec!["L06", "L07"]);

    let request = FilterRequest {
        rocket_name: Some("Falcon 9".to_string()),
        start_date: parse_iso8601("2015-06-28T16:22:00+02:00"),
        end_date: parse_iso8601("2015-12-21T20:28:00-05:00"),
        ..FilterRequest::default()
    };
    assert!(service.filter(&request).await.unwrap().launches.is_empty());
}
