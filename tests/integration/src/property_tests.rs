//! Randomized checks of filter satisfaction, ordering and cursor walks

use crate::test_utils::{launch_record, memory_service};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use launchcore_core::timestamp::to_canonical;
use launchcore_core::{FilterRequest, Launch, LaunchStatus};
use launchcore_query::{Cursor, RawRecord};
use proptest::prelude::*;

const ROCKETS: [&str; 4] = ["Falcon 1", "Falcon 9", "Falcon Heavy", "Starship"];
const MISSIONS: [&str; 4] = ["Starlink", "CRS", "GPS III", "Crew"];

fn epoch() -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2006, 1, 1, 0, 0, 0)
        .single()
        .map(|dt| dt.fixed_offset())
        .unwrap()
}

fn day(offset: i64) -> DateTime<FixedOffset> {
    epoch() + Duration::days(offset)
}

/// The same instant as `day(offset) + minutes`, expressed in another zone.
fn shifted(offset: i64, minutes: i64, zone_hours: i32) -> DateTime<FixedOffset> {
    let zone = FixedOffset::east_opt(zone_hours * 3600).unwrap();
    (day(offset) + Duration::minutes(minutes)).with_timezone(&zone)
}

fn zone_strategy() -> impl Strategy<Value = i32> {
    prop::sample::select(vec![-11, -5, 0, 2, 9, 14])
}

fn status_strategy() -> impl Strategy<Value = LaunchStatus> {
    prop::sample::select(LaunchStatus::ALL.to_vec())
}

fn table_strategy() -> impl Strategy<Value = Vec<RawRecord>> {
    prop::collection::vec(
        (
            prop::sample::select(MISSIONS.to_vec()),
            prop::sample::select(ROCKETS.to_vec()),
            0i64..9000,
            0i64..1440,
            status_strategy(),
            1i64..400,
        ),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (mission, rocket, offset, minutes, status, flight))| {
                launch_record(
                    &format!("id-{i:03}"),
                    &format!("{mission} {i}"),
                    rocket,
                    &to_canonical(&(day(offset) + Duration::minutes(minutes))),
                    status.as_str(),
                    flight,
                )
            })
            .collect()
    })
}

fn filter_strategy() -> impl Strategy<Value = FilterRequest> {
    (
        prop::option::of(prop::sample::select(MISSIONS.to_vec())),
        prop::option::of(prop::sample::select(vec!["Falcon", "Heavy", "Star", "9"])),
        prop::option::of(status_strategy()),
        prop::option::of((0i64..9000, 0i64..3000, 0i64..1440, zone_strategy(), zone_strategy())),
        prop::option::of((1i64..400, 0i64..200)),
    )
        .prop_map(|(mission, rocket, status, dates, flights)| FilterRequest {
            mission_name: mission.map(str::to_string),
            rocket_name: rocket.map(str::to_string),
            status,
            start_date: dates.map(|(start, _, minutes, zone, _)| shifted(start, minutes, zone)),
            end_date: dates
                .map(|(start, span, minutes, _, zone)| shifted(start + span + 1, minutes, zone)),
            flight_number_min: flights.map(|(min, _)| min),
            flight_number_max: flights.map(|(min, span)| min + span),
            limit: Some(1000),
            ..FilterRequest::default()
        })
}

fn satisfies(launch: &Launch, request: &FilterRequest) -> bool {
    let contains = |value: &str, needle: &Option<String>| {
        needle.as_deref().map_or(true, |n| value.contains(n))
    };
    contains(&launch.mission_name, &request.mission_name)
        && contains(&launch.rocket_name, &request.rocket_name)
        && request.status.map_or(true, |s| s == launch.status)
        && request.start_date.map_or(true, |d| launch.launch_date >= d)
        && request.end_date.map_or(true, |d| launch.launch_date <= d)
        && match launch.flight_number {
            Some(flight) => {
                let flight = i64::from(flight);
                request.flight_number_min.map_or(true, |min| flight >= min)
                    && request.flight_number_max.map_or(true, |max| flight <= max)
            }
            None => request.flight_number_min.is_none() && request.flight_number_max.is_none(),
        }
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
}

proptest! {
    #[test]
    fn filter_results_satisfy_every_criterion(
        table in table_strategy(),
        request in filter_strategy(),
    ) {
        let expected = table
            .iter()
            .filter_map(|r| launchcore_query::normalize(r).ok())
            .filter(|l| satisfies(l, &request))
            .count();

        let service = memory_service(table);
        let page = runtime().block_on(service.filter(&request)).unwrap();

        for launch in &page.launches {
            prop_assert!(satisfies(launch, &request), "{} violates {:?}", launch.id, request);
        }
        prop_assert_eq!(page.count, expected);
        prop_assert!(page
            .launches
            .windows(2)
            .all(|w| w[0].launch_date >= w[1].launch_date));
    }

    #[test]
    fn date_range_results_ascend(
        table in table_strategy(),
        start in 0i64..9000,
        span in 1i64..4000,
        minutes in 0i64..1440,
        start_zone in zone_strategy(),
        end_zone in zone_strategy(),
    ) {
        let low = shifted(start, minutes, start_zone);
        let high = shifted(start + span, minutes, end_zone);
        let service = memory_service(table);
        let page = runtime()
            .block_on(service.list_by_date_range(low, high, 1000, None))
            .unwrap();

        prop_assert!(page
            .launches
            .windows(2)
            .all(|w| w[0].launch_date <= w[1].launch_date));
        prop_assert!(page
            .launches
            .iter()
            .all(|l| l.launch_date >= low && l.launch_date <= high));
    }

    #[test]
    fn cursor_walk_never_repeats_the_cursor(
        table in table_strategy(),
        limit in 1u32..8,
    ) {
        let total = table.len();
        let service = memory_service(table);
        let rt = runtime();

        let mut seen = Vec::new();
        let mut cursor: Option<Cursor> = None;
        loop {
            let page = rt.block_on(service.list(limit, cursor.clone())).unwrap();
            if let Some(previous) = &cursor {
                prop_assert!(page.launches.iter().all(|l| l.id != previous.as_str()));
            }
            seen.extend(page.launches.iter().map(|l| l.id.clone()));
            if !page.has_more {
                break;
            }
            cursor = Cursor::from_token(page.last_evaluated_key.as_deref());
            prop_assert!(cursor.is_some());
        }

        seen.sort();
        seen.dedup();
        prop_assert_eq!(seen.len(), total);
    }
}
