//! Fixtures shared by the integration tests

use launch_api::{router, AppState};
use launchcore_core::AppConfig;
use launchcore_query::{attr, LaunchQueryService, MemoryStore, RawRecord, RawValue};
use std::sync::{Arc, Once};

static LOGGING: Once = Once::new();

/// Route test logs through the test writer once per process.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_test_writer()
            .try_init();
    });
}

/// A well-formed stored launch
pub fn launch_record(
    id: &str,
    mission: &str,
    rocket: &str,
    date: &str,
    status: &str,
    flight: i64,
) -> RawRecord {
    RawRecord::new()
        .with(attr::LAUNCH_ID, id)
        .with(attr::MISSION_NAME, mission)
        .with(attr::ROCKET_NAME, rocket)
        .with(attr::LAUNCH_DATE, date)
        .with(attr::STATUS, status)
        .with(attr::FLIGHT_NUMBER, flight)
}

/// A stored launch with no mission name
pub fn malformed_record(id: &str) -> RawRecord {
    let mut record = launch_record(id, "", "Falcon 9", "2019-05-24T02:30:00+00:00", "success", 77);
    record.insert(attr::MISSION_NAME, RawValue::Null);
    record
}

/// Twelve launches spanning the whole flight history
pub fn fleet() -> Vec<RawRecord> {
    let mut records = vec![
        launch_record("L01", "FalconSat", "Falcon 1", "2006-03-24T22:30:00+00:00", "failed", 1),
        launch_record("L02", "DemoSat", "Falcon 1", "2007-03-21T01:10:00+00:00", "failed", 2),
        launch_record("L03", "RatSat", "Falcon 1", "2008-09-28T23:15:00+00:00", "success", 4),
        launch_record("L04", "Falcon 9 Test Flight", "Falcon 9", "2010-06-04T18:45:00+00:00", "success", 6),
        launch_record("L05", "COTS 1", "Falcon 9", "2010-12-08T15:43:00+00:00", "success", 7),
        launch_record("L06", "CRS-7", "Falcon 9", "2015-06-28T14:21:00+00:00", "failed", 19),
        launch_record("L07", "OG-2 Mission 2", "Falcon 9", "2015-12-22T01:29:00+00:00", "success", 25),
        launch_record("L08", "FH Demo", "Falcon Heavy", "2018-02-06T20:45:00+00:00", "success", 55),
        launch_record("L09", "Starlink-1", "Falcon 9", "2019-11-11T14:56:00+00:00", "success", 84),
        launch_record("L10", "CCtCap Demo Mission 2", "Falcon 9", "2020-05-30T19:22:00+00:00", "success", 94),
        launch_record("L11", "Starlink-30", "Falcon 9", "2021-08-28T03:21:00+00:00", "success", 130),
        launch_record("L12", "Starship Orbital", "Starship", "2030-01-01T00:00:00+00:00", "upcoming", 300),
    ];
    records[0].insert(attr::LAUNCH_SITE, RawValue::from("Kwajalein Atoll"));
    records[8].insert(attr::LAUNCH_SITE, RawValue::from("CCAFS SLC 40"));
    records[9].insert(attr::LAUNCH_SITE, RawValue::from("KSC LC 39A"));
    records[10].insert(attr::LAUNCH_SITE, RawValue::from("CCAFS SLC 40"));
    records
}

/// Query service over the given records
pub fn memory_service(records: Vec<RawRecord>) -> LaunchQueryService<MemoryStore> {
    init_test_logging();
    LaunchQueryService::new(MemoryStore::from_records(records))
}

/// Application router over the given records, with its shared state
pub fn memory_app(records: Vec<RawRecord>) -> (axum::Router, Arc<AppState<MemoryStore>>) {
    init_test_logging();
    let state = Arc::new(AppState::new(
        AppConfig::default(),
        MemoryStore::from_records(records),
    ));
    (router(Arc::clone(&state)), state)
}
