//! Tests for independent event extraction.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use trapstat::calendar::{CalendarOptions, OperationalCalendar, build_calendar};
use trapstat::deploy::{DeploymentRegistry, DeploymentWindow, Station};
use trapstat::detect::DetectionRecord;
use trapstat::diagnostics::Diagnostics;
use trapstat::events::{Event, ExtractorOptions, extract_events};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn datetime(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

fn make_record(station: &str, species: &str, timestamp: &str, media_id: &str) -> DetectionRecord {
    DetectionRecord {
        station: station.to_string(),
        camera: "C1".to_string(),
        species: species.to_string(),
        timestamp: datetime(timestamp),
        media_id: Some(media_id.to_string()),
    }
}

/// Station A, camera 1, deployed 2024/01/01 through 2024/01/10.
fn station_a_calendar() -> OperationalCalendar {
    let windows = vec![DeploymentWindow {
        station: "A".to_string(),
        camera: "C1".to_string(),
        setup: date(2024, 1, 1),
        retrieval: Some(date(2024, 1, 10)),
    }];
    let registry =
        DeploymentRegistry::new(Vec::<Station>::new(), windows).expect("valid registry");
    build_calendar(&registry, CalendarOptions::default())
}

fn extract(records: &[DetectionRecord], threshold_minutes: i64) -> (Vec<Event>, Diagnostics) {
    let calendar = station_a_calendar();
    let mut diagnostics = Diagnostics::new();
    let events = extract_events(
        records,
        &calendar,
        ExtractorOptions {
            threshold: Duration::minutes(threshold_minutes),
        },
        &mut diagnostics,
    );
    (events, diagnostics)
}

#[test]
fn test_fox_scenario_merges_close_records() {
    let records = vec![
        make_record("A", "Fox", "2024-01-03 10:00:00", "a"),
        make_record("A", "Fox", "2024-01-03 10:20:00", "b"),
        make_record("A", "Fox", "2024-01-03 11:05:00", "c"),
    ];

    let (events, diagnostics) = extract(&records, 30);

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].record_count, 2);
    assert_eq!(events[0].start, datetime("2024-01-03 10:00:00"));
    assert_eq!(events[0].end, datetime("2024-01-03 10:20:00"));
    assert_eq!(events[1].record_count, 1);
    assert_eq!(events[1].start, datetime("2024-01-03 11:05:00"));
    assert!(diagnostics.is_clean());
}

#[test]
fn test_out_of_window_record_flagged_and_retained() {
    let records = vec![make_record("A", "Fox", "2024-01-15 09:00:00", "a")];

    let (events, diagnostics) = extract(&records, 30);

    assert_eq!(events.len(), 1);
    assert!(events[0].out_of_operation);
    assert_eq!(diagnostics.out_of_window.len(), 1);
    assert_eq!(diagnostics.out_of_window[0].species, "Fox");
}

#[test]
fn test_extraction_is_idempotent() {
    let records = vec![
        make_record("A", "Fox", "2024-01-03 10:00:00", "a"),
        make_record("A", "Fox", "2024-01-03 10:20:00", "b"),
        make_record("A", "Fox", "2024-01-03 11:05:00", "c"),
        make_record("A", "Badger", "2024-01-04 02:00:00", "d"),
    ];

    let (events, _) = extract(&records, 30);

    // Re-flatten: select the original records contributing to each event
    // and re-extract with the same threshold.
    let flattened: Vec<DetectionRecord> = events
        .iter()
        .flat_map(|event| {
            records
                .iter()
                .filter(|record| {
                    record
                        .media_id
                        .as_ref()
                        .is_some_and(|id| event.media_ids.contains(id))
                })
                .cloned()
                .collect::<Vec<_>>()
        })
        .collect();

    let (reextracted, _) = extract(&flattened, 30);

    assert_eq!(events.len(), reextracted.len());
    for (a, b) in events.iter().zip(&reextracted) {
        assert_eq!(a.start, b.start);
        assert_eq!(a.end, b.end);
        assert_eq!(a.record_count, b.record_count);
        assert_eq!(a.media_ids, b.media_ids);
    }
}

#[test]
fn test_larger_threshold_never_increases_event_count() {
    let records = vec![
        make_record("A", "Fox", "2024-01-03 10:00:00", "a"),
        make_record("A", "Fox", "2024-01-03 10:20:00", "b"),
        make_record("A", "Fox", "2024-01-03 11:05:00", "c"),
        make_record("A", "Fox", "2024-01-03 15:00:00", "d"),
        make_record("A", "Badger", "2024-01-04 02:00:00", "e"),
    ];

    let thresholds = [5, 15, 30, 45, 60, 240, 1440];
    let mut previous = usize::MAX;
    for threshold in thresholds {
        let (events, _) = extract(&records, threshold);
        assert!(
            events.len() <= previous,
            "threshold {threshold} produced {} events, more than {previous}",
            events.len()
        );
        previous = events.len();
    }
}

#[test]
fn test_shuffled_input_produces_identical_events() {
    let records = vec![
        make_record("A", "Fox", "2024-01-03 10:00:00", "a"),
        make_record("A", "Badger", "2024-01-03 10:05:00", "b"),
        make_record("A", "Fox", "2024-01-03 10:20:00", "c"),
        make_record("A", "Fox", "2024-01-05 22:00:00", "d"),
    ];

    let (baseline, _) = extract(&records, 30);

    // A few deterministic permutations stand in for a full shuffle.
    let permutations: Vec<Vec<usize>> = vec![
        vec![3, 2, 1, 0],
        vec![1, 3, 0, 2],
        vec![2, 0, 3, 1],
    ];
    for permutation in permutations {
        let shuffled: Vec<DetectionRecord> = permutation
            .iter()
            .map(|&index| records[index].clone())
            .collect();
        let (events, _) = extract(&shuffled, 30);

        assert_eq!(baseline.len(), events.len());
        for (a, b) in baseline.iter().zip(&events) {
            assert_eq!(a.species, b.species);
            assert_eq!(a.start, b.start);
            assert_eq!(a.end, b.end);
            assert_eq!(a.media_ids, b.media_ids);
        }
    }
}

#[test]
fn test_stations_never_merge_even_with_identical_timestamps() {
    let records = vec![
        make_record("A", "Fox", "2024-01-03 10:00:00", "a"),
        make_record("B", "Fox", "2024-01-03 10:00:00", "b"),
    ];

    let (events, _) = extract(&records, 30);
    assert_eq!(events.len(), 2);
}
