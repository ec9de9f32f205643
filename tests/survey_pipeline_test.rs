//! End-to-end pipeline tests over temporary CSV fixtures.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use trapstat::config::{Granularity, OutputFormat, SpeciesConfig};
use trapstat::error::Error;
use trapstat::pipeline::{RunOptions, analyze, run_calendar, run_survey};

fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("create fixture");
    write!(file, "{contents}").expect("write fixture");
    path
}

fn options(output_dir: &Path) -> RunOptions {
    RunOptions {
        threshold_minutes: 30,
        half_day_effort: false,
        granularity: Granularity::Station,
        formats: vec![OutputFormat::Csv, OutputFormat::Json],
        output_dir: output_dir.to_path_buf(),
        force: false,
        csv_bom: false,
        strict: false,
        date_format: "%Y/%m/%d".to_string(),
        datetime_format: "%Y-%m-%d %H:%M:%S".to_string(),
        species: SpeciesConfig::default(),
        species_tag: "HierarchicalSubject".to_string(),
    }
}

const DEPLOYMENTS: &str = "Station,Camera,Debut,Fin,X,Y\n\
    A,C1,2024/01/01,2024/01/10,912345.0,6423456.0\n\
    B,C1,2024/02/01,2024/02/20,913000.0,6424000.0\n";

const DETECTIONS: &str = "Station,Camera,Species,DateTimeOriginal,Media\n\
    A,C1,Fox,2024-01-03 10:00:00,IMG_0001.jpg\n\
    A,C1,Fox,2024-01-03 10:20:00,IMG_0002.jpg\n\
    A,C1,Fox,2024-01-03 11:05:00,IMG_0003.jpg\n\
    B,C1,Badger,2024-02-05 02:10:00,IMG_0004.jpg\n";

#[test]
fn test_survey_writes_all_formats() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(dir.path(), "deploy.csv", DEPLOYMENTS);
    let detections = write_file(dir.path(), "records.csv", DETECTIONS);
    let out = dir.path().join("out");

    let (analysis, outputs) = run_survey(&deployments, &detections, &options(&out))
        .expect("survey run");

    assert_eq!(analysis.events.len(), 3);
    assert_eq!(outputs.paths.len(), 3);

    let species_by_station =
        std::fs::read_to_string(out.join("species_by_station.csv")).expect("read output");
    // Station A: 2 fox events over 10 effort days.
    assert!(species_by_station.contains("A,Fox,912345,6423456,2,3,10.0,0.2000"));
    // Station B: 1 badger event over 20 effort days.
    assert!(species_by_station.contains("B,Badger,913000,6424000,1,1,20.0,0.0500"));

    let events_by_species =
        std::fs::read_to_string(out.join("events_by_species.csv")).expect("read output");
    assert!(events_by_species.contains("Badger,1,1"));
    assert!(events_by_species.contains("Fox,2,3"));

    let report = std::fs::read_to_string(out.join("survey_report.json")).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&report).expect("valid json");
    assert_eq!(value["meta"]["threshold_minutes"], 30);
    assert_eq!(value["summary"]["species_by_station"][0]["station"], "A");
}

#[test]
fn test_shuffled_detection_rows_yield_identical_outputs() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(dir.path(), "deploy.csv", DEPLOYMENTS);

    let shuffled_detections = "Station,Camera,Species,DateTimeOriginal,Media\n\
        B,C1,Badger,2024-02-05 02:10:00,IMG_0004.jpg\n\
        A,C1,Fox,2024-01-03 11:05:00,IMG_0003.jpg\n\
        A,C1,Fox,2024-01-03 10:00:00,IMG_0001.jpg\n\
        A,C1,Fox,2024-01-03 10:20:00,IMG_0002.jpg\n";

    let detections_a = write_file(dir.path(), "records_a.csv", DETECTIONS);
    let detections_b = write_file(dir.path(), "records_b.csv", shuffled_detections);

    let out_a = dir.path().join("out_a");
    let out_b = dir.path().join("out_b");
    run_survey(&deployments, &detections_a, &options(&out_a)).expect("survey run a");
    run_survey(&deployments, &detections_b, &options(&out_b)).expect("survey run b");

    for name in ["species_by_station.csv", "events_by_species.csv"] {
        let a = std::fs::read_to_string(out_a.join(name)).expect("read output a");
        let b = std::fs::read_to_string(out_b.join(name)).expect("read output b");
        assert_eq!(a, b, "{name} differs between orderings");
    }
}

#[test]
fn test_station_without_deployments_reported_not_crashed() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(dir.path(), "deploy.csv", DEPLOYMENTS);
    let detections = write_file(
        dir.path(),
        "records.csv",
        "Station,Camera,Species,DateTimeOriginal\n\
         Z,C9,Fox,2024-01-05 10:00:00\n",
    );

    let analysis = analyze(&deployments, &detections, &options(dir.path()))
        .expect("analysis");

    let row = &analysis.summary.species_by_station[0];
    assert_eq!(row.station, "Z");
    assert!(row.rate.is_none());
    assert!(row.effort_days.abs() < f64::EPSILON);
    assert_eq!(analysis.diagnostics.undefined_rates.len(), 1);
    // Out-of-window as well: no deployment covers station Z.
    assert_eq!(analysis.diagnostics.out_of_window.len(), 1);
}

#[test]
fn test_overlapping_windows_abort_before_computation() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(
        dir.path(),
        "deploy.csv",
        "Station,Camera,Debut,Fin\n\
         A,C1,2024/01/01,2024/01/10\n\
         A,C1,2024/01/05,2024/01/20\n",
    );
    let detections = write_file(
        dir.path(),
        "records.csv",
        "Station,Camera,Species,DateTimeOriginal\n\
         A,C1,Fox,2024-01-03 10:00:00\n",
    );

    let result = analyze(&deployments, &detections, &options(dir.path()));
    match result {
        Err(Error::DeploymentOverlap {
            station, camera, ..
        }) => {
            assert_eq!(station, "A");
            assert_eq!(camera, "C1");
        }
        other => panic!("expected DeploymentOverlap, got {other:?}"),
    }
}

#[test]
fn test_malformed_rows_collected_unless_strict() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(dir.path(), "deploy.csv", DEPLOYMENTS);
    let detections = write_file(
        dir.path(),
        "records.csv",
        "Station,Camera,Species,DateTimeOriginal\n\
         A,C1,Fox,not-a-timestamp\n\
         A,C1,Fox,2024-01-03 10:00:00\n",
    );

    let analysis = analyze(&deployments, &detections, &options(dir.path()))
        .expect("lenient analysis");
    assert_eq!(analysis.records.len(), 1);
    assert_eq!(analysis.diagnostics.parse_errors.len(), 1);

    let mut strict = options(dir.path());
    strict.strict = true;
    let result = analyze(&deployments, &detections, &strict);
    assert!(matches!(result, Err(Error::RowParse { .. })));
}

#[test]
fn test_calendar_export_matrix() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(dir.path(), "deploy.csv", DEPLOYMENTS);
    let out = dir.path().join("out");

    let mut opts = options(&out);
    opts.half_day_effort = true;
    let path = run_calendar(&deployments, &opts).expect("calendar run");

    let contents = std::fs::read_to_string(path).expect("read calendar");
    let mut lines = contents.lines();
    let header = lines.next().expect("header");
    assert!(header.starts_with("Station,2024-01-01,"));
    assert!(header.ends_with("2024-02-20"));

    let station_a = lines.next().expect("station A row");
    // Setup day is partial, interior days active, then no data after retrieval.
    assert!(station_a.starts_with("A,S,A,"));
    assert!(station_a.ends_with(",-"));

    let station_b = lines.next().expect("station B row");
    // Nothing before B's own first setup.
    assert!(station_b.starts_with("B,-,"));
    assert!(station_b.ends_with(",R"));
}

#[test]
fn test_camera_granularity_calendar() {
    let dir = TempDir::new().expect("temp dir");
    let deployments = write_file(
        dir.path(),
        "deploy.csv",
        "Station,Camera,Debut,Fin\n\
         A,C1,2024/01/01,2024/01/05\n\
         A,C2,2024/01/03,2024/01/10\n",
    );
    let out = dir.path().join("out");

    let mut opts = options(&out);
    opts.granularity = Granularity::Camera;
    let path = run_calendar(&deployments, &opts).expect("calendar run");

    let contents = std::fs::read_to_string(path).expect("read calendar");
    assert!(contents.starts_with("Station,Camera,"));
    assert!(contents.contains("A,C1,"));
    assert!(contents.contains("A,C2,"));
}
