use descwatch_core::{evaluate_batch, AlertMonitor, AlertTransition, EngineConfig};
use descwatch_filters::{AlertConfig, AlertState, Classification};
use descwatch_formats::{collect_records, open_dataset, Record};
use std::cell::RefCell;
use std::io::Write;

fn scenario() -> Vec<Record> {
    vec![
        Record::new(1, "Null description", None),
        Record::new(2, "Short description", Some("ok".to_string())),
        Record::new(3, "Long description", Some("A".repeat(250))),
    ]
}

#[test]
fn mixed_batch_scores_and_aggregates() {
    let report = evaluate_batch(&scenario(), EngineConfig::default()).unwrap();

    let classifications: Vec<Classification> =
        report.records.iter().map(|r| r.classification).collect();
    assert_eq!(
        classifications,
        vec![Classification::Null, Classification::Short, Classification::Long]
    );

    let scores: Vec<f64> = report.records.iter().map(|r| r.score).collect();
    assert_eq!(scores, vec![0.0, 30.0, 85.0]);

    assert!((report.aggregate_score - 38.333_333).abs() < 1e-4);
    assert!((report.valid_ratio - 33.333_333).abs() < 1e-4);
    assert_eq!(report.alert_state, AlertState::Degraded);
}

#[test]
fn report_serializes_for_presentation() {
    let report = evaluate_batch(&scenario(), EngineConfig::default()).unwrap();
    let json = serde_json::to_value(report.summary()).unwrap();

    assert_eq!(json["classification_counts"]["NULL"], 1);
    assert_eq!(json["classification_counts"]["GOOD"], 0);
    assert_eq!(json["alert_state"], "DEGRADED");
}

#[test]
fn csv_file_through_engine_and_monitor() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "id,title,description").unwrap();
    writeln!(file, "1,Bottle,Insulated bottle that keeps water cold").unwrap();
    writeln!(file, "2,Mug,Ceramic mug for coffee and tea").unwrap();
    writeln!(file, "3,Lid,").unwrap();
    file.flush().unwrap();

    let mut reader = open_dataset(file.path()).unwrap();
    let records = collect_records(reader.as_mut(), false).unwrap();

    let config = EngineConfig {
        alert: AlertConfig { threshold: 50.0 },
        ..Default::default()
    };
    let report = evaluate_batch(&records, config.clone()).unwrap();
    assert_eq!(report.count(Classification::Good), 2);
    assert_eq!(report.count(Classification::Null), 1);
    assert_eq!(report.aggregate_score, 60.0);

    let transitions = RefCell::new(Vec::<AlertTransition>::new());
    let mut monitor = AlertMonitor::new(|t: &AlertTransition| transitions.borrow_mut().push(t.clone()));

    assert!(monitor.observe(&report).is_none());

    let degraded = evaluate_batch(&scenario(), config).unwrap();
    assert!(monitor.observe(&degraded).is_some());

    drop(monitor);
    let transitions = transitions.into_inner();
    assert_eq!(transitions.len(), 1);
    assert_eq!(transitions[0].to, AlertState::Degraded);
    assert_eq!(transitions[0].flagged_records, 2);
}
