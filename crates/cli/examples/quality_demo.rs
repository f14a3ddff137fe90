use descwatch_core::{AlertMonitor, AlertTransition, EngineBuilder};
use descwatch_filters::{HeuristicsConfig, LengthThresholds, SummaryHeuristics};
use descwatch_formats::Record;

fn main() {
    println!("🎯 Description Quality Demo\n");
    println!("===========================\n");

    // Demo 1: Per-record classification and scoring
    demo_scoring();
    println!("\n---\n");

    // Demo 2: Alert transitions across snapshots
    demo_alerts();
    println!("\n---\n");

    // Demo 3: Summary heuristics
    demo_heuristics();
}

fn sample_records() -> Vec<Record> {
    vec![
        Record::new(1, "Steel bottle", Some("Double-walled steel bottle, keeps drinks cold for 24 hours.".to_string())),
        Record::new(2, "Mug", Some("A mug".to_string())),
        Record::new(3, "Lid", None),
        Record::new(4, "Catalog dump", Some("Lorem ipsum dolor sit amet. ".repeat(10))),
        Record::new(5, "Whitespace", Some("   ".to_string())),
        Record::new(6, "Empty", Some(String::new())),
    ]
}

fn demo_scoring() {
    println!("📊 Demo 1: Classification and Scoring");
    println!("======================================\n");

    let engine = EngineBuilder::new()
        .alert_threshold(80.0)
        .build()
        .expect("Failed to build engine");

    let thresholds = LengthThresholds::default();
    println!(
        "Buckets: SHORT < {} chars, LONG > {} chars, missing or empty is NULL\n",
        thresholds.short_below, thresholds.long_above
    );

    let report = engine.evaluate(&sample_records());
    for record in &report.records {
        println!(
            "{:14} | {:>4} chars | {:5} | score {:>5.1}",
            record.title,
            record.description_length,
            record.classification.label(),
            record.score
        );
    }

    println!("\nAggregate score: {:.1}", report.aggregate_score);
    println!("Valid ratio:     {:.1}%", report.valid_ratio);
    println!("Alert state:     {}", report.alert_state);
}

fn demo_alerts() {
    println!("🚨 Demo 2: Alert Transitions");
    println!("=============================\n");

    let engine = EngineBuilder::new()
        .alert_threshold(60.0)
        .build()
        .expect("Failed to build engine");

    let mut monitor = AlertMonitor::new(|t: &AlertTransition| {
        println!(
            "  -> {} => {} (score {:.1}, threshold {:.1}, {} flagged)",
            t.from, t.to, t.aggregate_score, t.threshold, t.flagged_records
        );
    });

    let healthy = vec![
        Record::new(1, "a", Some("A description of a sensible length".to_string())),
        Record::new(2, "b", Some("Another description of a sensible length".to_string())),
    ];
    let broken = vec![
        Record::new(1, "a", None),
        Record::new(2, "b", Some("tiny".to_string())),
    ];

    for (label, snapshot) in [("Monday", &healthy), ("Tuesday", &broken), ("Wednesday", &broken), ("Thursday", &healthy)] {
        let report = engine.evaluate(snapshot);
        println!("{:10} score {:>5.1} ({})", label, report.aggregate_score, report.alert_state);
        monitor.observe(&report);
    }
}

fn demo_heuristics() {
    println!("🤖 Demo 3: Summary Heuristics");
    println!("==============================\n");

    let heuristics = SummaryHeuristics::new(HeuristicsConfig::default())
        .expect("Failed to compile heuristics");

    let summaries = vec![
        "A stainless bottle that keeps drinks cold through a full day.",
        "",
        "Short bottle blurb.",
        "I'm sorry, but I cannot summarize this content for you.",
        "Summary not available for this particular product listing.",
    ];

    for summary in summaries {
        let inspection = heuristics.inspect(summary);
        println!("{:8} | {:?}", inspection.verdict.to_string(), summary);
        println!("         | {}", inspection.reason);
    }
}
