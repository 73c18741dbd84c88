//! End-to-end pipeline tests through the library API

use cost_optimizer::config::{ConfigFile, ProfileResolver, ThresholdProfile};
use cost_optimizer::pipeline::{MemoryCollector, Pipeline, PipelineError, PipelineEvent, SessionId};
use cost_optimizer::recommend::{Category, Severity};
use rust_decimal_macros::dec;
use std::sync::Arc;

mod common;
use common::assertions::{assert_money_within, assert_ranked, assert_savings_invariants};
use common::fixtures;

#[test]
fn test_two_row_extract_totals() {
    let pipeline = Pipeline::default();
    let csv = "Service,Region,Cost,Date\nEC2,us-east-1,450.00,2025-09\nS3,us-east-1,850.00,2025-09";
    let session = pipeline.analyze(&SessionId::new("two-rows"), csv).unwrap();
    let report = session.report();

    assert_eq!(report.total_cost, dec!(1300.00));
    assert_eq!(report.services["EC2"], dec!(450.00));
    assert_eq!(report.services["S3"], dec!(850.00));
    assert_eq!(report.total_rows, 2);
}

#[test]
fn test_sample_extract_end_to_end() {
    let pipeline = Pipeline::default();
    let session = pipeline
        .analyze(&SessionId::new("sample"), fixtures::SAMPLE_CSV)
        .unwrap();
    let report = session.report();

    assert_eq!(report.total_cost, dec!(3065.00));
    assert_eq!(report.periods.len(), 2);
    assert_eq!(report.recommendations.len(), 1);

    let rec = &report.recommendations[0];
    assert_eq!(rec.title, "EC2 Reserved Capacity");
    assert_eq!(rec.category, Category::ReservedCapacity);
    assert_eq!(rec.severity, Severity::Medium);
    assert_eq!(rec.current_monthly_cost, dec!(435.00));
    assert_eq!(rec.estimated_monthly_savings, dec!(130.50));
    assert_eq!(report.total_savings, dec!(130.50));
    assert_eq!(report.savings_percentage, 4.3);
}

#[test]
fn test_usage_extract_produces_ranked_recommendations() {
    let pipeline = Pipeline::default();
    let session = pipeline
        .analyze(&SessionId::new("usage"), fixtures::USAGE_CSV)
        .unwrap();

    let titles: Vec<&str> = session.recommendations.iter().map(|r| r.title.as_str()).collect();
    for expected in [
        "EC2 Right-Sizing",
        "Idle EC2 Instances",
        "Unattached EBS Volumes",
        "S3 Glacier Archival",
    ] {
        assert!(titles.contains(&expected), "missing {expected} in {titles:?}");
    }
    assert_ranked(&session.recommendations);
    assert_savings_invariants(&session.recommendations);
}

#[test]
fn test_malformed_row_is_skipped_not_fatal() {
    let pipeline = Pipeline::default();
    let session = pipeline
        .analyze(&SessionId::new("malformed"), fixtures::ONE_MALFORMED_CSV)
        .unwrap();

    assert_eq!(session.total_rows, 6);
    assert_eq!(session.processed_rows(), 5);
    assert_eq!(session.row_errors.len(), 1);
    assert_eq!(session.row_errors[0].line, 4);
    assert_money_within(session.aggregate.total_cost, dec!(650), dec!(0.01));
}

#[test]
fn test_header_only_extract_is_empty_not_error() {
    let pipeline = Pipeline::default();
    let session = pipeline
        .analyze(&SessionId::new("empty"), "Service,Region,Cost,Date\n")
        .unwrap();
    let report = session.report();

    assert_eq!(report.total_cost, dec!(0));
    assert_eq!(report.total_rows, 0);
    assert!(report.recommendations.is_empty());
    assert_eq!(report.savings_percentage, 0.0);
}

#[test]
fn test_failed_run_keeps_previous_session() {
    let pipeline = Pipeline::default();
    let id = SessionId::new("keep");
    let first = pipeline.analyze(&id, fixtures::SAMPLE_CSV).unwrap();

    let err = pipeline.analyze(&id, "Service,Cost\nEC2,1\n").unwrap_err();
    assert!(matches!(err, PipelineError::Ingest(ref e) if e.is_schema_error()));
    assert!(Arc::ptr_eq(&first, &pipeline.current(&id).unwrap()));
}

#[test]
fn test_sessions_are_independent() {
    let pipeline = Pipeline::default();
    let a = SessionId::new("a");
    let b = SessionId::new("b");
    pipeline.analyze(&a, fixtures::SAMPLE_CSV).unwrap();
    pipeline.analyze(&b, fixtures::USAGE_CSV).unwrap();

    assert!(pipeline.reset(&a));
    assert!(pipeline.current(&a).is_none());
    assert!(pipeline.current(&b).is_some());
}

#[test]
fn test_analysis_is_deterministic() {
    let first = Pipeline::default()
        .analyze(&SessionId::new("x"), fixtures::USAGE_CSV)
        .unwrap();
    let second = Pipeline::default()
        .analyze(&SessionId::new("y"), fixtures::USAGE_CSV)
        .unwrap();

    assert_eq!(first.recommendations, second.recommendations);
    assert_eq!(first.report(), second.report());
}

#[test]
fn test_export_is_idempotent_and_selective() {
    let pipeline = Pipeline::default();
    let session = pipeline
        .analyze(&SessionId::new("export"), fixtures::USAGE_CSV)
        .unwrap();

    let all = pipeline.export_config(&session).unwrap();
    let again = pipeline.export_config(&session).unwrap();
    assert_eq!(all, again);
    assert!(all.optimization_count >= 3);

    let only_first = pipeline.export_selected(&session, &[1]).unwrap();
    assert_eq!(
        only_first.total_monthly_savings,
        session.recommendations[0].estimated_monthly_savings
    );
    assert!(only_first.script.len() < all.script.len());
}

#[test]
fn test_resize_without_resource_id_exports_as_advisory() {
    let pipeline = Pipeline::default();
    let csv = "Service,Region,Cost,Date,CpuUtilization,InstanceType\n\
               EC2,us-east-1,240,2025-09,12,t3.2xlarge\n";
    let session = pipeline.analyze(&SessionId::new("no-ids"), csv).unwrap();

    assert_eq!(session.recommendations.len(), 1);
    assert_eq!(session.recommendations[0].title, "EC2 Right-Sizing");

    let config = pipeline.export_config(&session).unwrap();
    assert_eq!(config.optimization_count, 0);
    assert!(config.script.contains("# Advisory:"));
    assert!(!config.script.contains("resource \"aws_instance\""));
}

#[test]
fn test_out_of_range_costs_are_skipped_not_summed() {
    let pipeline = Pipeline::default();
    let csv = "Service,Region,Cost,Date\n\
               EC2,us-east-1,79228162514264337593543950335,2025-09\n\
               EC2,us-east-1,79228162514264337593543950335,2025-09\n\
               S3,us-east-1,12.50,2025-09\n";
    let session = pipeline.analyze(&SessionId::new("huge"), csv).unwrap();
    let report = session.report();

    assert_eq!(report.total_cost, dec!(12.50));
    assert_eq!(report.processed_rows, 1);
    assert_eq!(report.skipped_rows, 2);
    assert_eq!(report.row_errors[0].line, 2);
}

#[test]
fn test_single_month_always_on_rds_gets_reserved_recommendation() {
    let pipeline = Pipeline::default();
    let csv = "Service,Region,Cost,Date,ResourceId,InstanceType,CpuUtilization,RunningHours\n\
               RDS,us-east-1,350.40,2025-09,db-orders,db.r5.xlarge,55,730\n\
               S3,us-east-1,80.00,2025-09,,,,\n";
    let session = pipeline.analyze(&SessionId::new("rds"), csv).unwrap();

    let rec = session
        .recommendations
        .iter()
        .find(|r| r.category == Category::ReservedCapacity)
        .expect("reserved recommendation");
    assert_eq!(rec.title, "RDS Reserved Instances");
    assert_eq!(rec.affected_resource_count, 1);
    assert_money_within(rec.estimated_monthly_savings, dec!(105.12), dec!(0.01));
}

#[test]
fn test_profile_changes_engine_thresholds() {
    let config = ConfigFile {
        profile: ThresholdProfile::Conservative.name().to_string(),
        ..Default::default()
    };
    let resolved = ProfileResolver::resolve(&config).unwrap();
    let pipeline = Pipeline::new(resolved.engine());
    let session = pipeline
        .analyze(&SessionId::new("conservative"), fixtures::USAGE_CSV)
        .unwrap();

    let balanced = Pipeline::default()
        .analyze(&SessionId::new("balanced"), fixtures::USAGE_CSV)
        .unwrap();
    assert!(session.recommendations.len() <= balanced.recommendations.len());
    assert_savings_invariants(&session.recommendations);
}

#[test]
fn test_collector_sees_full_lifecycle() {
    let collector = Arc::new(MemoryCollector::new());
    let pipeline = Pipeline::default().with_collector(collector.clone());
    let session = pipeline
        .analyze(&SessionId::new("events"), fixtures::SAMPLE_CSV)
        .unwrap();
    pipeline.export_config(&session).unwrap();

    assert_eq!(
        collector.event_kinds(),
        vec![
            PipelineEvent::AnalysisStarted,
            PipelineEvent::AnalysisCompleted,
            PipelineEvent::ExportCompleted,
        ]
    );
}
