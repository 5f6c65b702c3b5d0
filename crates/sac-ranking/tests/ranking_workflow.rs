//! End-to-end scenarios through the public service facade and a flat-file store:
//! scoring, persistence, leaderboards, and administrative edits.

mod common {
    use std::path::PathBuf;
    use std::sync::Arc;

    use chrono::{NaiveDate, NaiveTime};

    use sac_ranking::evaluations::{
        CsvRecordStore, EvaluationService, EvaluationSubmission, Month, SharedSecretGate,
    };
    use sac_ranking::scoring::{BreakageStatus, MetricInput, Profile, ScoringEngine};

    pub(super) const SECRET: &str = "ops-admin";

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
    }

    pub(super) fn registered_on() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 28).expect("valid date")
    }

    pub(super) fn reference_mixed_metrics() -> MetricInput {
        MetricInput {
            departure_time: Some(at(7, 20)),
            first_visit_time: Some(at(8, 15)),
            fill_rate: Some(98.6),
            proximity: Some(99.1),
            inventory_variance: Some(450.0),
            archetype: Some("E".to_string()),
            shrink_rate: Some(0.03),
            breakage: Some(BreakageStatus::OnTarget),
            ..MetricInput::default()
        }
    }

    pub(super) fn submission(name: &str, month: Month, metrics: MetricInput) -> EvaluationSubmission {
        EvaluationSubmission {
            employee_name: name.to_string(),
            site: "CEDI Leon".to_string(),
            zone: "Bajio".to_string(),
            profile: Profile::MixedSupervisor,
            month,
            year: 2025,
            metrics,
        }
    }

    pub(super) fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("sac-ranking-it-{}", std::process::id()))
            .join(format!("{name}.csv"))
    }

    pub(super) fn csv_service(path: &PathBuf) -> EvaluationService<CsvRecordStore> {
        EvaluationService::new(Arc::new(CsvRecordStore::new(path)), ScoringEngine::default())
            .with_admin_gate(Arc::new(SharedSecretGate::new(SECRET)))
    }
}

use common::*;
use sac_ranking::evaluations::{EvaluationServiceError, Month, RecordStoreError};
use sac_ranking::leaderboard::{LeaderboardFilter, RankMarker};
use sac_ranking::scoring::Criterion;

#[test]
fn reference_mixed_supervisor_scores_full_marks_and_persists() {
    let path = scratch_path("reference");
    let service = csv_service(&path);

    let record = service
        .submit(
            submission("Ana Torres", Month::February, reference_mixed_metrics()),
            registered_on(),
        )
        .expect("submission succeeds");

    assert_eq!(record.total_score, 100.0);
    assert_eq!(
        record.breakdown,
        "Departure:10 | FirstVisit:10 | FillRate:25 | Proximity:10 | Inventory:25 | Shrink:10 | Breakage:10"
    );

    let reopened = csv_service(&path);
    assert_eq!(reopened.records().expect("records"), vec![record]);
}

#[test]
fn leaderboards_rank_stored_history() {
    let path = scratch_path("leaderboards");
    let service = csv_service(&path);

    let mut weaker = reference_mixed_metrics();
    weaker.departure_time = Some(chrono::NaiveTime::from_hms_opt(8, 30, 0).expect("valid"));
    weaker.breakage = Some(sac_ranking::scoring::BreakageStatus::OffTarget);

    for (name, month, metrics) in [
        ("Ana Torres", Month::January, weaker.clone()),
        ("Luis Pena", Month::January, reference_mixed_metrics()),
        ("Ana Torres", Month::February, reference_mixed_metrics()),
    ] {
        service
            .submit(submission(name, month, metrics), registered_on())
            .expect("submission succeeds");
    }

    let filter = LeaderboardFilter::for_year(2025);
    let january = service
        .monthly_leaderboard(&filter, Month::January)
        .expect("monthly view");
    let ranked: Vec<_> = january
        .entries
        .iter()
        .map(|entry| (entry.employee_name.as_str(), entry.total_score, entry.marker))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("Luis Pena", 100.0, RankMarker::Gold),
            ("Ana Torres", 82.0, RankMarker::Silver),
        ]
    );

    let annual = service.annual_leaderboard(&filter).expect("annual view");
    assert_eq!(annual.entries[0].employee_name, "Luis Pena");
    assert_eq!(annual.entries[1].employee_name, "Ana Torres");
    assert_eq!(annual.entries[1].mean_score, 91.0);
    assert_eq!(annual.entries[1].evaluations, 2);
}

#[test]
fn preview_matches_engine_breakdown() {
    let path = scratch_path("preview");
    let service = csv_service(&path);

    let breakdown = service
        .preview(&submission(
            "Rosa Diaz",
            Month::March,
            reference_mixed_metrics(),
        ))
        .expect("preview succeeds");

    assert_eq!(breakdown.points_for(Criterion::Inventory), Some(25.0));
    assert_eq!(
        breakdown.components.iter().map(|c| c.points).sum::<f64>(),
        breakdown.total
    );
    assert!(service.records().expect("records").is_empty());
}

#[test]
fn admin_rewrite_detects_interleaved_submission() {
    let path = scratch_path("admin");
    let service = csv_service(&path);
    service
        .submit(
            submission("Ana Torres", Month::April, reference_mixed_metrics()),
            registered_on(),
        )
        .expect("submission");

    let snapshot = service.admin_snapshot(SECRET).expect("snapshot");
    let mut edited = snapshot.records.clone();
    edited[0].employee_name = "Ana T. Torres".to_string();

    service
        .submit(
            submission("Luis Pena", Month::April, reference_mixed_metrics()),
            registered_on(),
        )
        .expect("interleaved submission");

    match service.admin_replace(SECRET, snapshot.version, edited.clone()) {
        Err(EvaluationServiceError::Store(RecordStoreError::Stale { .. })) => {}
        other => panic!("expected stale rewrite, got {other:?}"),
    }

    let fresh = service.admin_snapshot(SECRET).expect("fresh snapshot");
    assert_eq!(fresh.records.len(), 2);
    let mut edited = fresh.records.clone();
    edited[0].employee_name = "Ana T. Torres".to_string();
    service
        .admin_replace(SECRET, fresh.version, edited)
        .expect("rewrite at current version");

    let names: Vec<_> = service
        .records()
        .expect("records")
        .into_iter()
        .map(|record| record.employee_name)
        .collect();
    assert_eq!(names, vec!["Ana T. Torres".to_string(), "Luis Pena".to_string()]);

    let export = service.admin_export(SECRET).expect("export");
    assert_eq!(export.lines().count(), 3);
}
