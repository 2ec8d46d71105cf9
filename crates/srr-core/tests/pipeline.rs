use srr_core::{NoopObserver, PipelineStep, STAGE_LABELS, StepStatus, refine_csv};
use srr_ingest::RawTable;
use srr_model::{CanonicalField, RefineError};

fn refine(input: &str) -> srr_core::RefineOutcome {
    refine_csv(input, &mut NoopObserver).expect("refine should succeed")
}

#[test]
fn partially_recognized_schema_falls_back_per_field() {
    // No engagement or mid-term columns anywhere: every record gets the
    // hardcoded engagement default.
    let input = "Student_ID,Name,Branch,Attendance_%,CGPA\n\
                 S1,Asha,CSE,70,8.1\n\
                 S2,Ravi,ECE,72,7.9\n\
                 S3,Meena,EEE,71,8.4\n";
    let outcome = refine(input);

    assert_eq!(outcome.summary.total_rows, 3);
    assert_eq!(outcome.summary.mapped_columns, 5);
    assert_eq!(outcome.summary.unmapped_columns, 6);

    let table = RawTable::parse(&outcome.csv).expect("reparse output");
    for row in 0..3 {
        assert_eq!(table.cell(row, "engagement_score"), Some("70"));
    }
    assert_eq!(table.cell(0, "department"), Some("CSE"));
    assert_eq!(table.cell(1, "department"), Some("ECE"));
}

#[test]
fn missing_cell_is_filled_with_the_column_mean() {
    let input = "Student_ID,Attendance_%\nS1,70\nS2,\nS3,80\n";
    let outcome = refine(input);

    assert_eq!(outcome.summary.missing_values_filled, 1);
    let table = RawTable::parse(&outcome.csv).expect("reparse output");
    assert_eq!(table.cell(1, "attendance_rate"), Some("75"));
}

#[test]
fn extreme_attendance_is_capped_at_the_iqr_upper_bound() {
    let input = "Student_ID,Attendance_%\n\
                 S1,70\nS2,72\nS3,71\nS4,500\nS5,69\nS6,73\nS7,74\n";
    let outcome = refine(input);

    assert_eq!(outcome.summary.outliers_capped, 1);
    let table = RawTable::parse(&outcome.csv).expect("reparse output");
    assert_eq!(table.cell(3, "attendance_rate"), Some("80"));
    assert_eq!(table.cell(0, "attendance_rate"), Some("70"));

    let capped = outcome.steps[5]
        .details
        .outliers_capped
        .as_ref()
        .expect("cap details");
    assert_eq!(capped.get(&CanonicalField::AttendanceRate), Some(&1));
}

#[test]
fn unrecognizable_input_aborts_with_schema_error() {
    let input = "Foo,Bar,Baz\n1,2,3\n";
    let error = refine_csv(input, &mut NoopObserver).expect_err("should fail");
    match &error {
        RefineError::UnrecognizedSchema { headers, extra } => {
            assert_eq!(headers, &["Foo".to_string(), "Bar".to_string(), "Baz".to_string()]);
            assert_eq!(*extra, 0);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(error.to_string().contains("Foo, Bar, Baz"));
}

#[test]
fn empty_input_completes_with_empty_output() {
    let outcome = refine("");
    assert!(outcome.csv.is_empty());
    assert_eq!(outcome.summary, srr_model::RefineSummary::default());
    assert_eq!(outcome.steps[0].status, StepStatus::Done);
    assert_eq!(outcome.steps[1].status, StepStatus::Pending);
}

#[test]
fn refining_canonical_output_is_stable() {
    let input = "Student_ID,Name,Branch,Attendance_%,Engagement,CGPA,\
                 Login_Gap_Days,Failure_Ratio,Financial_Risk,Commute_Risk\n\
                 S1,Asha,CSE,70,50,6,2,0.25,1,1\n\
                 S2,Ravi,ECE,71,60,7,0,0.5,0,2\n\
                 S3,Meena,EEE,72,70,8,5,0,yes,4\n";
    let first = refine(input);

    let second = refine(&first.csv);
    assert_eq!(second.summary.mapped_columns, 11);
    assert_eq!(second.summary.unmapped_columns, 0);
    assert_eq!(second.summary.outliers_capped, 0);
    assert_eq!(second.csv, first.csv);
}

#[test]
fn mapping_counts_always_sum_to_schema_size() {
    for input in [
        "Student_ID,Attendance_%\nS1,70\n",
        "attendance,engagement,cgpa\n70,50,8\n",
        "id,name,department,attendance_rate,engagement_score,academic_performance_index,\
         login_gap_days,failure_ratio,financial_risk_flag,commute_risk_score,\
         semester_performance_trend\n1,A,CSE,70,50,8,1,0.1,0,1,0\n",
    ] {
        let outcome = refine(input);
        assert_eq!(
            outcome.summary.mapped_columns + outcome.summary.unmapped_columns,
            CanonicalField::COUNT
        );
    }
}

#[test]
fn observer_sees_every_stage_reach_done_in_order() {
    let mut snapshots: Vec<Vec<(StepStatus, Option<usize>)>> = Vec::new();
    let mut observer = |steps: &[PipelineStep]| {
        snapshots.push(
            steps
                .iter()
                .map(|s| (s.status, s.details.rows_processed))
                .collect(),
        );
    };
    let input = "Student_ID,Attendance_%\nS1,70\nS2,71\nS3,72\n";
    refine_csv(input, &mut observer).expect("refine");

    // First snapshot: parse stage just started, everything else pending.
    assert_eq!(snapshots[0][0].0, StepStatus::Running);
    assert!(snapshots[0][1..].iter().all(|s| s.0 == StepStatus::Pending));

    // Last snapshot: all seven stages done.
    let last = snapshots.last().expect("snapshots");
    assert_eq!(last.len(), STAGE_LABELS.len());
    assert!(last.iter().all(|s| s.0 == StepStatus::Done));

    // A stage never starts before its predecessor is done.
    for snapshot in &snapshots {
        for pair in snapshot.windows(2) {
            if pair[1].0 != StepStatus::Pending {
                assert_eq!(pair[0].0, StepStatus::Done);
            }
        }
    }

    // Row-building sub-progress was published for each batch.
    let sub_updates: Vec<usize> = snapshots
        .iter()
        .filter(|s| s[4].0 == StepStatus::Running)
        .filter_map(|s| s[4].1)
        .collect();
    assert_eq!(sub_updates, vec![1, 2, 3]);
}

#[test]
fn step_snapshots_serialize_to_json() {
    let outcome = refine("Student_ID,Attendance_%\nS1,70\n");
    let json = serde_json::to_string(&outcome.steps).expect("serialize steps");
    assert!(json.contains("\"Mapping columns to schema\""));
    assert!(json.contains("\"attendance_rate\""));
}
