//! Row normalization: one raw row in, one fully-populated record out.

use std::collections::BTreeMap;

use srr_ingest::RawTable;
use srr_model::{CanonicalField, CanonicalRecord, SchemaMapping};

use crate::stats::{FieldMeans, parse_f64, round2, round3};

const DEFAULT_ATTENDANCE: f64 = 75.0;
const DEFAULT_ENGAGEMENT: f64 = 70.0;
const DEFAULT_PERFORMANCE_INDEX: f64 = 6.5;
const DEFAULT_LOGIN_GAP: i64 = 3;
const DEFAULT_FAILURE_RATIO: f64 = 0.1;
const DEFAULT_COMMUTE_RISK: i64 = 1;
/// Each mid-term subject is scored out of 30; the average is rescaled to
/// a 0-100 engagement value.
const MIDTERM_MAX_SCORE: f64 = 30.0;

/// Result of parsing a row's cell for one mapped field.
enum Parsed {
    Value(f64),
    /// No usable number; `mapped` records whether a raw column existed at
    /// all (only mapped-but-unparseable cells count as filled values).
    Missing { mapped: bool },
}

/// Converts raw rows into canonical records, applying the per-field
/// derivation, fallback, and clamping rules.
pub struct Normalizer<'a> {
    mapping: &'a SchemaMapping,
    means: &'a FieldMeans,
}

impl<'a> Normalizer<'a> {
    pub fn new(mapping: &'a SchemaMapping, means: &'a FieldMeans) -> Self {
        Self { mapping, means }
    }

    /// Normalize one row.
    ///
    /// `row` is the 0-based row index (the `id` fallback is the 1-based
    /// ordinal). Every substitution for a mapped-but-unparseable cell
    /// increments the field's counter in `filled`.
    pub fn normalize_row(
        &self,
        table: &RawTable,
        row: usize,
        filled: &mut BTreeMap<CanonicalField, usize>,
    ) -> CanonicalRecord {
        let id = self.text_field(table, row, CanonicalField::Id, || (row + 1).to_string());
        let name = self.text_field(table, row, CanonicalField::Name, || "Unknown".to_string());
        let department =
            self.text_field(table, row, CanonicalField::Department, || "CSE".to_string());

        let attendance_rate = match self.parse_mapped(table, row, CanonicalField::AttendanceRate) {
            Parsed::Value(v) => v.clamp(0.0, 100.0),
            Parsed::Missing { mapped } => {
                record_fill(filled, CanonicalField::AttendanceRate, mapped);
                self.mean_or(CanonicalField::AttendanceRate, DEFAULT_ATTENDANCE)
            }
        };

        let engagement_score = self.engagement(table, row, filled);
        let academic_performance_index = self.performance_index(table, row, filled);

        let login_gap_days = match self.parse_mapped(table, row, CanonicalField::LoginGapDays) {
            Parsed::Value(v) => v.round().max(0.0) as i64,
            Parsed::Missing { mapped } => {
                record_fill(filled, CanonicalField::LoginGapDays, mapped);
                self.means
                    .get(CanonicalField::LoginGapDays)
                    .map_or(DEFAULT_LOGIN_GAP, |m| m.round().max(0.0) as i64)
            }
        };

        let failure_ratio = match self.parse_mapped(table, row, CanonicalField::FailureRatio) {
            Parsed::Value(v) => v.clamp(0.0, 1.0),
            Parsed::Missing { mapped } => {
                record_fill(filled, CanonicalField::FailureRatio, mapped);
                self.mean_or(CanonicalField::FailureRatio, DEFAULT_FAILURE_RATIO)
            }
        };

        let financial_risk_flag = self
            .mapped_cell(table, row, CanonicalField::FinancialRiskFlag)
            .is_some_and(parse_bool);

        let commute_risk_score = match self.parse_mapped(table, row, CanonicalField::CommuteRiskScore)
        {
            Parsed::Value(v) => v.round().clamp(1.0, 4.0) as i64,
            Parsed::Missing { mapped } => {
                record_fill(filled, CanonicalField::CommuteRiskScore, mapped);
                DEFAULT_COMMUTE_RISK
            }
        };

        let semester_performance_trend = self.trend(table, row, filled);

        CanonicalRecord {
            id,
            name,
            department,
            attendance_rate,
            engagement_score,
            academic_performance_index,
            login_gap_days,
            failure_ratio,
            financial_risk_flag,
            commute_risk_score,
            semester_performance_trend,
        }
    }

    fn mapped_cell<'b>(&self, table: &'b RawTable, row: usize, field: CanonicalField) -> Option<&'b str> {
        self.mapping
            .raw_header(field)
            .and_then(|header| table.cell(row, header))
    }

    fn parse_mapped(&self, table: &RawTable, row: usize, field: CanonicalField) -> Parsed {
        let mapped = self.mapping.raw_header(field).is_some();
        match self.mapped_cell(table, row, field).and_then(parse_f64) {
            Some(value) => Parsed::Value(value),
            None => Parsed::Missing { mapped },
        }
    }

    fn mean_or(&self, field: CanonicalField, default: f64) -> f64 {
        self.means.get(field).unwrap_or(default)
    }

    fn text_field(
        &self,
        table: &RawTable,
        row: usize,
        field: CanonicalField,
        fallback: impl FnOnce() -> String,
    ) -> String {
        match self.mapped_cell(table, row, field) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => fallback(),
        }
    }

    /// Engagement: direct column when mapped, otherwise derived from the
    /// mid-term subject scores.
    fn engagement(
        &self,
        table: &RawTable,
        row: usize,
        filled: &mut BTreeMap<CanonicalField, usize>,
    ) -> f64 {
        if self.mapping.raw_header(CanonicalField::EngagementScore).is_some() {
            return match self.parse_mapped(table, row, CanonicalField::EngagementScore) {
                Parsed::Value(v) => v.clamp(0.0, 100.0),
                Parsed::Missing { mapped } => {
                    record_fill(filled, CanonicalField::EngagementScore, mapped);
                    self.mean_or(CanonicalField::EngagementScore, DEFAULT_ENGAGEMENT)
                }
            };
        }
        match self.derive_engagement(table, row) {
            Some(v) => v.clamp(0.0, 100.0),
            None => self.mean_or(CanonicalField::EngagementScore, DEFAULT_ENGAGEMENT),
        }
    }

    fn derive_engagement(&self, table: &RawTable, row: usize) -> Option<f64> {
        let scores: Vec<f64> = self
            .mapping
            .fallback
            .midterm_subjects
            .iter()
            .filter_map(|header| table.cell(row, header).and_then(parse_f64))
            .collect();
        if scores.is_empty() {
            return None;
        }
        let average = scores.iter().sum::<f64>() / scores.len() as f64;
        Some(average / MIDTERM_MAX_SCORE * 100.0)
    }

    /// Performance index: values above 10 are a 0-100 scale misreported as
    /// GPA and get divided down before clamping.
    fn performance_index(
        &self,
        table: &RawTable,
        row: usize,
        filled: &mut BTreeMap<CanonicalField, usize>,
    ) -> f64 {
        let field = CanonicalField::AcademicPerformanceIndex;
        let mut value = match self.parse_mapped(table, row, field) {
            Parsed::Value(v) => v,
            Parsed::Missing { mapped } => {
                record_fill(filled, field, mapped);
                self.mean_or(field, DEFAULT_PERFORMANCE_INDEX)
            }
        };
        if value > 10.0 {
            value /= 10.0;
        }
        round3(value.clamp(0.0, 10.0))
    }

    /// Trend: percentage change across the two semester-GPA columns when
    /// both parse and the earlier one is positive; otherwise the mapped
    /// column's mean. Never read directly from the mapped column.
    fn trend(
        &self,
        table: &RawTable,
        row: usize,
        filled: &mut BTreeMap<CanonicalField, usize>,
    ) -> f64 {
        let field = CanonicalField::SemesterPerformanceTrend;
        if let Parsed::Missing { mapped: true } = self.parse_mapped(table, row, field) {
            record_fill(filled, field, true);
        }
        let value = self
            .derive_trend(table, row)
            .unwrap_or_else(|| self.mean_or(field, 0.0));
        round2(value.clamp(-100.0, 100.0))
    }

    fn derive_trend(&self, table: &RawTable, row: usize) -> Option<f64> {
        let fallback = &self.mapping.fallback;
        let sem1 = fallback
            .sem1_gpa
            .as_deref()
            .and_then(|header| table.cell(row, header))
            .and_then(parse_f64)?;
        let sem2 = fallback
            .sem2_gpa
            .as_deref()
            .and_then(|header| table.cell(row, header))
            .and_then(parse_f64)?;
        if sem1 > 0.0 {
            Some((sem2 - sem1) / sem1 * 100.0)
        } else {
            None
        }
    }
}

/// A value is true when it is numeric and non-zero, or when its lowercased
/// string form is exactly `true`, `1`, or `yes`. Every other token
/// (including `false`, `no`, and empty cells) is false.
fn parse_bool(raw: &str) -> bool {
    if let Some(value) = parse_f64(raw) {
        return value != 0.0;
    }
    matches!(raw.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

fn record_fill(filled: &mut BTreeMap<CanonicalField, usize>, field: CanonicalField, mapped: bool) {
    if mapped {
        *filled.entry(field).or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::compute_means;
    use srr_map::resolve_columns;

    fn normalize_all(csv: &str) -> (Vec<CanonicalRecord>, BTreeMap<CanonicalField, usize>) {
        let table = RawTable::parse(csv).expect("parse");
        let mapping = resolve_columns(table.headers());
        let means = compute_means(&table, &mapping);
        let normalizer = Normalizer::new(&mapping, &means);
        let mut filled = BTreeMap::new();
        let records = (0..table.row_count())
            .map(|row| normalizer.normalize_row(&table, row, &mut filled))
            .collect();
        (records, filled)
    }

    #[test]
    fn unmapped_fields_take_hardcoded_defaults() {
        let (records, filled) = normalize_all("Student_ID,Attendance_%\nS1,80\n");
        let record = &records[0];
        assert_eq!(record.engagement_score, 70.0);
        assert_eq!(record.academic_performance_index, 6.5);
        assert_eq!(record.login_gap_days, 3);
        assert_eq!(record.failure_ratio, 0.1);
        assert!(!record.financial_risk_flag);
        assert_eq!(record.commute_risk_score, 1);
        assert_eq!(record.semester_performance_trend, 0.0);
        assert_eq!(record.name, "Unknown");
        assert_eq!(record.department, "CSE");
        assert!(filled.is_empty());
    }

    #[test]
    fn missing_attendance_takes_column_mean() {
        let (records, filled) = normalize_all("Student_ID,Attendance_%\nS1,70\nS2,\nS3,80\n");
        assert_eq!(records[1].attendance_rate, 75.0);
        assert_eq!(filled.get(&CanonicalField::AttendanceRate), Some(&1));
    }

    #[test]
    fn id_falls_back_to_row_ordinal() {
        let (records, _) = normalize_all("Attendance_%\n70\n80\n");
        assert_eq!(records[0].id, "1");
        assert_eq!(records[1].id, "2");
    }

    #[test]
    fn attendance_is_clamped_to_percentage_range() {
        let (records, _) = normalize_all("Attendance_%\n105\n-3\n");
        assert_eq!(records[0].attendance_rate, 100.0);
        assert_eq!(records[1].attendance_rate, 0.0);
    }

    #[test]
    fn gpa_on_hundred_scale_is_corrected() {
        let (records, _) = normalize_all("Student_ID,CGPA\nS1,85\nS2,8.5\n");
        assert_eq!(records[0].academic_performance_index, 8.5);
        assert_eq!(records[1].academic_performance_index, 8.5);
    }

    #[test]
    fn engagement_derives_from_midterm_scores() {
        let (records, _) =
            normalize_all("Student_ID,MID1_Subject1,MID1_Subject2,MID1_Subject3\nS1,24,27,30\nS2,15,,\n");
        // (24 + 27 + 30) / 3 / 30 * 100 = 90
        assert_eq!(records[0].engagement_score, 90.0);
        // parseable subset only: 15 / 30 * 100 = 50
        assert_eq!(records[1].engagement_score, 50.0);
    }

    #[test]
    fn direct_engagement_column_wins_over_midterms() {
        let (records, _) =
            normalize_all("Engagement,MID1_Subject1\n55,30\n");
        assert_eq!(records[0].engagement_score, 55.0);
    }

    #[test]
    fn trend_is_percentage_change_of_semester_gpas() {
        let (records, _) = normalize_all("Student_ID,Sem1_GPA,Sem2_GPA\nS1,8,9\nS2,0,9\n");
        assert_eq!(records[0].semester_performance_trend, 12.5);
        // sem1 of zero cannot anchor a percentage change; the mapped
        // column's mean (Sem2_GPA: 9) is substituted instead.
        assert_eq!(records[1].semester_performance_trend, 9.0);
    }

    #[test]
    fn financial_flag_accepts_exact_token_set() {
        let csv = "Student_ID,Financial_Risk\nS1,true\nS2,YES\nS3,1\nS4,false\nS5,no\nS6,0\nS7,2\n";
        let (records, _) = normalize_all(csv);
        let flags: Vec<bool> = records.iter().map(|r| r.financial_risk_flag).collect();
        assert_eq!(flags, vec![true, true, true, false, false, false, true]);
    }

    #[test]
    fn commute_risk_rounds_and_clamps() {
        let (records, _) = normalize_all("Student_ID,Commute_Risk\nS1,2.6\nS2,9\nS3,0\nS4,\n");
        let scores: Vec<i64> = records.iter().map(|r| r.commute_risk_score).collect();
        assert_eq!(scores, vec![3, 4, 1, 1]);
    }

    #[test]
    fn login_gap_is_rounded_and_non_negative() {
        let (records, _) = normalize_all("Student_ID,Login_Gap_Days\nS1,4.4\nS2,-2\n");
        assert_eq!(records[0].login_gap_days, 4);
        assert_eq!(records[1].login_gap_days, 0);
    }
}
