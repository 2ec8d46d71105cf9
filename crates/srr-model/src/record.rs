//! The typed canonical record emitted by the normalizer.

use serde::{Deserialize, Serialize};

use crate::schema::CanonicalField;

/// One fully-populated refined record.
///
/// Every field is always present; the normalizer substitutes means or
/// documented defaults before a record is constructed, so no partial
/// records exist downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRecord {
    pub id: String,
    pub name: String,
    pub department: String,
    pub attendance_rate: f64,
    pub engagement_score: f64,
    pub academic_performance_index: f64,
    pub login_gap_days: i64,
    pub failure_ratio: f64,
    pub financial_risk_flag: bool,
    pub commute_risk_score: i64,
    pub semester_performance_trend: f64,
}

impl CanonicalRecord {
    /// Value of one of the three bounded fields, if `field` is bounded.
    #[must_use]
    pub fn bounded_value(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::AttendanceRate => Some(self.attendance_rate),
            CanonicalField::EngagementScore => Some(self.engagement_score),
            CanonicalField::AcademicPerformanceIndex => Some(self.academic_performance_index),
            _ => None,
        }
    }

    /// Overwrite one of the three bounded fields; other fields are ignored.
    pub fn set_bounded_value(&mut self, field: CanonicalField, value: f64) {
        match field {
            CanonicalField::AttendanceRate => self.attendance_rate = value,
            CanonicalField::EngagementScore => self.engagement_score = value,
            CanonicalField::AcademicPerformanceIndex => self.academic_performance_index = value,
            _ => {}
        }
    }

    /// Canonical textual form of a field, as written to output.
    ///
    /// Booleans render as `1`/`0`; floats are trimmed of trailing zeros.
    #[must_use]
    pub fn render_field(&self, field: CanonicalField) -> String {
        match field {
            CanonicalField::Id => self.id.clone(),
            CanonicalField::Name => self.name.clone(),
            CanonicalField::Department => self.department.clone(),
            CanonicalField::AttendanceRate => format_numeric(self.attendance_rate),
            CanonicalField::EngagementScore => format_numeric(self.engagement_score),
            CanonicalField::AcademicPerformanceIndex => {
                format_numeric(self.academic_performance_index)
            }
            CanonicalField::LoginGapDays => self.login_gap_days.to_string(),
            CanonicalField::FailureRatio => format_numeric(self.failure_ratio),
            CanonicalField::FinancialRiskFlag => {
                if self.financial_risk_flag { "1" } else { "0" }.to_string()
            }
            CanonicalField::CommuteRiskScore => self.commute_risk_score.to_string(),
            CanonicalField::SemesterPerformanceTrend => {
                format_numeric(self.semester_performance_trend)
            }
        }
    }
}

/// Formats a floating-point number as a string without trailing zeros.
#[must_use]
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
