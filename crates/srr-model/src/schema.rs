//! The canonical output schema and its raw-column alias registry.
//!
//! Every refined record carries exactly these eleven fields, in this order.
//! The alias lists are the recognized raw header spellings for each field;
//! matching is handled by the resolver, which normalizes both sides before
//! comparing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the eleven fixed canonical fields, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    Id,
    Name,
    Department,
    AttendanceRate,
    EngagementScore,
    AcademicPerformanceIndex,
    LoginGapDays,
    FailureRatio,
    FinancialRiskFlag,
    CommuteRiskScore,
    SemesterPerformanceTrend,
}

impl CanonicalField {
    /// All canonical fields in output order.
    pub const ALL: [CanonicalField; 11] = [
        CanonicalField::Id,
        CanonicalField::Name,
        CanonicalField::Department,
        CanonicalField::AttendanceRate,
        CanonicalField::EngagementScore,
        CanonicalField::AcademicPerformanceIndex,
        CanonicalField::LoginGapDays,
        CanonicalField::FailureRatio,
        CanonicalField::FinancialRiskFlag,
        CanonicalField::CommuteRiskScore,
        CanonicalField::SemesterPerformanceTrend,
    ];

    /// Number of canonical fields.
    pub const COUNT: usize = Self::ALL.len();

    /// The canonical column name as it appears in output headers.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Department => "department",
            Self::AttendanceRate => "attendance_rate",
            Self::EngagementScore => "engagement_score",
            Self::AcademicPerformanceIndex => "academic_performance_index",
            Self::LoginGapDays => "login_gap_days",
            Self::FailureRatio => "failure_ratio",
            Self::FinancialRiskFlag => "financial_risk_flag",
            Self::CommuteRiskScore => "commute_risk_score",
            Self::SemesterPerformanceTrend => "semester_performance_trend",
        }
    }

    /// Recognized raw header aliases, in match priority order.
    ///
    /// Aliases are stored pre-normalized (lowercase, underscores); the
    /// resolver normalizes raw headers the same way before comparing.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Id => &["id", "student_id", "roll_no", "enrollment"],
            Self::Name => &["name", "student_name", "full_name"],
            Self::Department => &["department", "dept", "branch"],
            Self::AttendanceRate => &["attendance_%", "attendance", "attendance_rate"],
            Self::EngagementScore => &["engagement_score", "engagement"],
            Self::AcademicPerformanceIndex => &[
                "academic_performance_index",
                "cgpa",
                "gpa",
                "academic_index",
            ],
            Self::LoginGapDays => &["login_gap_days", "login_gap"],
            Self::FailureRatio => &["failure_ratio", "fail_ratio"],
            Self::FinancialRiskFlag => &["financial_risk_flag", "financial_risk"],
            Self::CommuteRiskScore => &["commute_risk_score", "commute_risk"],
            Self::SemesterPerformanceTrend => &[
                "semester_performance_trend",
                "sem2_gpa",
                "sem1_gpa",
                "trend",
                "performance_trend",
            ],
        }
    }

    /// True for the eight metric-bearing fields (everything except the
    /// identifying columns `id`, `name`, `department`).
    #[must_use]
    pub fn is_metric(self) -> bool {
        !matches!(self, Self::Id | Self::Name | Self::Department)
    }

    /// True for the three fields that get IQR-based outlier capping.
    #[must_use]
    pub fn is_bounded(self) -> bool {
        matches!(
            self,
            Self::AttendanceRate | Self::EngagementScore | Self::AcademicPerformanceIndex
        )
    }

    /// True for the seven numeric fields whose missing values are imputed
    /// from the column mean (the financial flag defaults to false instead).
    #[must_use]
    pub fn is_mean_imputed(self) -> bool {
        matches!(
            self,
            Self::AttendanceRate
                | Self::EngagementScore
                | Self::AcademicPerformanceIndex
                | Self::LoginGapDays
                | Self::FailureRatio
                | Self::CommuteRiskScore
                | Self::SemesterPerformanceTrend
        )
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
