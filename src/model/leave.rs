use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Closed set of leave categories. Input is case-insensitive ("sick",
/// "Sick Leave", "SICK" all parse); the canonical spelling is upper-case.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Display, EnumString,
    ToSchema,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveType {
    #[strum(to_string = "SICK", serialize = "SICK LEAVE")]
    Sick,
    #[strum(to_string = "CASUAL", serialize = "CASUAL LEAVE")]
    Casual,
    #[strum(to_string = "PAID", serialize = "PAID LEAVE")]
    Paid,
    #[strum(to_string = "UNPAID", serialize = "UNPAID LEAVE")]
    Unpaid,
    #[strum(to_string = "MATERNITY", serialize = "MATERNITY LEAVE")]
    Maternity,
    #[strum(to_string = "SAMPLE", serialize = "SAMPLE LEAVE")]
    Sample,
}

impl LeaveType {
    pub const VARIANTS: &'static [&'static str] =
        &["SICK", "CASUAL", "PAID", "UNPAID", "MATERNITY", "SAMPLE"];
}

// Case-insensitive on the way in, canonical upper-case on the way out.
impl<'de> Deserialize<'de> for LeaveType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| serde::de::Error::unknown_variant(&raw, Self::VARIANTS))
    }
}

/// PENDING is the only initial status and never a transition target.
/// CANCELLED is terminal.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn is_terminal(self) -> bool {
        self == LeaveStatus::Cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    /// Assigned once by the store, never reused.
    pub id: u64,
    pub employee_id: u64,
    #[schema(example = "2026-01-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-01-12", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
    /// Primary approver address.
    pub applying_to: String,
    /// Secondary recipients, at most 2 at write time.
    pub cc_to: Vec<String>,
    pub contact_details: String,
    pub status: LeaveStatus,
    /// Reference into the external file store; never affects lifecycle rules.
    pub attachment: Option<String>,
    /// Append-only, never shrinks or reorders.
    pub remarks: Vec<String>,
    /// Inclusive day count over [from_date, to_date].
    pub number_of_days: i64,
}

impl LeaveRequest {
    pub fn inclusive_days(from: NaiveDate, to: NaiveDate) -> i64 {
        (to - from).num_days() + 1
    }
}

/// Approved leave days per canonical type plus the grand total,
/// recomputed from the full APPROVED set on every query.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    pub employee_id: u64,
    /// Approved day totals keyed by canonical leave type.
    #[schema(value_type = Object)]
    pub days_by_type: BTreeMap<LeaveType, i64>,
    pub total_days: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_type_json_accepts_any_case_and_emits_canonical() {
        let t: LeaveType = serde_json::from_str("\"casual\"").unwrap();
        assert_eq!(t, LeaveType::Casual);
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"CASUAL\"");
        assert!(serde_json::from_str::<LeaveType>("\"vacation\"").is_err());
    }

    #[test]
    fn inclusive_day_count_includes_both_endpoints() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let to = NaiveDate::from_ymd_opt(2024, 1, 12).unwrap();
        assert_eq!(LeaveRequest::inclusive_days(from, to), 3);
        assert_eq!(LeaveRequest::inclusive_days(from, from), 1);
    }
}
