//! Hours worked per employee, from work-schedule rows.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::types::WorkSchedule;

/// Minutes worked by one employee on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeHours {
    pub employee: String,
    pub minutes: i64,
    /// `minutes / 60`, for display.
    pub hours: f64,
}

/// Sums `end - start` per employee for rows on `date`.
///
/// Spans that end at or before they start (overnight or mistyped rows)
/// count as zero. Sorted by employee name.
pub fn hours_by_employee(rows: &[WorkSchedule], date: NaiveDate) -> Vec<EmployeeHours> {
    let mut minutes: BTreeMap<&str, i64> = BTreeMap::new();

    for row in rows.iter().filter(|r| r.work_date == date) {
        let span = (row.end_time - row.start_time).num_minutes().max(0);
        *minutes.entry(row.employee.as_str()).or_insert(0) += span;
    }

    minutes
        .into_iter()
        .map(|(employee, minutes)| EmployeeHours {
            employee: employee.to_string(),
            minutes,
            hours: minutes as f64 / 60.0,
        })
        .collect()
}
