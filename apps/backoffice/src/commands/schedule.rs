//! # Schedule Commands
//!
//! Staff work schedules. Dates are `YYYY-MM-DD`, times `HH:MM`.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::{date_arg, id_arg, time_arg};
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{EmployeeHours, NewWorkSchedule, WorkSchedule};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduleDto {
    pub id: String,
    pub employee: String,
    pub work_date: String,
    pub start_time: String,
    pub end_time: String,
    pub notes: Option<String>,
}

impl From<WorkSchedule> for ScheduleDto {
    fn from(s: WorkSchedule) -> Self {
        ScheduleDto {
            id: s.id,
            employee: s.employee,
            work_date: s.work_date.format("%Y-%m-%d").to_string(),
            start_time: s.start_time.format("%H:%M").to_string(),
            end_time: s.end_time.format("%H:%M").to_string(),
            notes: s.notes,
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddScheduleRequest {
    pub employee: String,
    pub work_date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EmployeeHoursDto {
    pub employee: String,
    pub minutes: i64,
    pub hours: f64,
}

impl From<EmployeeHours> for EmployeeHoursDto {
    fn from(h: EmployeeHours) -> Self {
        EmployeeHoursDto {
            employee: h.employee,
            minutes: h.minutes,
            hours: h.hours,
        }
    }
}

pub async fn list_schedules(db: &DbState, session: &Session) -> Result<Vec<ScheduleDto>, ApiError> {
    debug!("list_schedules command");
    let rows = db.inner().schedules().list(session.owner_id()).await?;
    Ok(rows.into_iter().map(ScheduleDto::from).collect())
}

pub async fn add_schedule(
    db: &DbState,
    session: &Session,
    request: AddScheduleRequest,
) -> Result<ScheduleDto, ApiError> {
    debug!(employee = %request.employee, date = %request.work_date, "add_schedule command");
    let input = NewWorkSchedule {
        employee: request.employee,
        work_date: date_arg("workDate", &request.work_date)?,
        start_time: time_arg("startTime", &request.start_time)?,
        end_time: time_arg("endTime", &request.end_time)?,
        notes: request.notes,
    };
    let row = db.inner().schedules().add(session.owner_id(), input).await?;
    Ok(ScheduleDto::from(row))
}

pub async fn delete_schedule(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_schedule command");
    let id = id_arg("id", id)?;
    db.inner().schedules().delete(session.owner_id(), id).await?;
    Ok(())
}

/// Hours per employee on `date`.
pub async fn hours_by_employee(
    db: &DbState,
    session: &Session,
    date: &str,
) -> Result<Vec<EmployeeHoursDto>, ApiError> {
    debug!(date = %date, "hours_by_employee command");
    let date = date_arg("date", date)?;
    let hours = db
        .inner()
        .schedules()
        .hours_by_employee(session.owner_id(), date)
        .await?;
    Ok(hours.into_iter().map(EmployeeHoursDto::from).collect())
}
