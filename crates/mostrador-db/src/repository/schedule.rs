//! # Schedule Repository
//!
//! Staff Schedule: work-schedule rows and hours per employee.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::schedule::hours_by_employee;
use mostrador_core::validation::{validate_employee, validate_note};
use mostrador_core::{CoreError, EmployeeHours, NewWorkSchedule, WorkSchedule};

/// Repository for work-schedule database operations.
#[derive(Debug, Clone)]
pub struct ScheduleRepository {
    pool: SqlitePool,
}

impl ScheduleRepository {
    /// Creates a new ScheduleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ScheduleRepository { pool }
    }

    /// Lists the owner's schedule rows, latest work date first.
    pub async fn list(&self, owner_id: &str) -> DbResult<Vec<WorkSchedule>> {
        let rows = sqlx::query_as::<_, WorkSchedule>(
            r#"
            SELECT id, owner_id, employee, work_date, start_time, end_time, notes, created_at
            FROM work_schedules
            WHERE owner_id = ?1
            ORDER BY work_date DESC, start_time, employee
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner_id = %owner_id, count = rows.len(), "Listed schedules");
        Ok(rows)
    }

    /// Adds a schedule row. A shift that ends before it starts is stored
    /// as given and counts as zero hours.
    pub async fn add(&self, owner_id: &str, input: NewWorkSchedule) -> DbResult<WorkSchedule> {
        let row = WorkSchedule {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            employee: validate_employee(&input.employee)?,
            work_date: input.work_date,
            start_time: input.start_time,
            end_time: input.end_time,
            notes: validate_note("notes", input.notes.as_deref())?,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO work_schedules (
                id, owner_id, employee, work_date, start_time, end_time, notes, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&row.id)
        .bind(&row.owner_id)
        .bind(&row.employee)
        .bind(row.work_date)
        .bind(row.start_time)
        .bind(row.end_time)
        .bind(&row.notes)
        .bind(row.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %row.id, employee = %row.employee, date = %row.work_date, "Schedule added");
        Ok(row)
    }

    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM work_schedules WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(id = %id, "Schedule not found for delete");
            return Err(CoreError::not_found("Schedule", id).into());
        }

        info!(id = %id, "Schedule deleted");
        Ok(())
    }

    /// Minutes worked per employee on `date`, sorted by employee.
    pub async fn hours_by_employee(
        &self,
        owner_id: &str,
        date: NaiveDate,
    ) -> DbResult<Vec<EmployeeHours>> {
        let rows = sqlx::query_as::<_, WorkSchedule>(
            r#"
            SELECT id, owner_id, employee, work_date, start_time, end_time, notes, created_at
            FROM work_schedules
            WHERE owner_id = ?1 AND work_date = ?2
            "#,
        )
        .bind(owner_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(hours_by_employee(&rows, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::test_support::{db, OTHER_OWNER, OWNER};
    use chrono::NaiveTime;
    use mostrador_core::ErrorKind;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn shift(employee: &str, day: u32, start: u32, end: u32) -> NewWorkSchedule {
        NewWorkSchedule {
            employee: employee.to_string(),
            work_date: date(day),
            start_time: NaiveTime::from_hms_opt(start, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(end, 30, 0).unwrap(),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_list_latest_date_first() {
        let db = db().await;
        db.schedules().add(OWNER, shift("Ana", 1, 8, 12)).await.unwrap();
        db.schedules().add(OWNER, shift("Ana", 3, 8, 12)).await.unwrap();
        db.schedules().add(OTHER_OWNER, shift("Ajeno", 9, 8, 12)).await.unwrap();

        let rows = db.schedules().list(OWNER).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].work_date, date(3));
        assert_eq!(rows[0].start_time, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(rows[1].work_date, date(1));
    }

    #[tokio::test]
    async fn test_hours_by_employee() {
        let db = db().await;
        db.schedules().add(OWNER, shift("Ana", 2, 8, 12)).await.unwrap();
        db.schedules().add(OWNER, shift("Ana", 2, 14, 17)).await.unwrap();
        db.schedules().add(OWNER, shift("Beto", 2, 22, 6)).await.unwrap();
        db.schedules().add(OWNER, shift("Ana", 3, 8, 9)).await.unwrap();
        db.schedules().add(OTHER_OWNER, shift("Ana", 2, 8, 20)).await.unwrap();

        let hours = db.schedules().hours_by_employee(OWNER, date(2)).await.unwrap();
        assert_eq!(hours.len(), 2);
        assert_eq!(hours[0].employee, "Ana");
        // 08:00-12:30 and 14:00-17:30
        assert_eq!(hours[0].minutes, 270 + 210);
        assert_eq!(hours[1].employee, "Beto");
        assert_eq!(hours[1].minutes, 0);
    }

    #[tokio::test]
    async fn test_add_requires_employee_and_delete() {
        let db = db().await;
        let err = db.schedules().add(OWNER, shift("  ", 1, 8, 12)).await.unwrap_err();
        assert_eq!(err.as_domain().unwrap().kind(), ErrorKind::Validation);

        let row = db.schedules().add(OWNER, shift("Ana", 1, 8, 12)).await.unwrap();
        let err = db.schedules().delete(OTHER_OWNER, &row.id).await.unwrap_err();
        assert_eq!(err.as_domain().unwrap().kind(), ErrorKind::NotFound);

        db.schedules().delete(OWNER, &row.id).await.unwrap();
        assert!(db.schedules().list(OWNER).await.unwrap().is_empty());
    }
}
