//! # Expense Repository
//!
//! Expense Ledger: an append/delete log of dated outgoings. Expenses never
//! touch stock; they only feed the shift reconciliation.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::DbResult;
use mostrador_core::validation::{
    validate_expense_amount, validate_expense_description, validate_short_text,
};
use mostrador_core::{CoreError, Expense, NewExpense};

/// Repository for expense database operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Lists the owner's expenses, latest date first.
    pub async fn list(&self, owner_id: &str) -> DbResult<Vec<Expense>> {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, owner_id, expense_date, description, amount_cents,
                   category, payment_method, created_at
            FROM expenses
            WHERE owner_id = ?1
            ORDER BY expense_date DESC, created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(owner_id = %owner_id, count = expenses.len(), "Listed expenses");
        Ok(expenses)
    }

    /// Appends an expense.
    ///
    /// ## Errors
    /// * `Validation` - blank description, amount not positive, over-long
    ///   category or payment method
    pub async fn add(&self, owner_id: &str, input: NewExpense) -> DbResult<Expense> {
        let description = validate_expense_description(&input.description)?;
        validate_expense_amount(input.amount)?;
        let category = validate_short_text("category", input.category.as_deref())?;
        let payment_method =
            validate_short_text("payment_method", input.payment_method.as_deref())?;

        let expense = Expense {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            expense_date: input.expense_date,
            description,
            amount_cents: input.amount.cents(),
            category,
            payment_method,
            created_at: Utc::now(),
        };

        debug!(id = %expense.id, amount = %input.amount, "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (
                id, owner_id, expense_date, description, amount_cents,
                category, payment_method, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.owner_id)
        .bind(expense.expense_date)
        .bind(&expense.description)
        .bind(expense.amount_cents)
        .bind(&expense.category)
        .bind(&expense.payment_method)
        .bind(expense.created_at)
        .execute(&self.pool)
        .await?;

        info!(id = %expense.id, amount = %input.amount, "Expense recorded");
        Ok(expense)
    }

    /// Deletes an expense.
    pub async fn delete(&self, owner_id: &str, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1 AND owner_id = ?2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            warn!(id = %id, "Expense not found for delete");
            return Err(CoreError::not_found("Expense", id).into());
        }

        info!(id = %id, "Expense deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::test_support::{db, OTHER_OWNER, OWNER};
    use chrono::NaiveDate;
    use mostrador_core::{ErrorKind, Money};

    fn input(day: u32, description: &str, cents: i64) -> NewExpense {
        NewExpense {
            expense_date: NaiveDate::from_ymd_opt(2024, 6, day).unwrap(),
            description: description.to_string(),
            amount: Money::from_cents(cents),
            category: Some("insumos".to_string()),
            payment_method: Some("  ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_latest_first() {
        let db = db().await;
        db.expenses().add(OWNER, input(1, "Leche", 1200)).await.unwrap();
        let gas = db.expenses().add(OWNER, input(5, " Gas ", 4500)).await.unwrap();
        db.expenses().add(OTHER_OWNER, input(9, "Ajeno", 100)).await.unwrap();

        assert_eq!(gas.description, "Gas");
        assert_eq!(gas.payment_method, None);
        assert_eq!(gas.bucket_source(), "insumos");

        let list = db.expenses().list(OWNER).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, gas.id);
        assert_eq!(list[0].amount().cents(), 4500);
        assert_eq!(list[1].description, "Leche");
    }

    #[tokio::test]
    async fn test_rejects_non_positive_amount() {
        let db = db().await;
        for cents in [0, -500] {
            let err = db.expenses().add(OWNER, input(1, "Nada", cents)).await.unwrap_err();
            assert_eq!(err.as_domain().unwrap().kind(), ErrorKind::Validation);
        }
        let err = db.expenses().add(OWNER, input(1, "   ", 100)).await.unwrap_err();
        assert_eq!(err.as_domain().unwrap().kind(), ErrorKind::Validation);

        assert!(db.expenses().list(OWNER).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_owner_scoped() {
        let db = db().await;
        let expense = db.expenses().add(OWNER, input(2, "Hielo", 300)).await.unwrap();

        let err = db.expenses().delete(OTHER_OWNER, &expense.id).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::NotFound { .. })));

        db.expenses().delete(OWNER, &expense.id).await.unwrap();
        assert!(db.expenses().list(OWNER).await.unwrap().is_empty());

        let again = db.expenses().delete(OWNER, &expense.id).await.unwrap_err();
        assert_eq!(again.as_domain().unwrap().kind(), ErrorKind::NotFound);
    }
}
