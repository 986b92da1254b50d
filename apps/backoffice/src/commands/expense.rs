//! # Expense Commands

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::{date_arg, id_arg, money_arg};
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{Expense, NewExpense};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ExpenseDto {
    pub id: String,
    pub expense_date: String,
    pub description: String,
    pub amount_cents: i64,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub created_at: String,
}

impl From<Expense> for ExpenseDto {
    fn from(e: Expense) -> Self {
        ExpenseDto {
            id: e.id,
            expense_date: e.expense_date.format("%Y-%m-%d").to_string(),
            description: e.description,
            amount_cents: e.amount_cents,
            category: e.category,
            payment_method: e.payment_method,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AddExpenseRequest {
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub category: Option<String>,
    /// Takes precedence over `category` when the shift is reconciled.
    #[serde(default)]
    pub payment_method: Option<String>,
    /// `YYYY-MM-DD`; today (UTC) when absent.
    #[serde(default)]
    pub expense_date: Option<String>,
}

pub async fn list_expenses(db: &DbState, session: &Session) -> Result<Vec<ExpenseDto>, ApiError> {
    debug!("list_expenses command");
    let expenses = db.inner().expenses().list(session.owner_id()).await?;
    Ok(expenses.into_iter().map(ExpenseDto::from).collect())
}

pub async fn add_expense(
    db: &DbState,
    session: &Session,
    request: AddExpenseRequest,
) -> Result<ExpenseDto, ApiError> {
    debug!(amount = request.amount, "add_expense command");

    let expense_date = match request.expense_date.as_deref() {
        Some(date) => date_arg("expenseDate", date)?,
        None => Utc::now().date_naive(),
    };
    let input = NewExpense {
        expense_date,
        description: request.description,
        amount: money_arg(request.amount, "amount")?,
        category: request.category,
        payment_method: request.payment_method,
    };

    let expense = db.inner().expenses().add(session.owner_id(), input).await?;
    Ok(ExpenseDto::from(expense))
}

pub async fn delete_expense(db: &DbState, session: &Session, id: &str) -> Result<(), ApiError> {
    debug!(id = %id, "delete_expense command");
    let id = id_arg("id", id)?;
    db.inner().expenses().delete(session.owner_id(), id).await?;
    Ok(())
}
