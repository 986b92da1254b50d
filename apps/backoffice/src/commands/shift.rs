//! # Shift Commands
//!
//! Arqueo: open a cash shift, watch the live preview, close with the counted
//! drawer.
//!
//! ```text
//! open_shift(1000) ─► preview_shift() ... preview_shift() ─► close_shift(1240, "faltan 10")
//!                                                             │
//!                                 expectedCash 1250, discrepancy -10
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::money_arg;
use crate::error::ApiError;
use crate::state::{DbState, Session};
use mostrador_core::{BucketTotals, CashShift, ShiftCloseReport, ShiftPreview};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShiftDto {
    pub id: String,
    pub opened_at: String,
    pub opening_balance_cents: i64,
    pub closed_at: Option<String>,
    pub closing_balance_cents: Option<i64>,
    pub comment: Option<String>,
}

impl From<CashShift> for ShiftDto {
    fn from(s: CashShift) -> Self {
        ShiftDto {
            id: s.id,
            opened_at: s.opened_at.to_rfc3339(),
            opening_balance_cents: s.opening_balance_cents,
            closed_at: s.closed_at.map(|t| t.to_rfc3339()),
            closing_balance_cents: s.closing_balance_cents,
            comment: s.comment,
        }
    }
}

/// Per-bucket amounts in cents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BucketTotalsDto {
    pub cash_cents: i64,
    pub card_cents: i64,
    pub transfer_cents: i64,
    pub qr_cents: i64,
    pub other_cents: i64,
    pub total_cents: i64,
}

impl From<BucketTotals> for BucketTotalsDto {
    fn from(b: BucketTotals) -> Self {
        BucketTotalsDto {
            cash_cents: b.cash.cents(),
            card_cents: b.card.cents(),
            transfer_cents: b.transfer.cents(),
            qr_cents: b.qr.cents(),
            other_cents: b.other.cents(),
            total_cents: b.total.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ShiftPreviewDto {
    pub shift_id: String,
    pub window_start: String,
    pub window_end: String,
    pub opening_balance_cents: i64,
    pub sales: BucketTotalsDto,
    pub expenses: BucketTotalsDto,
    pub net_cents: i64,
    pub expected_cash_cents: i64,
}

impl From<ShiftPreview> for ShiftPreviewDto {
    fn from(p: ShiftPreview) -> Self {
        ShiftPreviewDto {
            shift_id: p.shift_id,
            window_start: p.window_start.to_rfc3339(),
            window_end: p.window_end.to_rfc3339(),
            opening_balance_cents: p.opening_balance.cents(),
            sales: p.sales.into(),
            expenses: p.expenses.into(),
            net_cents: p.net.cents(),
            expected_cash_cents: p.expected_cash.cents(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CloseShiftResponse {
    pub shift: ShiftDto,
    pub preview: ShiftPreviewDto,
    /// Counted minus expected. Positive means surplus.
    pub discrepancy_cents: i64,
}

impl From<ShiftCloseReport> for CloseShiftResponse {
    fn from(r: ShiftCloseReport) -> Self {
        CloseShiftResponse {
            shift: r.shift.into(),
            preview: r.preview.into(),
            discrepancy_cents: r.discrepancy.cents(),
        }
    }
}

pub async fn get_open_shift(db: &DbState, session: &Session) -> Result<Option<ShiftDto>, ApiError> {
    debug!("get_open_shift command");
    let shift = db.inner().shifts().get_open(session.owner_id()).await?;
    Ok(shift.map(ShiftDto::from))
}

pub async fn open_shift(db: &DbState, session: &Session, opening: f64) -> Result<ShiftDto, ApiError> {
    debug!(opening, "open_shift command");
    let opening = money_arg(opening, "openingBalance")?;
    let shift = db.inner().shifts().open(session.owner_id(), opening).await?;
    Ok(ShiftDto::from(shift))
}

pub async fn preview_shift(db: &DbState, session: &Session) -> Result<ShiftPreviewDto, ApiError> {
    debug!("preview_shift command");
    let preview = db.inner().shifts().preview(session.owner_id()).await?;
    Ok(ShiftPreviewDto::from(preview))
}

pub async fn close_shift(
    db: &DbState,
    session: &Session,
    closing: f64,
    comment: Option<String>,
) -> Result<CloseShiftResponse, ApiError> {
    debug!(closing, "close_shift command");
    let closing = money_arg(closing, "closingBalance")?;
    let report = db
        .inner()
        .shifts()
        .close(session.owner_id(), closing, comment.as_deref())
        .await?;
    Ok(CloseShiftResponse::from(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::setup;
    use crate::error::ErrorCode;

    #[tokio::test]
    async fn test_shift_round_trip() {
        let (db, session) = setup().await;
        assert!(get_open_shift(&db, &session).await.unwrap().is_none());

        let err = preview_shift(&db, &session).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let shift = open_shift(&db, &session, 10.0).await.unwrap();
        assert_eq!(shift.opening_balance_cents, 1000);

        let err = open_shift(&db, &session, 1.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);

        let preview = preview_shift(&db, &session).await.unwrap();
        assert_eq!(preview.expected_cash_cents, 1000);
        assert_eq!(preview.sales.total_cents, 0);

        let closed = close_shift(&db, &session, 10.5, Some("propina".into())).await.unwrap();
        assert_eq!(closed.discrepancy_cents, 50);
        assert_eq!(closed.shift.closing_balance_cents, Some(1050));
        assert!(closed.shift.closed_at.is_some());

        let err = close_shift(&db, &session, 0.0, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_negative_balances_rejected() {
        let (db, session) = setup().await;
        let err = open_shift(&db, &session, -1.0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        open_shift(&db, &session, 0.0).await.unwrap();
        let err = close_shift(&db, &session, -0.01, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_open_shift(&db, &session).await.unwrap().is_some());
    }
}
