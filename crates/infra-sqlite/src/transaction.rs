// SQLite Ledger Transaction Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use festival_core::domain::{AttendeeId, StageId, Ticket};
use festival_core::error::Result;
use festival_core::port::{CapacityChange, LedgerTransaction, Transaction};
use sqlx::{Sqlite, Transaction as SqlxTransaction};

/// Ledger writes scoped to one SQLite transaction.
///
/// Dropping it without `commit` rolls everything back.
pub struct SqliteLedgerTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteLedgerTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl<'a> Transaction for SqliteLedgerTransaction<'a> {
    async fn commit(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<()> {
        let this = *self;
        this.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl<'a> LedgerTransaction for SqliteLedgerTransaction<'a> {
    async fn attendee_exists(&mut self, attendee: &AttendeeId) -> Result<bool> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM attendees WHERE id = ?)")
            .bind(attendee.as_str())
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(exists != 0)
    }

    async fn adjust_capacity(&mut self, stage: &StageId, delta: i64) -> Result<CapacityChange> {
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE stages
            SET capacity = capacity + ?
            WHERE id = ? AND capacity + ? >= 0
            RETURNING capacity
            "#,
        )
        .bind(delta)
        .bind(stage.as_str())
        .bind(delta)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        if let Some(capacity) = updated {
            return Ok(CapacityChange::Applied { capacity });
        }

        let current: Option<i64> = sqlx::query_scalar("SELECT capacity FROM stages WHERE id = ?")
            .bind(stage.as_str())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(match current {
            Some(capacity) => CapacityChange::Insufficient { capacity },
            None => CapacityChange::StageMissing,
        })
    }

    async fn push_ticket(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendee_tickets (attendee_id, stage_id, date)
            SELECT id, ?, ? FROM attendees WHERE id = ?
            "#,
        )
        .bind(ticket.stage.as_str())
        .bind(ticket.date)
        .bind(attendee.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_tickets(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM attendee_tickets
            WHERE attendee_id = ? AND stage_id = ? AND date = ?
            "#,
        )
        .bind(attendee.as_str())
        .bind(ticket.stage.as_str())
        .bind(ticket.date)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(count as u64)
    }

    async fn pull_ticket(&mut self, attendee: &AttendeeId, ticket: &Ticket) -> Result<bool> {
        // Identical tickets are interchangeable: remove the oldest match
        let result = sqlx::query(
            r#"
            DELETE FROM attendee_tickets
            WHERE seq = (
                SELECT seq FROM attendee_tickets
                WHERE attendee_id = ? AND stage_id = ? AND date = ?
                ORDER BY seq ASC
                LIMIT 1
            )
            "#,
        )
        .bind(attendee.as_str())
        .bind(ticket.stage.as_str())
        .bind(ticket.date)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }
}
