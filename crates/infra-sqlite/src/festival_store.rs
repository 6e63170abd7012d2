// SQLite Festival Store: registry, catalog and ledger transactions

use crate::error::map_sqlx_error;
use crate::SqliteLedgerTransaction;
use async_trait::async_trait;
use chrono::NaiveDate;
use festival_core::domain::{
    Attendee, AttendeeId, Band, BandId, Performance, PerformanceId, Stage, StageId, Ticket,
};
use festival_core::error::Result;
use festival_core::port::{
    CatalogRepository, FestivalRepository, LedgerTransaction, RecordStream,
    TransactionalLedgerStore,
};
use futures::{StreamExt, TryStreamExt};
use sqlx::SqlitePool;

pub struct SqliteFestivalStore {
    pool: SqlitePool,
}

impl SqliteFestivalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn load_tickets(&self, attendee: &str) -> Result<Vec<Ticket>> {
        let rows: Vec<TicketRow> = sqlx::query_as(
            r#"
            SELECT stage_id, date FROM attendee_tickets
            WHERE attendee_id = ?
            ORDER BY seq ASC
            "#,
        )
        .bind(attendee)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(TicketRow::into_ticket).collect())
    }

    async fn hydrate(&self, row: AttendeeRow) -> Result<Attendee> {
        let tickets = self.load_tickets(&row.id).await?;
        row.into_attendee(tickets)
    }
}

#[async_trait]
impl FestivalRepository for SqliteFestivalStore {
    async fn insert_attendee(&self, attendee: &Attendee) -> Result<()> {
        let genres = serde_json::to_string(&attendee.favorite_genres)?;
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO attendees (id, name, city, age, favorite_genres)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(attendee.id.as_str())
        .bind(&attendee.name)
        .bind(&attendee.city)
        .bind(attendee.age)
        .bind(&genres)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        for ticket in &attendee.tickets {
            sqlx::query(
                "INSERT INTO attendee_tickets (attendee_id, stage_id, date) VALUES (?, ?, ?)",
            )
            .bind(attendee.id.as_str())
            .bind(ticket.stage.as_str())
            .bind(ticket.date)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn insert_stage(&self, stage: &Stage) -> Result<()> {
        sqlx::query("INSERT INTO stages (id, name, city, capacity) VALUES (?, ?, ?, ?)")
            .bind(stage.id.as_str())
            .bind(&stage.name)
            .bind(&stage.city)
            .bind(stage.capacity)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_band(&self, band: &Band) -> Result<()> {
        sqlx::query("INSERT INTO bands (id, name, genre, active) VALUES (?, ?, ?, ?)")
            .bind(band.id.as_str())
            .bind(&band.name)
            .bind(&band.genre)
            .bind(band.active)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_performance(&self, performance: &Performance) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO performances (id, band_id, stage_id, date, duration_minutes)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(performance.id.as_str())
        .bind(performance.band.as_str())
        .bind(performance.stage.as_str())
        .bind(performance.date)
        .bind(performance.duration_minutes)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_attendee(&self, id: &AttendeeId) -> Result<Option<Attendee>> {
        let row = sqlx::query_as::<_, AttendeeRow>(
            "SELECT id, name, city, age, favorite_genres FROM attendees WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_stage(&self, id: &StageId) -> Result<Option<Stage>> {
        let row = sqlx::query_as::<_, StageRow>(
            "SELECT id, name, city, capacity FROM stages WHERE id = ?",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(StageRow::into_stage))
    }

    async fn find_attendees_by_name(&self, name: &str) -> Result<Vec<Attendee>> {
        let rows: Vec<AttendeeRow> = sqlx::query_as(
            r#"
            SELECT id, name, city, age, favorite_genres FROM attendees
            WHERE name = ?
            ORDER BY id ASC
            "#,
        )
        .bind(name)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let mut attendees = Vec::with_capacity(rows.len());
        for row in rows {
            attendees.push(self.hydrate(row).await?);
        }
        Ok(attendees)
    }
}

impl CatalogRepository for SqliteFestivalStore {
    fn stages_by_city<'a>(&'a self, city: &'a str) -> RecordStream<'a, Stage> {
        sqlx::query_as::<_, StageRow>(
            r#"
            SELECT id, name, city, capacity FROM stages
            WHERE city = ?
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(city)
        .fetch(&self.pool)
        .map_ok(StageRow::into_stage)
        .map_err(map_sqlx_error)
        .boxed()
    }

    fn active_bands_by_genre<'a>(&'a self, genre: &'a str) -> RecordStream<'a, Band> {
        sqlx::query_as::<_, BandRow>(
            r#"
            SELECT id, name, genre, active FROM bands
            WHERE genre = ? AND active = 1
            ORDER BY name ASC, id ASC
            "#,
        )
        .bind(genre)
        .fetch(&self.pool)
        .map_ok(BandRow::into_band)
        .map_err(map_sqlx_error)
        .boxed()
    }

    fn performances_at_stage<'a>(
        &'a self,
        stage: &'a StageId,
    ) -> RecordStream<'a, Performance> {
        sqlx::query_as::<_, PerformanceRow>(
            r#"
            SELECT id, band_id, stage_id, date, duration_minutes FROM performances
            WHERE stage_id = ?
            ORDER BY date ASC, id ASC
            "#,
        )
        .bind(stage.as_str())
        .fetch(&self.pool)
        .map_ok(PerformanceRow::into_performance)
        .map_err(map_sqlx_error)
        .boxed()
    }
}

#[async_trait]
impl TransactionalLedgerStore for SqliteFestivalStore {
    async fn begin_transaction(&self) -> Result<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteLedgerTransaction::new(tx)))
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AttendeeRow {
    id: String,
    name: String,
    city: Option<String>,
    age: Option<i32>,
    favorite_genres: String, // JSON array
}

impl AttendeeRow {
    fn into_attendee(self, tickets: Vec<Ticket>) -> Result<Attendee> {
        let favorite_genres: Vec<String> = serde_json::from_str(&self.favorite_genres)?;
        Ok(Attendee {
            id: AttendeeId::new(self.id),
            name: self.name,
            city: self.city,
            age: self.age,
            favorite_genres,
            tickets,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct StageRow {
    id: String,
    name: String,
    city: String,
    capacity: i64,
}

impl StageRow {
    fn into_stage(self) -> Stage {
        Stage {
            id: StageId::new(self.id),
            name: self.name,
            city: self.city,
            capacity: self.capacity,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BandRow {
    id: String,
    name: String,
    genre: String,
    active: i64, // SQLite boolean as integer
}

impl BandRow {
    fn into_band(self) -> Band {
        Band {
            id: BandId::new(self.id),
            name: self.name,
            genre: self.genre,
            active: self.active != 0,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PerformanceRow {
    id: String,
    band_id: String,
    stage_id: String,
    date: NaiveDate,
    duration_minutes: i64,
}

impl PerformanceRow {
    fn into_performance(self) -> Performance {
        Performance {
            id: PerformanceId::new(self.id),
            band: BandId::new(self.band_id),
            stage: StageId::new(self.stage_id),
            date: self.date,
            duration_minutes: self.duration_minutes,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TicketRow {
    stage_id: String,
    date: NaiveDate,
}

impl TicketRow {
    fn into_ticket(self) -> Ticket {
        Ticket::new(StageId::new(self.stage_id), self.date)
    }
}
