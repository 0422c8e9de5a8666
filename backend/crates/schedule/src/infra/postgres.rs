//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::{ReservationId, UserId};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::entities::Reservation;
use crate::domain::repository::{ReservationRepository, SlotWrite};
use crate::error::ScheduleResult;

#[derive(Clone)]
pub struct PgScheduleRepository {
    pool: PgPool,
}

impl PgScheduleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction that serializes reservation writers
    ///
    /// SHARE ROW EXCLUSIVE conflicts with itself, so two overlap checks can
    /// never interleave; plain reads are not blocked.
    async fn begin_exclusive(&self) -> ScheduleResult<Transaction<'static, Postgres>> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("LOCK TABLE reservations IN SHARE ROW EXCLUSIVE MODE")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }

    async fn overlaps(
        tx: &mut Transaction<'static, Postgres>,
        reservation: &Reservation,
    ) -> ScheduleResult<bool> {
        let overlapping: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM reservations
                WHERE start_date < $2 AND end_date > $1 AND id <> $3
            )
            "#,
        )
        .bind(reservation.start)
        .bind(reservation.end)
        .bind(reservation.id.as_uuid())
        .fetch_one(&mut **tx)
        .await?;

        Ok(overlapping)
    }
}

impl ReservationRepository for PgScheduleRepository {
    async fn find_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> ScheduleResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT
                id,
                owner_id,
                start_date,
                end_date,
                created_at,
                updated_at
            FROM reservations
            WHERE start_date >= $1 AND start_date < $2
            ORDER BY start_date
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ReservationRow::into_reservation).collect())
    }

    async fn find_by_id(&self, id: &ReservationId) -> ScheduleResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            SELECT
                id,
                owner_id,
                start_date,
                end_date,
                created_at,
                updated_at
            FROM reservations
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReservationRow::into_reservation))
    }

    async fn create(&self, reservation: &Reservation) -> ScheduleResult<SlotWrite> {
        let mut tx = self.begin_exclusive().await?;

        if Self::overlaps(&mut tx, reservation).await? {
            return Ok(SlotWrite::Overlaps);
        }

        sqlx::query(
            r#"
            INSERT INTO reservations (
                id,
                owner_id,
                start_date,
                end_date,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.owner_id.as_uuid())
        .bind(reservation.start)
        .bind(reservation.end)
        .bind(reservation.created_at)
        .bind(reservation.updated_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(SlotWrite::Saved)
    }

    async fn update(&self, reservation: &Reservation) -> ScheduleResult<SlotWrite> {
        let mut tx = self.begin_exclusive().await?;

        if Self::overlaps(&mut tx, reservation).await? {
            return Ok(SlotWrite::Overlaps);
        }

        let updated = sqlx::query(
            r#"
            UPDATE reservations SET
                owner_id = $2,
                start_date = $3,
                end_date = $4,
                updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(reservation.id.as_uuid())
        .bind(reservation.owner_id.as_uuid())
        .bind(reservation.start)
        .bind(reservation.end)
        .bind(reservation.updated_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok(if updated == 1 {
            SlotWrite::Saved
        } else {
            SlotWrite::Missing
        })
    }

    async fn delete(&self, id: &ReservationId) -> ScheduleResult<Option<Reservation>> {
        let row = sqlx::query_as::<_, ReservationRow>(
            r#"
            DELETE FROM reservations
            WHERE id = $1
            RETURNING id, owner_id, start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ReservationRow::into_reservation))
    }

    async fn owner_exists(&self, owner_id: &UserId) -> ScheduleResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(owner_id.as_uuid())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    owner_id: Uuid,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReservationRow {
    fn into_reservation(self) -> Reservation {
        Reservation {
            id: ReservationId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            start: self.start_date,
            end: self.end_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
