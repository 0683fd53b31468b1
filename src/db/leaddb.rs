use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::leaddtos::{CreateLeadDto, UpdateLeadDto},
    models::{
        leadmodel::{Lead, LEAD_STATUS_NEW},
        propertymodel::PropertyStatus,
    },
};

pub const LEAD_COLUMNS: &str = "id, agent_id, property_id, client_name, client_phone, \
     property_interest, status, follow_up_date, notes, created_at, updated_at";

#[async_trait]
pub trait LeadExt {
    /// Looks up a lead scoped to its owner; a lead under another agent
    /// resolves to `None`, same as a missing one.
    async fn get_lead(&self, lead_id: Uuid, agent_id: Uuid)
        -> Result<Option<Lead>, sqlx::Error>;

    async fn list_leads(&self, agent_id: Uuid) -> Result<Vec<Lead>, sqlx::Error>;

    /// Inserts the lead and, when it references a property, books that
    /// property in the same transaction. Fails with `RowNotFound` if the
    /// referenced property is absent or owned by someone else.
    async fn insert_lead(
        &self,
        agent_id: Uuid,
        lead_data: &CreateLeadDto,
    ) -> Result<Lead, sqlx::Error>;

    /// Applies a partial update together with the status transitions the
    /// assignment service planned: `release` goes back to available,
    /// `book` becomes booked, and the row update all commit atomically.
    async fn update_lead(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        changes: &UpdateLeadDto,
        release: Option<Uuid>,
        book: Option<Uuid>,
    ) -> Result<Option<Lead>, sqlx::Error>;

    /// Deletes the lead and releases its property in one transaction.
    /// Returns `false` when no lead matched.
    async fn delete_lead(&self, lead_id: Uuid, agent_id: Uuid) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl LeadExt for DBClient {
    async fn get_lead(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let lead = sqlx::query_as::<_, Lead>(&format!(
            "SELECT {LEAD_COLUMNS} FROM leads WHERE id = $1 AND agent_id = $2"
        ))
        .bind(lead_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lead)
    }

    async fn list_leads(&self, agent_id: Uuid) -> Result<Vec<Lead>, sqlx::Error> {
        let leads = sqlx::query_as::<_, Lead>(&format!(
            r#"
            SELECT {LEAD_COLUMNS} FROM leads
            WHERE agent_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(leads)
    }

    async fn insert_lead(
        &self,
        agent_id: Uuid,
        lead_data: &CreateLeadDto,
    ) -> Result<Lead, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        if let Some(property_id) = lead_data.property_id {
            // Lock the property row so concurrent assignments serialize on it.
            let locked: Option<Uuid> = sqlx::query_scalar(
                "SELECT id FROM properties WHERE id = $1 AND agent_id = $2 FOR UPDATE",
            )
            .bind(property_id)
            .bind(agent_id)
            .fetch_optional(&mut *tx)
            .await?;

            if locked.is_none() {
                return Err(sqlx::Error::RowNotFound);
            }
        }

        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            INSERT INTO leads
                (agent_id, client_name, client_phone, property_interest, property_id,
                 follow_up_date, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(agent_id)
        .bind(&lead_data.client_name)
        .bind(&lead_data.client_phone)
        .bind(&lead_data.property_interest)
        .bind(lead_data.property_id)
        .bind(lead_data.follow_up_date)
        .bind(&lead_data.notes)
        .bind(LEAD_STATUS_NEW)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(property_id) = lead_data.property_id {
            sqlx::query("UPDATE properties SET status = $1 WHERE id = $2")
                .bind(PropertyStatus::Booked)
                .bind(property_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(lead)
    }

    async fn update_lead(
        &self,
        lead_id: Uuid,
        agent_id: Uuid,
        changes: &UpdateLeadDto,
        release: Option<Uuid>,
        book: Option<Uuid>,
    ) -> Result<Option<Lead>, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM leads WHERE id = $1 AND agent_id = $2 FOR UPDATE")
                .bind(lead_id)
                .bind(agent_id)
                .fetch_optional(&mut *tx)
                .await?;

        if locked.is_none() {
            return Ok(None);
        }

        if let Some(old_property_id) = release {
            sqlx::query("UPDATE properties SET status = $1 WHERE id = $2 AND agent_id = $3")
                .bind(PropertyStatus::Available)
                .bind(old_property_id)
                .bind(agent_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some(new_property_id) = book {
            let booked = sqlx::query("UPDATE properties SET status = $1 WHERE id = $2 AND agent_id = $3")
                .bind(PropertyStatus::Booked)
                .bind(new_property_id)
                .bind(agent_id)
                .execute(&mut *tx)
                .await?;

            if booked.rows_affected() == 0 {
                return Err(sqlx::Error::RowNotFound);
            }
        }

        // property_id is only rewritten when the caller actually supplied it
        // ($7 = false keeps the current reference, explicit null clears it).
        let set_property = changes.property_id.is_some();
        let new_property_id = changes.property_id.clone().flatten();

        let lead = sqlx::query_as::<_, Lead>(&format!(
            r#"
            UPDATE leads
            SET client_name = COALESCE($1, client_name),
                client_phone = COALESCE($2, client_phone),
                property_interest = COALESCE($3, property_interest),
                status = COALESCE($4, status),
                follow_up_date = COALESCE($5, follow_up_date),
                notes = COALESCE($6, notes),
                property_id = CASE WHEN $7::bool THEN $8::uuid ELSE property_id END,
                updated_at = NOW()
            WHERE id = $9 AND agent_id = $10
            RETURNING {LEAD_COLUMNS}
            "#
        ))
        .bind(&changes.client_name)
        .bind(&changes.client_phone)
        .bind(&changes.property_interest)
        .bind(&changes.status)
        .bind(changes.follow_up_date)
        .bind(&changes.notes)
        .bind(set_property)
        .bind(new_property_id)
        .bind(lead_id)
        .bind(agent_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(lead))
    }

    async fn delete_lead(&self, lead_id: Uuid, agent_id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let lead: Option<(Option<Uuid>,)> = sqlx::query_as(
            "SELECT property_id FROM leads WHERE id = $1 AND agent_id = $2 FOR UPDATE",
        )
        .bind(lead_id)
        .bind(agent_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((property_id,)) = lead else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM leads WHERE id = $1 AND agent_id = $2")
            .bind(lead_id)
            .bind(agent_id)
            .execute(&mut *tx)
            .await?;

        if let Some(property_id) = property_id {
            sqlx::query("UPDATE properties SET status = $1 WHERE id = $2")
                .bind(PropertyStatus::Available)
                .bind(property_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(true)
    }
}
