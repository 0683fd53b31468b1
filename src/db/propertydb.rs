use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    db::db::DBClient,
    dtos::propertydtos::{CreatePropertyDto, UpdatePropertyDto},
    models::propertymodel::{Property, PropertyStatus},
};

pub const PROPERTY_COLUMNS: &str =
    "id, agent_id, address, bedrooms, bathrooms, price, property_type, status, created_at";

/// Outcome of a delete attempt. Deletion is hard-blocked while any lead
/// still references the property.
#[derive(Debug, PartialEq, Eq)]
pub enum PropertyDeletion {
    Deleted,
    NotFound,
    Referenced(i64),
}

#[async_trait]
pub trait PropertyExt {
    async fn create_property(
        &self,
        agent_id: Uuid,
        property_data: &CreatePropertyDto,
    ) -> Result<Property, sqlx::Error>;

    /// Looks up a property scoped to its owner. A property that exists but
    /// belongs to another agent resolves to `None`.
    async fn get_property(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn list_properties(&self, agent_id: Uuid) -> Result<Vec<Property>, sqlx::Error>;

    /// Listing feed for the lead form dropdown: booked/sold first so the
    /// agent sees what is taken, then alphabetical by address.
    async fn list_properties_for_assignment(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error>;

    async fn update_property_details(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
        property_data: &UpdatePropertyDto,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn set_property_status(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
        status: PropertyStatus,
    ) -> Result<Option<Property>, sqlx::Error>;

    async fn delete_property(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
    ) -> Result<PropertyDeletion, sqlx::Error>;
}

#[async_trait]
impl PropertyExt for DBClient {
    async fn create_property(
        &self,
        agent_id: Uuid,
        property_data: &CreatePropertyDto,
    ) -> Result<Property, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            INSERT INTO properties (agent_id, address, bedrooms, bathrooms, price, property_type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(agent_id)
        .bind(&property_data.address)
        .bind(property_data.bedrooms)
        .bind(property_data.bathrooms)
        .bind(property_data.price.clone())
        .bind(&property_data.property_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(property)
    }

    async fn get_property(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {PROPERTY_COLUMNS} FROM properties WHERE id = $1 AND agent_id = $2"
        ))
        .bind(property_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn list_properties(&self, agent_id: Uuid) -> Result<Vec<Property>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            r#"
            SELECT {PROPERTY_COLUMNS} FROM properties
            WHERE agent_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    async fn list_properties_for_assignment(
        &self,
        agent_id: Uuid,
    ) -> Result<Vec<Property>, sqlx::Error> {
        let properties = sqlx::query_as::<_, Property>(&format!(
            r#"
            SELECT {PROPERTY_COLUMNS} FROM properties
            WHERE agent_id = $1
            ORDER BY status DESC, address ASC
            "#
        ))
        .bind(agent_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    async fn update_property_details(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
        property_data: &UpdatePropertyDto,
    ) -> Result<Option<Property>, sqlx::Error> {
        // Full detail edit: status is deliberately untouched here.
        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            UPDATE properties
            SET address = COALESCE($1, address),
                bedrooms = COALESCE($2, bedrooms),
                bathrooms = COALESCE($3, bathrooms),
                price = COALESCE($4, price),
                property_type = COALESCE($5, property_type)
            WHERE id = $6 AND agent_id = $7
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(&property_data.address)
        .bind(property_data.bedrooms)
        .bind(property_data.bathrooms)
        .bind(property_data.price.clone())
        .bind(&property_data.property_type)
        .bind(property_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn set_property_status(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
        status: PropertyStatus,
    ) -> Result<Option<Property>, sqlx::Error> {
        let property = sqlx::query_as::<_, Property>(&format!(
            r#"
            UPDATE properties
            SET status = $1
            WHERE id = $2 AND agent_id = $3
            RETURNING {PROPERTY_COLUMNS}
            "#
        ))
        .bind(status)
        .bind(property_id)
        .bind(agent_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn delete_property(
        &self,
        property_id: Uuid,
        agent_id: Uuid,
    ) -> Result<PropertyDeletion, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let locked: Option<Uuid> = sqlx::query_scalar(
            "SELECT id FROM properties WHERE id = $1 AND agent_id = $2 FOR UPDATE",
        )
        .bind(property_id)
        .bind(agent_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(PropertyDeletion::NotFound);
        }

        let references: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM leads WHERE property_id = $1")
                .bind(property_id)
                .fetch_one(&mut *tx)
                .await?;

        if references > 0 {
            return Ok(PropertyDeletion::Referenced(references));
        }

        sqlx::query("DELETE FROM properties WHERE id = $1 AND agent_id = $2")
            .bind(property_id)
            .bind(agent_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(PropertyDeletion::Deleted)
    }
}
