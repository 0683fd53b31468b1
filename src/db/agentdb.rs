use async_trait::async_trait;
use uuid::Uuid;

use crate::{db::db::DBClient, models::agentmodel::Agent};

pub const AGENT_COLUMNS: &str = "id, name, email, phone, password, created_at";

#[async_trait]
pub trait AgentExt {
    async fn get_agent(
        &self,
        agent_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<Agent>, sqlx::Error>;

    async fn save_agent(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<Agent, sqlx::Error>;
}

#[async_trait]
impl AgentExt for DBClient {
    async fn get_agent(
        &self,
        agent_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<Agent>, sqlx::Error> {
        let agent = if let Some(agent_id) = agent_id {
            sqlx::query_as::<_, Agent>(&format!(
                "SELECT {AGENT_COLUMNS} FROM agents WHERE id = $1"
            ))
            .bind(agent_id)
            .fetch_optional(&self.pool)
            .await?
        } else if let Some(email) = email {
            sqlx::query_as::<_, Agent>(&format!(
                "SELECT {AGENT_COLUMNS} FROM agents WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
        } else {
            None
        };

        Ok(agent)
    }

    async fn save_agent(
        &self,
        name: &str,
        email: &str,
        phone: &str,
        password: &str,
    ) -> Result<Agent, sqlx::Error> {
        let agent = sqlx::query_as::<_, Agent>(&format!(
            r#"
            INSERT INTO agents (name, email, phone, password)
            VALUES ($1, $2, $3, $4)
            RETURNING {AGENT_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password)
        .fetch_one(&self.pool)
        .await?;

        Ok(agent)
    }
}
