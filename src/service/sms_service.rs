use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    config::Config,
    models::{agentmodel::Agent, leadmodel::Lead},
    service::error::ServiceError,
};

const AFRICASTALKING_URL: &str = "https://api.africastalking.com/version1/messaging";

/// Per-recipient delivery report returned to the caller. In mock mode the
/// provider field says so, which is what the health endpoint surfaces too.
#[derive(Debug, Clone, Serialize)]
pub struct SmsReceipt {
    pub to: String,
    pub status: String,
    #[serde(rename = "statusCode")]
    pub status_code: i32,
    pub provider: &'static str,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessagingResponse {
    #[serde(rename = "SMSMessageData")]
    sms_message_data: SmsMessageData,
}

#[derive(Debug, Deserialize)]
struct SmsMessageData {
    #[serde(rename = "Recipients", default)]
    recipients: Vec<Recipient>,
}

#[derive(Debug, Deserialize)]
struct Recipient {
    number: String,
    status: String,
    #[serde(rename = "statusCode")]
    status_code: i32,
    cost: String,
    #[serde(rename = "messageId")]
    message_id: String,
}

/// Africa's Talking client. Without API credentials it runs in mock mode:
/// every send is logged and reported as simulated so the rest of the flow
/// works in development.
#[derive(Debug, Clone)]
pub struct SmsService {
    client: Client,
    credentials: Option<(String, String)>,
    sender_id: String,
}

impl SmsService {
    pub fn new(config: &Config) -> Self {
        let credentials = match (&config.sms_api_key, &config.sms_username) {
            (Some(api_key), Some(username)) => Some((api_key.clone(), username.clone())),
            _ => None,
        };

        SmsService {
            client: Client::new(),
            credentials,
            sender_id: config.sms_sender_id.clone(),
        }
    }

    pub fn is_live(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn mode(&self) -> &'static str {
        if self.is_live() {
            "africastalking"
        } else {
            "mock"
        }
    }

    /// Follow-up reminder sent to the agent's own phone.
    pub async fn send_agent_reminder(
        &self,
        agent: &Agent,
        lead: &Lead,
    ) -> Result<SmsReceipt, ServiceError> {
        let message = format!(
            "PropertyFlow Reminder: Follow up with {} ({}) regarding {}. Status: {}",
            lead.client_name,
            lead.client_phone,
            lead.property_interest.as_deref().unwrap_or("a property"),
            lead.status,
        );

        self.send(&agent.phone, &message).await
    }

    /// Courtesy notification sent to the client.
    pub async fn send_client_followup(
        &self,
        agent: &Agent,
        lead: &Lead,
    ) -> Result<SmsReceipt, ServiceError> {
        let message = format!(
            "Hi {}, thanks for your interest in {}. {} from PropertyFlow will contact you shortly. Reply STOP to opt out.",
            lead.client_name,
            lead.property_interest.as_deref().unwrap_or("a property"),
            agent.name,
        );

        self.send(&lead.client_phone, &message).await
    }

    async fn send(&self, to: &str, message: &str) -> Result<SmsReceipt, ServiceError> {
        let Some((api_key, username)) = &self.credentials else {
            info!(to, message, "sms simulated (no provider credentials)");
            return Ok(SmsReceipt {
                to: to.to_string(),
                status: "simulated".to_string(),
                status_code: 101,
                provider: "mock",
                message_id: None,
                cost: None,
            });
        };

        let params = [
            ("username", username.as_str()),
            ("to", to),
            ("message", message),
            ("from", self.sender_id.as_str()),
        ];

        let response = self
            .client
            .post(AFRICASTALKING_URL)
            .header("apiKey", api_key)
            .header("Accept", "application/json")
            .form(&params)
            .send()
            .await
            .map_err(|e| ServiceError::Sms(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            warn!(to, %status, "sms provider rejected the request");
            return Err(ServiceError::Sms(format!(
                "provider returned {status}"
            )));
        }

        let body: MessagingResponse = response
            .json()
            .await
            .map_err(|e| ServiceError::Sms(e.to_string()))?;

        let recipient = body
            .sms_message_data
            .recipients
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::Sms("provider returned no recipients".to_string()))?;

        info!(
            to = %recipient.number,
            status = %recipient.status,
            "sms dispatched"
        );

        Ok(SmsReceipt {
            to: recipient.number,
            status: recipient.status,
            status_code: recipient.status_code,
            provider: "africastalking",
            message_id: Some(recipient.message_id),
            cost: Some(recipient.cost),
        })
    }
}
