#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Africa's Talking SMS credentials; reminders are simulated when absent
    pub sms_api_key: Option<String>,
    pub sms_username: Option<String>,
    pub sms_sender_id: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        let sms_api_key = std::env::var("AFRICASTALKING_API_KEY").ok();
        let sms_username = std::env::var("AFRICASTALKING_USERNAME").ok();
        let sms_sender_id =
            std::env::var("SMS_SENDER_ID").unwrap_or_else(|_| "PropertyFlow".to_string());

        Config {
            database_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().expect("JWT_MAXAGE must be a number"),
            port,
            sms_api_key,
            sms_username,
            sms_sender_id,
        }
    }
}
