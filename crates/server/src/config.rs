use std::env;

use crate::services::mailer::MailConfig;

#[derive(Clone, Debug)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub upload_dir: String,
    /// `None` when `EMAIL_USER`/`EMAIL_PASS` are not set; sends then fail.
    pub mail: Option<MailConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./data/complaintcare.db?mode=rwc".to_string()),
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string()),
            mail: MailConfig::from_env(),
        }
    }
}
