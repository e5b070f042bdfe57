use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::brevo::{BrevoConfig, DEFAULT_API_URL};
use crate::rate_limit::ThrottleConfig;

const PRODUCTION_ORIGINS: &[&str] = &["https://deepfold-waitlist.vercel.app", "https://deepfold.com"];

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

// CLI argument structure; every option can also come from the environment / .env
#[derive(Parser, Debug, Clone)]
#[command(name = "waitlist-gateway")]
#[command(about = "Rate-limited waitlist signup endpoint backed by Brevo")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Deployment environment, picks the default CORS origins
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = Environment::Development)]
    pub environment: Environment,

    // Allowed CORS origins (comma-separated), overrides the environment defaults
    #[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
    pub allowed_origins: Vec<String>,

    // Brevo API key
    #[arg(long, env = "BREVO_API_KEY", hide_env_values = true)]
    pub brevo_api_key: Option<String>,

    // Brevo API base url
    #[arg(long, env = "BREVO_API_URL", default_value = DEFAULT_API_URL)]
    pub brevo_api_url: String,

    // Contact list new signups are added to
    #[arg(long, env = "BREVO_LIST_ID", default_value_t = 4)]
    pub list_id: u64,

    // From address of the confirmation email
    #[arg(long, env = "SENDER_EMAIL", default_value = "deepfold.025@gmail.com")]
    pub sender_email: String,

    // From name, also used as the brand in the email
    #[arg(long, env = "SENDER_NAME", default_value = "Deepfold")]
    pub sender_name: String,

    // Timeout for each Brevo call in seconds
    #[arg(long, default_value_t = 10)]
    pub upstream_timeout: u64,

    // Rate limit max submissions per window per client
    #[arg(long, default_value_t = 3)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,

    // Chance per submission of sweeping stale clients
    #[arg(long, default_value_t = 0.01)]
    pub sweep_probability: f64,

    // Take the client IP from X-Forwarded-For
    #[arg(long, env = "TRUST_PROXY", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub trust_proxy: bool,

    // Directory served for every non-API path
    #[arg(long, env = "STATIC_DIR")]
    pub static_dir: Option<PathBuf>,
}

impl Args {
    pub fn allowed_origins(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .allowed_origins
            .iter()
            .map(|s| s.trim()) // remove spaces
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if !configured.is_empty() {
            return configured;
        }

        match self.environment {
            Environment::Production => PRODUCTION_ORIGINS.iter().map(|s| s.to_string()).collect(),
            Environment::Development => vec![
                format!("http://localhost:{}", self.port),
                format!("http://127.0.0.1:{}", self.port),
            ],
        }
    }

    pub fn throttle_config(&self) -> ThrottleConfig {
        ThrottleConfig {
            max_requests: self.rate_limit,
            window: Duration::from_secs(self.rate_window),
            sweep_probability: self.sweep_probability.clamp(0.0, 1.0),
        }
    }

    pub fn brevo_config(&self) -> BrevoConfig {
        BrevoConfig {
            api_url: self.brevo_api_url.clone(),
            api_key: self.brevo_api_key.clone().filter(|k| !k.trim().is_empty()),
            list_id: self.list_id,
            sender_name: self.sender_name.clone(),
            sender_email: self.sender_email.clone(),
            timeout: Duration::from_secs(self.upstream_timeout),
        }
    }
}
