use dotenvy::dotenv;
use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub access_token_ttl: usize,
    pub refresh_token_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_refresh_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Leave lifecycle knobs
    /// Appended to user-supplied CCs up to the cap of 2.
    pub default_cc_recipients: Vec<String>,
    /// Whether CANCELLED requests still accept remarks.
    pub allow_remarks_on_cancelled: bool,
    /// Approver addresses offered for the applyingTo field.
    pub applying_to_addresses: Vec<String>,
    /// Address book offered for the CC picker.
    pub cc_address_book: Vec<String>,
}

fn csv_env(name: &str, default: &str) -> Vec<String> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            server_addr: env::var("SERVER_ADDR").expect("SERVER_ADDR must be set"),
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            access_token_ttl: env::var("ACCESS_TOKEN_TTL")
                .unwrap_or_else(|_| "900".to_string()) // default 15 min
                .parse()
                .unwrap(),
            refresh_token_ttl: env::var("REFRESH_TOKEN_TTL")
                .unwrap_or_else(|_| "604800".to_string()) // default 7 days
                .parse()
                .unwrap(),

            rate_login_per_min: env::var("RATE_LOGIN_PER_MIN")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap(),
            rate_refresh_per_min: env::var("RATE_REFRESH_PER_MIN")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap(),
            rate_protected_per_min: env::var("RATE_PROTECTED_PER_MIN")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .unwrap(),

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            default_cc_recipients: csv_env(
                "DEFAULT_CC_RECIPIENTS",
                "hr@gmail.com,manager@gmail.com",
            ),
            allow_remarks_on_cancelled: env::var("ALLOW_REMARKS_ON_CANCELLED")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap(),
            applying_to_addresses: csv_env(
                "APPLYING_TO_ADDRESSES",
                "manager@gmail.com,hr@gmail.com",
            ),
            cc_address_book: csv_env("CC_ADDRESS_BOOK", "hr@gmail.com,manager@gmail.com"),
        }
    }
}
