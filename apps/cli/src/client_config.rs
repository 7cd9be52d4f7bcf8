use std::env;
use std::time::Duration;

use teamtrack_core::{AppError, AppResult, RecordId};
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: Url,
    pub api_token: Option<String>,
    pub user_id: RecordId,
    pub http_timeout: Duration,
}

impl ClientConfig {
    pub fn load(user_id_override: Option<RecordId>) -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok(), user_id_override)
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        user_id_override: Option<RecordId>,
    ) -> AppResult<Self> {
        let raw_url = required(&lookup, "TEAMTRACK_API_URL")?;
        let api_url = Url::parse(raw_url.trim().trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid TEAMTRACK_API_URL '{raw_url}': {error}"))
        })?;

        let api_token = lookup("TEAMTRACK_API_TOKEN")
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        let user_id = match user_id_override {
            Some(user_id) => user_id,
            None => required(&lookup, "TEAMTRACK_USER_ID")?
                .parse::<RecordId>()
                .map_err(|error| {
                    AppError::Validation(format!("invalid TEAMTRACK_USER_ID: {error}"))
                })?,
        };

        let timeout_secs = match lookup("TEAMTRACK_HTTP_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|error| {
                AppError::Validation(format!(
                    "invalid TEAMTRACK_HTTP_TIMEOUT_SECS value '{value}': {error}"
                ))
            })?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            return Err(AppError::Validation(
                "TEAMTRACK_HTTP_TIMEOUT_SECS must be greater than zero".to_owned(),
            ));
        }

        Ok(Self {
            api_url,
            api_token,
            user_id,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> AppResult<String> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{name} is required")))
}
