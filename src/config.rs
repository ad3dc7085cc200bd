//! Process-wide settings, read once at startup from the environment.
//!
//! Only the bot token is required up front. Every other key is kept as the
//! raw string and parsed by the accessor of the feature that needs it, so a
//! missing payment or alert setting only breaks that one feature.

use std::{env, time::Duration};

use log::warn;
use poise::serenity_prelude as serenity;
use thiserror::Error;

use crate::access::AccessPolicy;

pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(15_000);
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(5_000);
pub const DEFAULT_PRESENCE_NAME: &str = "YumMC Server";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("'{0}' environment variable not set")]
    Missing(&'static str),
    #[error("'{key}' has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub prefix: String,
    pub require_admin_only: bool,
    pub allowed_role_ids: Vec<serenity::RoleId>,
    pub mc_host: Option<String>,
    pub mc_port: Option<String>,
    pub probe_timeout: Duration,
    pub mc_srv: bool,
    pub check_interval: Duration,
    pub alert_channel_id: Option<String>,
    pub admin_role_id: Option<String>,
    pub server_banner: Option<String>,
    pub owner_id: Option<String>,
    pub presence_name: String,
    pub payment: PaymentSettings,
    pub listing: ServerListing,
}

#[derive(Debug, Clone, Default)]
pub struct PaymentSettings {
    pub amount: Option<String>,
    pub bank: Option<String>,
    pub account: Option<String>,
    pub holder: Option<String>,
    pub qr_image: Option<String>,
}

/// Fully resolved payment details, see [`PaymentSettings::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub amount: u64,
    pub bank: String,
    pub account: String,
    pub holder: String,
    pub qr_image: Option<String>,
}

/// Connection details shown by the `ip` command and the copy buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerListing {
    pub java_ip: String,
    pub java_versions: String,
    pub bedrock_ip: String,
    pub bedrock_port: String,
    pub bedrock_versions: String,
}

impl Default for ServerListing {
    fn default() -> Self {
        Self {
            java_ip: "yummc.online".into(),
            java_versions: "1.18.x - 1.21.x".into(),
            bedrock_ip: "yummc.online".into(),
            bedrock_port: "25570".into(),
            bedrock_versions: "1.21.111 +".into(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank values in a .env file count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let token = get("TOKEN")
            .or_else(|| get("DISCORD_TOKEN"))
            .ok_or(ConfigError::Missing("TOKEN"))?;

        let allowed_role_ids = match get("ALLOWED_ROLE_IDS").or_else(|| get("ALLOWED_ROLE_ID")) {
            Some(raw) => parse_role_ids(&raw),
            None => Vec::new(),
        };

        let listing_default = ServerListing::default();

        Ok(Self {
            token,
            prefix: lookup("BOT_PREFIX").unwrap_or_default(),
            require_admin_only: get("REQUIRE_ADMIN_FOR_GUI").as_deref() == Some("true"),
            allowed_role_ids,
            mc_host: get("MC_IP"),
            mc_port: get("MC_PORT"),
            probe_timeout: millis_or(get("MC_TIMEOUT"), DEFAULT_PROBE_TIMEOUT),
            mc_srv: get("MC_SRV").as_deref() != Some("false"),
            check_interval: millis_or(get("CHECK_INTERVAL"), DEFAULT_CHECK_INTERVAL),
            alert_channel_id: get("ALERT_CHANNEL_ID"),
            admin_role_id: get("ADMIN_ROLE_ID"),
            server_banner: get("SERVER_BANNER"),
            owner_id: get("OWNER_ID"),
            presence_name: get("PRESENCE_NAME").unwrap_or_else(|| DEFAULT_PRESENCE_NAME.into()),
            payment: PaymentSettings {
                amount: get("PAY_AMOUNT"),
                bank: get("PAY_BANK"),
                account: get("PAY_ACCOUNT"),
                holder: get("PAY_NAME"),
                qr_image: get("PAY_QR_IMAGE"),
            },
            listing: ServerListing {
                java_ip: get("JAVA_IP").unwrap_or(listing_default.java_ip),
                java_versions: get("JAVA_VERSIONS").unwrap_or(listing_default.java_versions),
                bedrock_ip: get("BEDROCK_IP").unwrap_or(listing_default.bedrock_ip),
                bedrock_port: get("BEDROCK_PORT").unwrap_or(listing_default.bedrock_port),
                bedrock_versions: get("BEDROCK_VERSIONS")
                    .unwrap_or(listing_default.bedrock_versions),
            },
        })
    }

    pub fn access_policy(&self) -> AccessPolicy {
        AccessPolicy::new(self.require_admin_only, self.allowed_role_ids.clone())
    }

    pub fn alert_channel(&self) -> Result<serenity::ChannelId, ConfigError> {
        parse_id("ALERT_CHANNEL_ID", self.alert_channel_id.as_deref()).map(serenity::ChannelId::new)
    }

    pub fn admin_role(&self) -> Option<serenity::RoleId> {
        parse_id("ADMIN_ROLE_ID", self.admin_role_id.as_deref())
            .ok()
            .map(serenity::RoleId::new)
    }

    pub fn owner(&self) -> Result<serenity::UserId, ConfigError> {
        parse_id("OWNER_ID", self.owner_id.as_deref()).map(serenity::UserId::new)
    }
}

impl PaymentSettings {
    pub fn resolve(&self) -> Result<Payment, ConfigError> {
        let raw_amount = self
            .amount
            .as_deref()
            .ok_or(ConfigError::Missing("PAY_AMOUNT"))?;
        let amount = raw_amount.parse().map_err(|_| ConfigError::Invalid {
            key: "PAY_AMOUNT",
            value: raw_amount.to_string(),
        })?;

        Ok(Payment {
            amount,
            bank: self.bank.clone().ok_or(ConfigError::Missing("PAY_BANK"))?,
            account: self.account.clone().ok_or(ConfigError::Missing("PAY_ACCOUNT"))?,
            holder: self.holder.clone().ok_or(ConfigError::Missing("PAY_NAME"))?,
            qr_image: self.qr_image.clone(),
        })
    }
}

/// Parses a comma separated list of role ids, keeping the configured order
/// and dropping duplicates and entries that are not snowflakes.
pub fn parse_role_ids(raw: &str) -> Vec<serenity::RoleId> {
    let mut ids: Vec<serenity::RoleId> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        match entry.parse::<u64>() {
            Ok(id) if id != 0 => {
                let id = serenity::RoleId::new(id);
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            _ => warn!("ignoring invalid role id '{entry}' in ALLOWED_ROLE_IDS"),
        }
    }
    ids
}

fn parse_id(key: &'static str, raw: Option<&str>) -> Result<u64, ConfigError> {
    let raw = raw.ok_or(ConfigError::Missing(key))?;
    match raw.parse::<u64>() {
        Ok(id) if id != 0 => Ok(id),
        _ => Err(ConfigError::Invalid {
            key,
            value: raw.to_string(),
        }),
    }
}

fn millis_or(raw: Option<String>, default: Duration) -> Duration {
    raw.and_then(|value| value.parse::<u64>().ok())
        .filter(|&ms| ms > 0)
        .map(Duration::from_millis)
        .unwrap_or(default)
}
