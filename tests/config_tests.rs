#![cfg(test)]

use std::{collections::HashMap, time::Duration};

use poise::serenity_prelude::{ChannelId, RoleId};
use yumbot::config::*;

fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_token_is_required() {
    assert_eq!(config_from(&[]).unwrap_err(), ConfigError::Missing("TOKEN"));
    assert_eq!(
        config_from(&[("TOKEN", "   ")]).unwrap_err(),
        ConfigError::Missing("TOKEN")
    );
    assert_eq!(config_from(&[("DISCORD_TOKEN", "abc")]).unwrap().token, "abc");
}

#[test]
fn test_defaults() {
    let config = config_from(&[("TOKEN", "abc")]).unwrap();

    assert_eq!(config.prefix, "");
    assert!(!config.require_admin_only);
    assert!(config.allowed_role_ids.is_empty());
    assert_eq!(config.check_interval, Duration::from_millis(15_000));
    assert_eq!(config.probe_timeout, Duration::from_millis(5_000));
    assert_eq!(config.presence_name, "YumMC Server");
    assert_eq!(config.listing, ServerListing::default());
}

#[test]
fn test_srv_lookup_on_unless_disabled() {
    assert!(config_from(&[("TOKEN", "abc")]).unwrap().mc_srv);
    assert!(config_from(&[("TOKEN", "abc"), ("MC_SRV", "true")]).unwrap().mc_srv);
    assert!(!config_from(&[("TOKEN", "abc"), ("MC_SRV", "false")]).unwrap().mc_srv);
}

#[test]
fn test_check_interval_override_and_fallback() {
    let config = config_from(&[("TOKEN", "abc"), ("CHECK_INTERVAL", "30000")]).unwrap();
    assert_eq!(config.check_interval, Duration::from_secs(30));

    let config = config_from(&[("TOKEN", "abc"), ("CHECK_INTERVAL", "soon")]).unwrap();
    assert_eq!(config.check_interval, DEFAULT_CHECK_INTERVAL);

    let config = config_from(&[("TOKEN", "abc"), ("CHECK_INTERVAL", "0")]).unwrap();
    assert_eq!(config.check_interval, DEFAULT_CHECK_INTERVAL);
}

#[test]
fn test_admin_only_flag_needs_exact_true() {
    let on = config_from(&[("TOKEN", "abc"), ("REQUIRE_ADMIN_FOR_GUI", "true")]).unwrap();
    let off = config_from(&[("TOKEN", "abc"), ("REQUIRE_ADMIN_FOR_GUI", "yes")]).unwrap();
    assert!(on.access_policy().require_admin_only());
    assert!(!off.access_policy().require_admin_only());
}

#[test]
fn test_role_ids_keep_order_and_skip_bad_entries() {
    assert_eq!(
        parse_role_ids("30, 10,abc,,30,0,20"),
        vec![RoleId::new(30), RoleId::new(10), RoleId::new(20)]
    );
}

#[test]
fn test_single_role_id_fallback() {
    let config = config_from(&[("TOKEN", "abc"), ("ALLOWED_ROLE_ID", "77")]).unwrap();
    assert_eq!(config.allowed_role_ids, vec![RoleId::new(77)]);

    let config = config_from(&[
        ("TOKEN", "abc"),
        ("ALLOWED_ROLE_IDS", "1,2"),
        ("ALLOWED_ROLE_ID", "77"),
    ])
    .unwrap();
    assert_eq!(config.allowed_role_ids, vec![RoleId::new(1), RoleId::new(2)]);
}

#[test]
fn test_optional_settings_fail_when_used() {
    let config = config_from(&[("TOKEN", "abc"), ("OWNER_ID", "nobody")]).unwrap();

    assert_eq!(
        config.alert_channel().unwrap_err(),
        ConfigError::Missing("ALERT_CHANNEL_ID")
    );
    assert!(matches!(
        config.owner().unwrap_err(),
        ConfigError::Invalid { key: "OWNER_ID", .. }
    ));
    assert_eq!(config.admin_role(), None);
    assert_eq!(
        config.payment.resolve().unwrap_err(),
        ConfigError::Missing("PAY_AMOUNT")
    );
}

#[test]
fn test_alert_channel_parses() {
    let config = config_from(&[("TOKEN", "abc"), ("ALERT_CHANNEL_ID", "123456789")]).unwrap();
    assert_eq!(config.alert_channel().unwrap(), ChannelId::new(123456789));
}

#[test]
fn test_payment_resolves() {
    let config = config_from(&[
        ("TOKEN", "abc"),
        ("PAY_AMOUNT", "50000"),
        ("PAY_BANK", "MB Bank"),
        ("PAY_ACCOUNT", "0123456789"),
        ("PAY_NAME", "NGUYEN VAN A"),
    ])
    .unwrap();

    let payment = config.payment.resolve().unwrap();
    assert_eq!(payment.amount, 50_000);
    assert_eq!(payment.bank, "MB Bank");
    assert_eq!(payment.qr_image, None);
}

#[test]
fn test_payment_rejects_bad_amount() {
    let config = config_from(&[
        ("TOKEN", "abc"),
        ("PAY_AMOUNT", "50k"),
        ("PAY_BANK", "MB Bank"),
        ("PAY_ACCOUNT", "0123456789"),
        ("PAY_NAME", "NGUYEN VAN A"),
    ])
    .unwrap();

    assert_eq!(
        config.payment.resolve().unwrap_err(),
        ConfigError::Invalid {
            key: "PAY_AMOUNT",
            value: "50k".into()
        }
    );
}
