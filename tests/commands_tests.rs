#![cfg(test)]

use poise::serenity_prelude::{ButtonStyle, RoleId};
use yumbot::{
    access::{AccessPolicy, Caller},
    commands::{
        broadcast::*, commands, is_trailing_text, payment::format_vnd, server_ip::*, utils::*,
    },
    config::ServerListing,
    interaction::ComponentId,
};

#[test]
fn test_format_vnd_groups_thousands() {
    assert_eq!(format_vnd(0), "0");
    assert_eq!(format_vnd(999), "999");
    assert_eq!(format_vnd(1000), "1.000");
    assert_eq!(format_vnd(50000), "50.000");
    assert_eq!(format_vnd(1234567), "1.234.567");
}

#[test]
fn test_component_ids_parse() {
    for id in [
        ComponentId::OpenSendModal,
        ComponentId::SendModal,
        ComponentId::CopyJavaIp,
        ComponentId::CopyBedrockIp,
    ] {
        assert_eq!(id.as_str().parse::<ComponentId>(), Ok(id));
    }
    assert!("BTN_REPORT_OPEN".parse::<ComponentId>().is_err());
}

#[test]
fn test_broadcast_style_depends_on_admin_flag() {
    let admin = BroadcastStyle::for_caller(&Caller::new(true, vec![]));
    let member = BroadcastStyle::for_caller(&Caller::new(false, vec![RoleId::new(1)]));

    assert_eq!(admin.color, 0xFF0000);
    assert_eq!(admin.reaction, "📢");
    assert_eq!(admin.button_style, ButtonStyle::Danger);
    assert_eq!(member.color, 0x5865F2);
    assert_eq!(member.reaction, "💬");
    assert_eq!(member.button_style, ButtonStyle::Primary);
}

#[test]
fn test_broadcast_title_falls_back_when_blank() {
    let admin = BroadcastStyle::for_caller(&Caller::new(true, vec![]));
    let member = BroadcastStyle::for_caller(&Caller::new(false, vec![]));

    assert_eq!(admin.title(Some("Bảo trì")), "📌 Bảo trì");
    assert_eq!(admin.title(Some("   ")), "📢 THÔNG BÁO QUAN TRỌNG");
    assert_eq!(member.title(None), "💬 TIN NHẮN MỚI");
}

#[test]
fn test_blank_content_is_rejected() {
    assert_eq!(validate_content(None), None);
    assert_eq!(validate_content(Some(" \n\t ")), None);
    assert_eq!(validate_content(Some(" hello ")), Some(" hello "));
}

#[test]
fn test_gui_description_reflects_policy() {
    assert_eq!(
        gui_description(&AccessPolicy::new(true, vec![])),
        "Mở form gửi tin nhắn vào kênh (Admin only)"
    );
    assert_eq!(
        gui_description(&AccessPolicy::new(false, vec![RoleId::new(1)])),
        "Mở form gửi tin nhắn vào kênh (Role restricted)"
    );
}

#[test]
fn test_help_hides_broadcast_from_unpermitted_callers() {
    let denied = help_fields(HelpFlavor::Slash, "", false, false);
    assert!(!denied.iter().any(|(name, _, _)| name.contains("gui")));

    let allowed = help_fields(HelpFlavor::Slash, "", true, true);
    let (_, description, _) = allowed.last().unwrap();
    assert_eq!(description, "Gửi thông báo quan trọng (Admin only)");
}

#[test]
fn test_prefix_help_uses_configured_prefix() {
    let fields = help_fields(HelpFlavor::Prefix, "!", true, false);
    assert!(fields.iter().any(|(name, _, _)| name == "`!ip`"));
    assert!(fields.iter().any(|(name, _, _)| name == "`/gui` hoặc `!gui`"));
}

#[test]
fn test_copy_texts_use_listing() {
    let listing = ServerListing {
        java_ip: "java.example.net".into(),
        bedrock_ip: "be.example.net".into(),
        bedrock_port: "19132".into(),
        ..ServerListing::default()
    };

    assert!(java_ip_text(&listing).contains("```java.example.net```"));
    let bedrock = bedrock_ip_text(&listing);
    assert!(bedrock.contains("```be.example.net```"));
    assert!(bedrock.contains("Port: `19132`"));

    let fields = listing_fields(&listing);
    assert!(fields.iter().any(|(_, value, _)| value == "```19132```"));
}

#[tokio::test]
async fn test_chat_after_command_is_trailing_text() {
    let commands = commands(&AccessPolicy::default());
    let (command, _, rest) =
        poise::find_command(&commands, "ip server la gi vay", true, &mut Vec::new()).unwrap();
    assert_eq!(command.name, "ip");
    assert_eq!(rest, "server la gi vay");

    let parsed: Result<(), _> = poise::parse_prefix_args!((), (), rest, 0usize =>).await;
    let (error, _) = parsed.unwrap_err();
    assert!(is_trailing_text(error.as_ref()));

    let bare: Result<(), _> = poise::parse_prefix_args!((), (), "", 0usize =>).await;
    assert!(bare.is_ok());
}

#[test]
fn test_prefix_commands_take_no_arguments() {
    for command in commands(&AccessPolicy::default()) {
        assert!(command.parameters.is_empty(), "{} has parameters", command.name);
    }
}

#[test]
fn test_version_shows_major_and_minor() {
    assert_eq!(BOT_VERSION, "YumMC Bot v2.0");
}
