use poise::{serenity_prelude as serenity, CreateReply};

use crate::{config::ServerListing, interaction::ComponentId, Context, Data, Error};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Game modes and their current state, shown at the top of the listing.
const MODES: [(&str, &str); 3] = [
    ("🟢 ⚔️ Eco Sword", "```✅ Tạm đóng```"),
    ("🔴 ⚔️ Box PvP", "```❎ Chưa mở```"),
    ("🔴 ☁️ SkyBlock", "```❎ Chưa mở```"),
];

const NOTICES: [(&str, &str); 3] = [
    ("📢 Thông báo", "```Đang bảo trì, Sẽ mở lại sv vào tối nay```"),
    (
        "💬 Cập nhật",
        "```Mọi thông tin sẽ được cập nhật tại kênh thông báo sau 🥰```",
    ),
    (
        "❤️ Lời nhắn",
        "```Chúc các bạn một ngày tốt lành\n🥰 Luôn luôn ủng hộ sv mình nha 😍```",
    ),
];

/// Xem thông tin IP server Minecraft
#[poise::command(prefix_command)]
pub async fn ip(ctx: Context<'_>) -> Result<(), Error> {
    let config = &ctx.data().config;

    let mut embed = serenity::CreateEmbed::new()
        .color(0x00ff99)
        .title("🍀 **EternalSMP Community** 🍀")
        .description("🌐 Thông tin kết nối máy chủ")
        .fields(listing_fields(&config.listing))
        .footer(serenity::CreateEmbedFooter::new(
            "🎮 EternalSMP - Kết nối cộng đồng Minecraft Việt Nam",
        ))
        .timestamp(serenity::Timestamp::now());
    if let Some(banner) = &config.server_banner {
        embed = embed.image(banner);
    }

    let buttons = vec![
        serenity::CreateButton::new(ComponentId::CopyJavaIp.as_str())
            .label("📋 Copy Java IP")
            .style(serenity::ButtonStyle::Secondary)
            .emoji(serenity::ReactionType::Unicode("💻".into())),
        serenity::CreateButton::new(ComponentId::CopyBedrockIp.as_str())
            .label("📱 Copy Bedrock IP")
            .style(serenity::ButtonStyle::Secondary)
            .emoji(serenity::ReactionType::Unicode("📱".into())),
    ];

    ctx.send(
        CreateReply::default()
            .embed(embed)
            .components(vec![serenity::CreateActionRow::Buttons(buttons)])
            .reply(true),
    )
    .await?;
    Ok(())
}

pub fn listing_fields(listing: &ServerListing) -> Vec<(String, String, bool)> {
    let section = |name: &str| (name.to_string(), RULE.to_string(), false);
    let code = |value: &str| format!("```{value}```");

    let mut fields = vec![section("🎮 **CHẾ ĐỘ MÁY CHỦ**")];
    fields.extend(
        MODES
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string(), true)),
    );
    fields.extend([
        section("💻 **JAVA EDITION**"),
        ("🌎 IP".into(), code(&listing.java_ip), true),
        ("〽️ Phiên Bản".into(), code(&listing.java_versions), true),
        section("📱 **BEDROCK / PE**"),
        ("🌎 IP".into(), code(&listing.bedrock_ip), true),
        ("〽️ Phiên Bản".into(), code(&listing.bedrock_versions), true),
        ("🔌 Port".into(), code(&listing.bedrock_port), true),
        section("🧑‍🔧 **TRẠNG THÁI MÁY CHỦ**"),
    ]);
    fields.extend(
        NOTICES
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string(), false)),
    );
    fields
}

pub fn java_ip_text(listing: &ServerListing) -> String {
    format!(
        "📋 **Bấm giữ vào ip mà coppy đê:**\n```{}```\nPhiên bản: {}",
        listing.java_ip, listing.java_versions
    )
}

pub fn bedrock_ip_text(listing: &ServerListing) -> String {
    format!(
        "📱 **Bấm giữ vào ip mà coppy đê:**\n```{}```\nPort: `{}`\nPhiên bản: {}",
        listing.bedrock_ip, listing.bedrock_port, listing.bedrock_versions
    )
}

pub async fn copy_java_ip(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    reply_ephemeral(ctx, interaction, java_ip_text(&data.config.listing)).await
}

pub async fn copy_bedrock_ip(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    reply_ephemeral(ctx, interaction, bedrock_ip_text(&data.config.listing)).await
}

async fn reply_ephemeral(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    content: String,
) -> Result<(), Error> {
    interaction
        .create_response(
            ctx,
            serenity::CreateInteractionResponse::Message(
                serenity::CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
        )
        .await?;
    Ok(())
}
