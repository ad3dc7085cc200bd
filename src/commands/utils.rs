use std::time::Instant;

use poise::{serenity_prelude as serenity, CreateReply};

use crate::{
    access::has_access,
    commands::{caller, role_name},
    Context, Error,
};

pub const BOT_VERSION: &str = concat!(
    "YumMC Bot v",
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR")
);
const RULE: &str = "────────────";

/// Which listing `help` renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpFlavor {
    Slash,
    Prefix,
}

/// Fields of the help embed as `(name, value, inline)`. The broadcast
/// section is only listed for callers allowed to use it.
pub fn help_fields(
    flavor: HelpFlavor,
    prefix: &str,
    can_broadcast: bool,
    admin_only: bool,
) -> Vec<(String, String, bool)> {
    let section = |name: &str| (name.to_string(), RULE.to_string(), false);
    let mut fields = match flavor {
        HelpFlavor::Slash => vec![
            section("🎮 **MINECRAFT (Public)**"),
            ("`/online`".into(), "Xem trạng thái server Minecraft".into(), false),
            section("📊 **THÔNG TIN (Public)**"),
            ("`/info`".into(), "Thông tin về bot".into(), false),
            ("`/ping`".into(), "Kiểm tra độ trễ của bot".into(), false),
            section("💰 **THANH TOÁN (Public)**"),
            ("`/thanhtoan`".into(), "Thông tin thanh toán + mã QR".into(), false),
        ],
        HelpFlavor::Prefix => vec![
            section("🎮 **LỆNH MINECRAFT**"),
            (
                format!("`/online` hoặc `{prefix}online`"),
                "Xem trạng thái server Minecraft".into(),
                true,
            ),
            section("📊 **LỆNH THÔNG TIN**"),
            (format!("`/info` hoặc `{prefix}info`"), "Thông tin về bot".into(), true),
            (
                format!("`/ping` hoặc `{prefix}ping`"),
                "Kiểm tra độ trễ của bot".into(),
                true,
            ),
            (format!("`{prefix}getid [@user]`"), "Xem ID của người dùng".into(), true),
            (format!("`{prefix}owner`"), "Xem thông tin chủ bot".into(), true),
            section("🌐 **LỆNH IP SERVER**"),
            (format!("`{prefix}ip`"), "Xem thông tin IP server Minecraft".into(), true),
            section("💰 **THANH TOÁN**"),
            ("`/thanhtoan`".into(), "Thông tin thanh toán + mã QR".into(), true),
        ],
    };

    if can_broadcast {
        let description = if admin_only {
            "Gửi thông báo quan trọng (Admin only)"
        } else {
            "Gửi tin nhắn vào kênh (Role restricted)"
        };
        let name = match flavor {
            HelpFlavor::Slash => "`/gui`".to_string(),
            HelpFlavor::Prefix => format!("`/gui` hoặc `{prefix}gui`"),
        };
        fields.push(section("💬 **GỬI TIN NHẮN**"));
        fields.push((name, description.into(), flavor == HelpFlavor::Prefix));
    }
    fields
}

/// Xem tất cả lệnh của bot
#[poise::command(prefix_command, track_edits, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let can_broadcast = has_access(&caller(ctx).await, &data.policy);
    let flavor = match ctx {
        poise::Context::Application(_) => HelpFlavor::Slash,
        poise::Context::Prefix(_) => HelpFlavor::Prefix,
    };
    let gui_name = if flavor == HelpFlavor::Slash { "/gui" } else { "gui" };
    let footer = if can_broadcast {
        format!("YumMC Bot - Bạn có quyền dùng {gui_name}")
    } else {
        format!("YumMC Bot - Không có quyền {gui_name}")
    };
    let bot_face = ctx.cache().current_user().face();

    let embed = serenity::CreateEmbed::new()
        .color(0x5865F2)
        .title("📖 Hướng Dẫn Sử Dụng Bot")
        .description(match flavor {
            HelpFlavor::Slash => "Danh sách các lệnh Slash Commands:",
            HelpFlavor::Prefix => "Danh sách các lệnh có sẵn:",
        })
        .fields(help_fields(
            flavor,
            &data.config.prefix,
            can_broadcast,
            data.policy.require_admin_only(),
        ))
        .footer(serenity::CreateEmbedFooter::new(footer).icon_url(bot_face));

    ctx.send(CreateReply::default().embed(embed).ephemeral(true)).await?;
    Ok(())
}

/// Kiểm tra độ trễ của bot
#[poise::command(prefix_command, slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = Instant::now();
    let reply = ctx
        .send(CreateReply::default().content("🏓 Pinging...").reply(true))
        .await?;
    let round_trip = started.elapsed();
    let gateway = ctx.ping().await;

    let embed = serenity::CreateEmbed::new()
        .color(0x00ff99)
        .title("🏓 Pong!")
        .field("🤖 Độ trễ bot", format!("{}ms", round_trip.as_millis()), true)
        .field("🌐 Độ trễ API", format!("{}ms", gateway.as_millis()), true)
        .timestamp(serenity::Timestamp::now());

    reply
        .edit(ctx, CreateReply::default().content("").embed(embed))
        .await?;
    Ok(())
}

/// Thông tin về bot
#[poise::command(prefix_command, slash_command)]
pub async fn info(ctx: Context<'_>) -> Result<(), Error> {
    let (tag, id, face, created) = {
        let me = ctx.cache().current_user();
        (me.tag(), me.id, me.face(), me.id.created_at().unix_timestamp())
    };
    let guilds = ctx.cache().guild_count();
    let users = ctx.cache().user_count();
    let help_hint = match ctx {
        poise::Context::Application(_) => "Sử dụng /help để xem lệnh".to_string(),
        poise::Context::Prefix(_) => format!("Sử dụng {}help để xem lệnh", ctx.data().config.prefix),
    };

    let embed = serenity::CreateEmbed::new()
        .color(0x00D4FF)
        .title("🤖 Thông Tin Bot")
        .thumbnail(face.clone())
        .field("👑 Tên bot", tag, true)
        .field("🆔 ID", id.to_string(), true)
        .field("📅 Ngày tạo", format!("<t:{created}:R>"), true)
        .field("📊 Số server", guilds.to_string(), true)
        .field("👥 Số user", users.to_string(), true)
        .field("⚡ Phiên bản", BOT_VERSION, true)
        .footer(serenity::CreateEmbedFooter::new(help_hint).icon_url(face));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Xem ID của người dùng
#[poise::command(prefix_command)]
pub async fn getid(ctx: Context<'_>) -> Result<(), Error> {
    // first mention anywhere in the message, like `getid hi @user`
    let mentioned = match ctx {
        poise::Context::Prefix(prefix) => prefix.msg.mentions.first(),
        poise::Context::Application(_) => None,
    };
    let user = mentioned.unwrap_or_else(|| ctx.author());

    let embed = serenity::CreateEmbed::new()
        .color(0xff5fa2)
        .title("🆔 THÔNG TIN ID")
        .thumbnail(user.face())
        .field("👤 User", format!("<@{}>", user.id), true)
        .field("🏷️ Tag", user.name.clone(), true)
        .field("🆔 ID", user.id.to_string(), false)
        .field("🤖 Bot", if user.bot { "Có" } else { "Không" }, false)
        .field(
            "📆 Tạo",
            format!("<t:{}:R>", user.created_at().unix_timestamp()),
            false,
        )
        .footer(serenity::CreateEmbedFooter::new("YumMC Bot"));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Xem thông tin chủ bot
#[poise::command(prefix_command, guild_only)]
pub async fn owner(ctx: Context<'_>) -> Result<(), Error> {
    let owner_id = ctx.data().config.owner()?;
    let guild_id = ctx.guild_id().ok_or("owner is only available in a server")?;
    let member = guild_id.member(ctx.http(), owner_id).await?;

    let roles = member
        .roles
        .iter()
        .filter(|role| role.get() != guild_id.get())
        .filter_map(|&role| role_name(ctx.cache(), Some(guild_id), role))
        .collect::<Vec<_>>()
        .join(", ");
    let joined = member
        .joined_at
        .map(|at| format!("<t:{}:R>", at.unix_timestamp()))
        .unwrap_or_else(|| "?".into());
    let nickname = member.nick.as_deref().unwrap_or(&member.user.name);

    let description = format!(
        "👑 **THÔNG TIN OWNER**\n```\nTên : {name}\nID  : {id}\nBot : Không\n```\n\n📊 **Trên server này:**\n• Nickname: {nickname}\n• Vào server: {joined}\n• Roles: {roles}\n\n**YumMC Bot**",
        name = member.user.name,
        id = member.user.id,
    );

    let embed = serenity::CreateEmbed::new()
        .color(0xf1c40f)
        .title("👑 CHỦ SỞ HỮU BOT")
        .thumbnail(member.user.face())
        .description(description);

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}
