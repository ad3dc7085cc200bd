//! Permission-gated broadcast: the `gui` command posts a button, the button
//! opens a modal, and the submitted modal is posted into the channel as an
//! embed.

use log::{error, info};
use poise::{serenity_prelude as serenity, CreateReply};

use crate::{
    access::{denial_message, has_access, AccessPolicy, Caller, Surface},
    commands::{caller, role_name},
    interaction::ComponentId,
    Context, Data, Error,
};

const MESSAGE_CONTENT_ID: &str = "messageContent";
const MESSAGE_TITLE_ID: &str = "messageTitle";
const MAX_CONTENT_LEN: u16 = 2000;
const MAX_TITLE_LEN: u16 = 100;

/// How a broadcast looks, depending on whether the sender is an
/// administrator or a permitted role member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastStyle {
    pub color: u32,
    pub author_prefix: &'static str,
    pub default_title: &'static str,
    pub reaction: &'static str,
    pub panel_title: &'static str,
    pub panel_description: &'static str,
    pub button_label: &'static str,
    pub button_style: serenity::ButtonStyle,
}

const ADMIN_STYLE: BroadcastStyle = BroadcastStyle {
    color: 0xFF0000,
    author_prefix: "📢 Thông báo từ Admin",
    default_title: "📢 THÔNG BÁO QUAN TRỌNG",
    reaction: "📢",
    panel_title: "📢 HỆ THỐNG THÔNG BÁO ADMIN",
    panel_description: "Chỉ **Admin** mới có thể sử dụng tính năng này\nNhấn nút bên dưới để gửi thông báo quan trọng",
    button_label: "📝 Soạn thông báo",
    button_style: serenity::ButtonStyle::Danger,
};

const MEMBER_STYLE: BroadcastStyle = BroadcastStyle {
    color: 0x5865F2,
    author_prefix: "💬 Tin nhắn từ",
    default_title: "💬 TIN NHẮN MỚI",
    reaction: "💬",
    panel_title: "💬 HỆ THỐNG GỬI TIN NHẮN",
    panel_description: "Bạn có quyền gửi tin nhắn vào kênh này\nNhấn nút bên dưới để soạn tin nhắn",
    button_label: "📝 Soạn tin nhắn",
    button_style: serenity::ButtonStyle::Primary,
};

impl BroadcastStyle {
    pub fn for_caller(caller: &Caller) -> Self {
        if caller.is_admin {
            ADMIN_STYLE
        } else {
            MEMBER_STYLE
        }
    }

    /// Title of the posted embed: the submitted title if it is not blank.
    pub fn title(&self, submitted: Option<&str>) -> String {
        match submitted.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => format!("📌 {title}"),
            None => self.default_title.to_string(),
        }
    }
}

/// Slash description of `gui`, reflecting the configured policy.
pub fn gui_description(policy: &AccessPolicy) -> String {
    let scope = if policy.require_admin_only() {
        "(Admin only)"
    } else {
        "(Role restricted)"
    };
    format!("Mở form gửi tin nhắn vào kênh {scope}")
}

/// Returns the content unless it is missing or only whitespace.
pub fn validate_content(content: Option<&str>) -> Option<&str> {
    content.filter(|c| !c.trim().is_empty())
}

/// Mở form gửi tin nhắn vào kênh
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn gui(ctx: Context<'_>) -> Result<(), Error> {
    let data = ctx.data();
    let caller = caller(ctx).await;

    if !has_access(&caller, &data.policy) {
        let message = denial_message(&data.policy, Surface::Command, |id| {
            role_name(ctx.cache(), ctx.guild_id(), id)
        });
        ctx.send(
            CreateReply::default()
                .content(message)
                .ephemeral(true)
                .reply(true)
                .allowed_mentions(serenity::CreateAllowedMentions::new().replied_user(false)),
        )
        .await?;
        return Ok(());
    }

    let style = BroadcastStyle::for_caller(&caller);
    let author = ctx.author();

    let embed = serenity::CreateEmbed::new()
        .color(style.color)
        .title(style.panel_title)
        .description(style.panel_description)
        .footer(
            serenity::CreateEmbedFooter::new(format!("Yêu cầu bởi {}", author.name))
                .icon_url(author.face()),
        )
        .timestamp(serenity::Timestamp::now());

    let button = serenity::CreateButton::new(ComponentId::OpenSendModal.as_str())
        .label(style.button_label)
        .style(style.button_style)
        .emoji(serenity::ReactionType::Unicode(style.reaction.into()));

    ctx.send(
        CreateReply::default()
            .embed(embed)
            .components(vec![serenity::CreateActionRow::Buttons(vec![button])])
            .ephemeral(true)
            .reply(true),
    )
    .await?;
    Ok(())
}

fn interaction_caller(member: Option<&serenity::Member>) -> Caller {
    member
        .map(|member| Caller::from_member(member, None))
        .unwrap_or_default()
}

fn ephemeral_message(content: impl Into<String>) -> serenity::CreateInteractionResponse {
    serenity::CreateInteractionResponse::Message(
        serenity::CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(true),
    )
}

/// Answers the `openSendModal` button with the compose form.
pub async fn open_modal(
    ctx: &serenity::Context,
    interaction: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let caller = interaction_caller(interaction.member.as_ref());
    if !has_access(&caller, &data.policy) {
        let message = denial_message(&data.policy, Surface::Feature, |id| {
            role_name(&ctx.cache, interaction.guild_id, id)
        });
        interaction
            .create_response(ctx, ephemeral_message(message))
            .await?;
        return Ok(());
    }

    let title = if data.policy.require_admin_only() {
        "✏️ Soạn Tin Nhắn (Admin)"
    } else {
        "✏️ Soạn Tin Nhắn"
    };

    let content_input = serenity::CreateInputText::new(
        serenity::InputTextStyle::Paragraph,
        "Nội dung tin nhắn",
        MESSAGE_CONTENT_ID,
    )
    .placeholder("Nhập tin nhắn bạn muốn gửi vào kênh này...")
    .min_length(1)
    .max_length(MAX_CONTENT_LEN)
    .required(true);

    let title_input = serenity::CreateInputText::new(
        serenity::InputTextStyle::Short,
        "Tiêu đề (tùy chọn)",
        MESSAGE_TITLE_ID,
    )
    .placeholder("Nhập tiêu đề nếu muốn...")
    .max_length(MAX_TITLE_LEN)
    .required(false);

    let modal = serenity::CreateModal::new(ComponentId::SendModal.as_str(), title).components(vec![
        serenity::CreateActionRow::InputText(content_input),
        serenity::CreateActionRow::InputText(title_input),
    ]);

    if let Err(e) = interaction
        .create_response(ctx, serenity::CreateInteractionResponse::Modal(modal))
        .await
    {
        error!("failed to open compose modal: {e}");
        interaction
            .create_response(ctx, ephemeral_message("❌ Không thể mở form nhập liệu!"))
            .await?;
    }
    Ok(())
}

fn input_value(data: &serenity::ModalInteractionData, custom_id: &str) -> Option<String> {
    data.components
        .iter()
        .flat_map(|row| row.components.iter())
        .find_map(|component| match component {
            serenity::ActionRowComponent::InputText(input) if input.custom_id == custom_id => {
                input.value.clone()
            }
            _ => None,
        })
}

/// Posts a submitted compose form into the channel it came from.
pub async fn submit(
    ctx: &serenity::Context,
    interaction: &serenity::ModalInteraction,
    data: &Data,
) -> Result<(), Error> {
    let caller = interaction_caller(interaction.member.as_ref());
    if !has_access(&caller, &data.policy) {
        interaction
            .create_response(ctx, ephemeral_message("❌ Bạn không có quyền gửi tin nhắn!"))
            .await?;
        return Ok(());
    }

    interaction.defer_ephemeral(ctx).await?;

    let content = input_value(&interaction.data, MESSAGE_CONTENT_ID);
    let Some(content) = validate_content(content.as_deref()) else {
        interaction
            .edit_response(
                ctx,
                serenity::EditInteractionResponse::new().content("❌ Tin nhắn không được để trống!"),
            )
            .await?;
        return Ok(());
    };
    let title = input_value(&interaction.data, MESSAGE_TITLE_ID);

    let style = BroadcastStyle::for_caller(&caller);
    let user = &interaction.user;

    let embed = serenity::CreateEmbed::new()
        .color(style.color)
        .title(style.title(title.as_deref()))
        .description(content)
        .footer(
            serenity::CreateEmbedFooter::new(format!("{} - {}", style.author_prefix, user.name))
                .icon_url(user.face()),
        )
        .thumbnail(user.face())
        .timestamp(serenity::Timestamp::now());

    let outcome = match interaction
        .channel_id
        .send_message(&ctx.http, serenity::CreateMessage::new().embed(embed))
        .await
    {
        Ok(message) => message
            .react(&ctx.http, serenity::ReactionType::Unicode(style.reaction.into()))
            .await
            .map(|_| ()),
        Err(e) => Err(e),
    };

    let reply = match outcome {
        Ok(()) => {
            info!(
                "{} {} sent a broadcast in {}",
                if caller.is_admin { "ADMIN" } else { "ROLE" },
                user.tag(),
                interaction.channel_id
            );
            "✅ Đã gửi tin nhắn thành công!"
        }
        Err(e) => {
            error!("failed to send broadcast: {e}");
            "❌ Đã có lỗi khi gửi tin nhắn! Vui lòng thử lại."
        }
    };

    interaction
        .edit_response(ctx, serenity::EditInteractionResponse::new().content(reply))
        .await?;
    Ok(())
}
