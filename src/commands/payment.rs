use poise::{serenity_prelude as serenity, CreateReply};

use crate::{Context, Error};

/// Hiển thị thông tin thanh toán + mã QR
#[poise::command(prefix_command, slash_command)]
pub async fn thanhtoan(ctx: Context<'_>) -> Result<(), Error> {
    let payment = ctx.data().config.payment.resolve()?;

    let mut embed = serenity::CreateEmbed::new()
        .color(0x00ff99)
        .title("💸 Thông Tin Thanh Toán")
        .description("Vui lòng quét mã QR bên dưới để thanh toán")
        .field("💰 Số tiền", format!("{} VND", format_vnd(payment.amount)), false)
        .field("🏦 Ngân hàng", payment.bank, true)
        .field("🔢 Số tài khoản", payment.account, true)
        .field("👤 Chủ tài khoản", payment.holder, false)
        .footer(serenity::CreateEmbedFooter::new("cre Yummc"))
        .timestamp(serenity::Timestamp::now());
    if let Some(qr) = payment.qr_image {
        embed = embed.image(qr);
    }

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Formats an amount the way `vi-VN` does: `.` between groups of three.
pub fn format_vnd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
