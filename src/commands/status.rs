use log::debug;
use poise::{serenity_prelude as serenity, CreateReply};

use crate::{probe::StatusProbe, watcher::status_fields, Context, Error};

/// Xem trạng thái server Minecraft
#[poise::command(prefix_command, slash_command)]
pub async fn online(ctx: Context<'_>) -> Result<(), Error> {
    ctx.defer().await?;

    let data = ctx.data();
    match data.probe.status().await {
        Ok(status) => {
            let mut embed = serenity::CreateEmbed::new()
                .color(0x00ff99)
                .title("🟢 TRẠNG THÁI SERVER MINECRAFT")
                .fields(status_fields(&status))
                .timestamp(serenity::Timestamp::now());
            if let Some(banner) = &data.config.server_banner {
                embed = embed.image(banner);
            }
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        Err(e) => {
            debug!("[Probe] online command: {e}");
            ctx.say("❌ **Server đang OFFLINE!**").await?;
        }
    }
    Ok(())
}
