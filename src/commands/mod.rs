pub mod broadcast;
pub mod payment;
pub mod server_ip;
pub mod status;
pub mod utils;

use poise::serenity_prelude as serenity;

use crate::{
    access::{AccessPolicy, Caller},
    Context, Data, Error,
};

/// Every command the bot registers, prefix and slash.
pub fn commands(policy: &AccessPolicy) -> Vec<poise::Command<Data, Error>> {
    let mut gui = broadcast::gui();
    gui.description = Some(broadcast::gui_description(policy));

    vec![
        status::online(),
        payment::thanhtoan(),
        gui,
        utils::help(),
        utils::ping(),
        utils::info(),
        utils::getid(),
        utils::owner(),
        server_ip::ip(),
    ]
}

/// Resolves the invoking member into a [`Caller`]. Outside a guild the
/// caller has no roles and no administrator flag.
#[allow(deprecated)]
pub async fn caller(ctx: Context<'_>) -> Caller {
    let Some(member) = ctx.author_member().await else {
        return Caller::default();
    };
    // prefix invocations carry no resolved permissions
    let permissions = member
        .permissions
        .or_else(|| ctx.guild().map(|guild| guild.member_permissions(&member)));
    Caller::from_member(&member, permissions)
}

/// Whether a prefix argument error only means there were extra words after
/// the command. Such invocations are rerun without arguments.
pub fn is_trailing_text(error: &(dyn std::error::Error + Send + Sync + 'static)) -> bool {
    error.downcast_ref::<poise::TooManyArguments>().is_some()
}

/// Looks up a role name in the cached guild.
pub fn role_name(
    cache: &serenity::Cache,
    guild_id: Option<serenity::GuildId>,
    role_id: serenity::RoleId,
) -> Option<String> {
    let guild = cache.guild(guild_id?)?;
    guild.roles.get(&role_id).map(|role| role.name.clone())
}
