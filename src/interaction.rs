use std::str::FromStr;

use log::debug;
use poise::serenity_prelude as serenity;
use thiserror::Error;

use crate::{
    commands::{broadcast, server_ip},
    Data, Error,
};

/// Custom ids of every button and modal the bot creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentId {
    OpenSendModal,
    SendModal,
    CopyJavaIp,
    CopyBedrockIp,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown component id: {0}")]
pub struct UnknownComponentError(String);

impl ComponentId {
    pub const fn as_str(self) -> &'static str {
        match self {
            ComponentId::OpenSendModal => "openSendModal",
            ComponentId::SendModal => "sendMessageModal",
            ComponentId::CopyJavaIp => "copy_java_ip",
            ComponentId::CopyBedrockIp => "copy_bedrock_ip",
        }
    }
}

impl FromStr for ComponentId {
    type Err = UnknownComponentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openSendModal" => Ok(Self::OpenSendModal),
            "sendMessageModal" => Ok(Self::SendModal),
            "copy_java_ip" => Ok(Self::CopyJavaIp),
            "copy_bedrock_ip" => Ok(Self::CopyBedrockIp),
            _ => Err(UnknownComponentError(s.to_string())),
        }
    }
}

/// Handles button presses and modal submissions. Application commands are
/// dispatched by poise and never reach this function.
pub async fn handle_interaction(
    ctx: &serenity::Context,
    interaction: &serenity::Interaction,
    data: &Data,
) -> Result<(), Error> {
    match interaction {
        serenity::Interaction::Component(component) => {
            let Ok(id) = component.data.custom_id.parse::<ComponentId>() else {
                debug!("ignoring component {}", component.data.custom_id);
                return Ok(());
            };
            match id {
                ComponentId::OpenSendModal => broadcast::open_modal(ctx, component, data).await,
                ComponentId::CopyJavaIp => server_ip::copy_java_ip(ctx, component, data).await,
                ComponentId::CopyBedrockIp => {
                    server_ip::copy_bedrock_ip(ctx, component, data).await
                }
                ComponentId::SendModal => Ok(()),
            }
        }
        serenity::Interaction::Modal(modal) => match modal.data.custom_id.parse() {
            Ok(ComponentId::SendModal) => broadcast::submit(ctx, modal, data).await,
            _ => Ok(()),
        },
        _ => Ok(()),
    }
}
