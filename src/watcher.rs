//! Periodic server status check that posts an alert on every online/offline
//! transition.

use std::time::Duration;

use log::{debug, error, info};
use poise::serenity_prelude as serenity;
use serenity::async_trait;
use tokio::{task::JoinHandle, time::MissedTickBehavior};

use crate::{
    config::Config,
    probe::{MinecraftProbe, ProbeError, ServerStatus, StatusProbe},
    Error,
};

const ONLINE_COLOR: u32 = 0x00ff99;
const OFFLINE_COLOR: u32 = 0xff3333;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ServerState {
    #[default]
    Unknown,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ServerState,
    pub to: ServerState,
}

/// The last state the watcher saw. Starts out [`ServerState::Unknown`] so the
/// first observation after startup is always a transition.
#[derive(Debug, Default)]
pub struct WatcherState {
    last_observed: ServerState,
}

impl WatcherState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_observed(&self) -> ServerState {
        self.last_observed
    }

    /// Records `candidate`, returning the transition if it differs from the
    /// previous observation.
    pub fn observe(&mut self, candidate: ServerState) -> Option<Transition> {
        if candidate == self.last_observed {
            return None;
        }
        let from = std::mem::replace(&mut self.last_observed, candidate);
        Some(Transition {
            from,
            to: candidate,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    Online(ServerStatus),
    Offline,
}

impl Alert {
    pub fn state(&self) -> ServerState {
        match self {
            Alert::Online(_) => ServerState::Online,
            Alert::Offline => ServerState::Offline,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Alert::Online(_) => "🟢 SERVER ĐÃ ONLINE",
            Alert::Offline => "🔴 SERVER ĐÃ OFFLINE",
        }
    }

    pub fn description(&self) -> Option<&'static str> {
        match self {
            Alert::Online(_) => None,
            Alert::Offline => Some("Không thể kết nối tới server Minecraft"),
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Alert::Online(_) => ONLINE_COLOR,
            Alert::Offline => OFFLINE_COLOR,
        }
    }

    /// Embed fields as `(name, value, inline)`.
    pub fn fields(&self) -> Vec<(&'static str, String, bool)> {
        match self {
            Alert::Online(status) => status_fields(status),
            Alert::Offline => Vec::new(),
        }
    }

    pub fn embed(&self, banner: Option<&str>) -> serenity::CreateEmbed {
        let mut embed = serenity::CreateEmbed::new()
            .color(self.color())
            .title(self.title())
            .fields(self.fields())
            .timestamp(serenity::Timestamp::now());
        if let Some(description) = self.description() {
            embed = embed.description(description);
        }
        if let Some(banner) = banner {
            embed = embed.image(banner);
        }
        embed
    }
}

pub fn status_fields(status: &ServerStatus) -> Vec<(&'static str, String, bool)> {
    vec![
        ("🌍 Server", status.host.clone(), false),
        ("🌍 Port", status.port.to_string(), false),
        ("👥 Online", status.player_count(), true),
        ("⚙️ Version", status.version.clone(), true),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Playing(String),
    Watching(String),
}

impl Presence {
    pub fn from_probe(result: &Result<ServerStatus, ProbeError>) -> Self {
        match result {
            Ok(status) => Presence::Playing(format!("Online: {}", status.player_count())),
            Err(_) => Presence::Watching("Server OFFLINE".into()),
        }
    }

    pub fn activity(&self) -> serenity::ActivityData {
        match self {
            Presence::Playing(name) => serenity::ActivityData::playing(name),
            Presence::Watching(name) => serenity::ActivityData::watching(name),
        }
    }
}

/// Where the watcher reports to.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Best effort, never fails the tick.
    async fn set_presence(&self, presence: Presence);

    async fn send_alert(&self, alert: &Alert) -> Result<(), Error>;
}

pub struct StatusWatcher<P, S> {
    state: WatcherState,
    probe: P,
    sink: S,
}

impl<P, S> StatusWatcher<P, S>
where
    P: StatusProbe,
    S: AlertSink,
{
    pub fn new(probe: P, sink: S) -> Self {
        Self {
            state: WatcherState::new(),
            probe,
            sink,
        }
    }

    pub fn state(&self) -> ServerState {
        self.state.last_observed()
    }

    /// Runs one probe and emits an alert if the state changed. Returns the
    /// alert that was emitted, if any, whether or not sending it succeeded.
    pub async fn tick(&mut self) -> Option<Alert> {
        let result = self.probe.status().await;

        self.sink.set_presence(Presence::from_probe(&result)).await;

        let candidate = match &result {
            Ok(_) => ServerState::Online,
            Err(e) => {
                debug!("[Watcher] probe failed: {e}");
                ServerState::Offline
            }
        };

        let transition = self.state.observe(candidate)?;
        info!(
            "[Watcher] server state {:?} -> {:?}",
            transition.from, transition.to
        );

        let alert = match result {
            Ok(status) => Alert::Online(status),
            Err(_) => Alert::Offline,
        };

        if let Err(e) = self.sink.send_alert(&alert).await {
            error!("failed to send {:?} alert: {e}", transition.to);
        }

        Some(alert)
    }

    /// Ticks forever. The first tick fires immediately.
    pub async fn run(mut self, period: Duration) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            self.tick().await;
        }
    }
}

/// Posts alerts into the configured alert channel.
pub struct DiscordSink {
    ctx: serenity::Context,
    config: Config,
}

impl DiscordSink {
    pub fn new(ctx: serenity::Context, config: Config) -> Self {
        Self { ctx, config }
    }
}

#[async_trait]
impl AlertSink for DiscordSink {
    async fn set_presence(&self, presence: Presence) {
        self.ctx.set_activity(Some(presence.activity()));
    }

    async fn send_alert(&self, alert: &Alert) -> Result<(), Error> {
        let channel = self.config.alert_channel()?;

        let mut message =
            serenity::CreateMessage::new().embed(alert.embed(self.config.server_banner.as_deref()));
        if let Some(role) = self.config.admin_role() {
            message = message
                .content(format!("<@&{role}>"))
                .allowed_mentions(serenity::CreateAllowedMentions::new().roles(vec![role]));
        }

        channel.send_message(&self.ctx.http, message).await?;
        debug!("[Watcher] sent {:?} alert to {channel}", alert.state());
        Ok(())
    }
}

/// Starts the watcher on its own task.
pub fn spawn(ctx: serenity::Context, config: &Config, probe: MinecraftProbe) -> JoinHandle<()> {
    let period = config.check_interval;
    let watcher = StatusWatcher::new(probe, DiscordSink::new(ctx, config.clone()));
    info!("[Watcher] checking server status every {period:?}");
    tokio::spawn(watcher.run(period))
}
