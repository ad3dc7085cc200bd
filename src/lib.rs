pub mod access;
pub mod commands;
pub mod config;
pub mod interaction;
pub mod probe;
pub mod watcher;

use access::AccessPolicy;
use config::Config;
use probe::MinecraftProbe;

pub type Context<'a> = poise::Context<'a, Data, Error>;
pub type Error = Box<dyn std::error::Error + Send + Sync>;

pub struct Data {
    pub config: Config,
    pub policy: AccessPolicy,
    pub probe: MinecraftProbe,
}

impl Data {
    pub fn new(config: Config) -> Self {
        let policy = config.access_policy();
        let probe = MinecraftProbe::from_config(&config);
        Self {
            config,
            policy,
            probe,
        }
    }
}
