//! Minecraft server status probe (Java edition Server List Ping).

pub mod codec;

use std::{net::IpAddr, sync::LazyLock, time::Duration};

use hickory_resolver::{error::ResolveError, TokioAsyncResolver};
use log::debug;
use regex::Regex;
use serde::Deserialize;
use serenity::async_trait;
use thiserror::Error;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

use crate::config::{Config, ConfigError};
use codec::{frame, read_varint, write_string, write_varint};

/// Protocol version sent in the handshake. Servers answer status requests
/// for any version, 47 is what most status tools send.
const PROTOCOL_VERSION: i32 = 47;
const NEXT_STATE_STATUS: i32 = 1;
const STATUS_PACKET_ID: i32 = 0x00;
/// Status responses are a single JSON document, a few KiB with a favicon.
const MAX_PACKET_LEN: i32 = 1 << 21;

static FORMATTING_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("§[0-9a-fk-orA-FK-OR]").expect("formatting code pattern is valid"));

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("status probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("protocol error: {0}")]
    Protocol(String),
    #[error("malformed status payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What a successful probe reports about the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerStatus {
    pub host: String,
    pub port: u16,
    pub version: String,
    pub protocol: i32,
    pub players_online: u32,
    pub players_max: u32,
}

impl ServerStatus {
    pub fn player_count(&self) -> String {
        format!("{}/{}", self.players_online, self.players_max)
    }
}

#[derive(Debug, Deserialize)]
struct RawStatus {
    version: RawVersion,
    players: RawPlayers,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    name: String,
    #[serde(default)]
    protocol: i32,
}

#[derive(Debug, Deserialize)]
struct RawPlayers {
    online: u32,
    max: u32,
}

#[async_trait]
pub trait StatusProbe: Send + Sync {
    async fn status(&self) -> Result<ServerStatus, ProbeError>;
}

#[derive(Debug, Clone)]
pub struct MinecraftProbe {
    host: Option<String>,
    port: Option<String>,
    timeout: Duration,
    srv: bool,
}

/// One `_minecraft._tcp` SRV answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SrvRecord {
    pub priority: u16,
    pub weight: u16,
    pub port: u16,
    pub target: String,
}

impl MinecraftProbe {
    pub fn new(host: Option<String>, port: Option<String>, timeout: Duration) -> Self {
        Self {
            host,
            port,
            timeout,
            srv: true,
        }
    }

    /// Turns the `_minecraft._tcp` SRV lookup on or off. On by default.
    pub fn with_srv(mut self, srv: bool) -> Self {
        self.srv = srv;
        self
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.mc_host.clone(),
            config.mc_port.clone(),
            config.probe_timeout,
        )
        .with_srv(config.mc_srv)
    }

    /// Host and port to probe. Checked on every call, not at startup.
    pub fn target(&self) -> Result<(&str, u16), ProbeError> {
        let host = self.host.as_deref().ok_or(ConfigError::Missing("MC_IP"))?;
        let raw_port = self.port.as_deref().ok_or(ConfigError::Missing("MC_PORT"))?;
        let port = raw_port.parse().map_err(|_| ConfigError::Invalid {
            key: "MC_PORT",
            value: raw_port.to_string(),
        })?;
        Ok((host, port))
    }

    /// Address to connect to. A SRV record wins when there is one, otherwise
    /// the configured host and port are used as is.
    pub async fn connect_target(&self, host: &str, port: u16) -> (String, u16) {
        if !self.srv || host.parse::<IpAddr>().is_ok() {
            return (host.to_string(), port);
        }
        match lookup_srv(host).await {
            Ok(Some((target, target_port))) => {
                debug!("[Probe] {host} has SRV record {target}:{target_port}");
                (target, target_port)
            }
            Ok(None) => (host.to_string(), port),
            Err(e) => {
                debug!("[Probe] no SRV record for {host}: {e}");
                (host.to_string(), port)
            }
        }
    }
}

#[async_trait]
impl StatusProbe for MinecraftProbe {
    async fn status(&self) -> Result<ServerStatus, ProbeError> {
        let (host, port) = self.target()?;
        debug!("[Probe] querying {host}:{port}");
        let attempt = async {
            let address = self.connect_target(host, port).await;
            query(host, port, address).await
        };
        tokio::time::timeout(self.timeout, attempt)
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
    }
}

async fn lookup_srv(host: &str) -> Result<Option<(String, u16)>, ResolveError> {
    let resolver = TokioAsyncResolver::tokio_from_system_conf()?;
    let lookup = resolver.srv_lookup(format!("_minecraft._tcp.{host}")).await?;
    let records: Vec<SrvRecord> = lookup
        .iter()
        .map(|srv| SrvRecord {
            priority: srv.priority(),
            weight: srv.weight(),
            port: srv.port(),
            target: srv.target().to_utf8(),
        })
        .collect();
    Ok(pick_srv_target(&records))
}

/// Picks the record to connect to: lowest priority, then highest weight.
/// Returns `None` when there is nothing usable, which means "connect to the
/// configured address".
pub fn pick_srv_target(records: &[SrvRecord]) -> Option<(String, u16)> {
    records
        .iter()
        .filter(|record| record.target != "." && record.port != 0)
        .min_by_key(|record| (record.priority, std::cmp::Reverse(record.weight)))
        .map(|record| {
            let target = record.target.trim_end_matches('.').to_string();
            (target, record.port)
        })
}

/// Sends the handshake for `host:port` to `address`, which differs from the
/// host when a SRV record redirected the connection.
async fn query(
    host: &str,
    port: u16,
    (address, address_port): (String, u16),
) -> Result<ServerStatus, ProbeError> {
    let mut stream = TcpStream::connect((address.as_str(), address_port)).await?;

    let mut handshake = Vec::new();
    write_varint(&mut handshake, PROTOCOL_VERSION);
    write_string(&mut handshake, host);
    handshake.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut handshake, NEXT_STATE_STATUS);

    stream.write_all(&frame(STATUS_PACKET_ID, &handshake)).await?;
    stream.write_all(&frame(STATUS_PACKET_ID, &[])).await?;
    stream.flush().await?;

    let length = read_varint(&mut stream).await?;
    if !(1..=MAX_PACKET_LEN).contains(&length) {
        return Err(ProbeError::Protocol(format!("bad packet length {length}")));
    }
    let mut packet = vec![0u8; length as usize];
    stream.read_exact(&mut packet).await?;

    let mut body = &packet[..];
    let packet_id = read_varint(&mut body).await?;
    if packet_id != STATUS_PACKET_ID {
        return Err(ProbeError::Protocol(format!(
            "unexpected packet id {packet_id:#04x}"
        )));
    }

    let json_len = read_varint(&mut body).await?;
    let json = usize::try_from(json_len)
        .ok()
        .and_then(|len| body.get(..len))
        .ok_or_else(|| ProbeError::Protocol(format!("bad payload length {json_len}")))?;
    let json = std::str::from_utf8(json)
        .map_err(|e| ProbeError::Protocol(format!("payload is not utf-8: {e}")))?;

    parse_status(host, port, json)
}

/// Parses the JSON document of a status response.
pub fn parse_status(host: &str, port: u16, json: &str) -> Result<ServerStatus, ProbeError> {
    let raw: RawStatus = serde_json::from_str(json)?;
    Ok(ServerStatus {
        host: host.to_string(),
        port,
        version: strip_formatting(&raw.version.name),
        protocol: raw.version.protocol,
        players_online: raw.players.online,
        players_max: raw.players.max,
    })
}

/// Removes `§` colour and style codes.
pub fn strip_formatting(text: &str) -> String {
    FORMATTING_CODE.replace_all(text, "").into_owned()
}
