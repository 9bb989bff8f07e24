//! Store client wrapper using the fred crate.
//!
//! Provides a type-safe client for connecting to a single Redis/Valkey
//! instance and the pipelined batch operations the merge engine runs against
//! it. Replies of one pipeline come back in submission order, which is the
//! positional contract every batched method here preserves.

use std::collections::HashMap;
use std::time::Duration;

use fred::cmd;
use fred::prelude::*;
use fred::types::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use super::types::{ParseError, ScanPage, StoreValue, TypeTag, WriteCommand};
use super::StoreOps;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Redis error: {0}")]
    Redis(#[from] fred::error::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration for connecting to a single store instance.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Hostname or IP of the instance.
    pub host: String,
    /// Port of the instance.
    pub port: u16,
    /// Password for authentication.
    pub password: Option<String>,
    /// Connection timeout.
    pub connection_timeout: Duration,
    /// Command timeout.
    pub command_timeout: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
            password: None,
            connection_timeout: Duration::from_secs(10),
            command_timeout: Duration::from_secs(30),
        }
    }
}

impl StoreConfig {
    /// Create a new configuration for a host and port.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Set the password.
    pub fn with_password(mut self, password: String) -> Self {
        self.password = Some(password);
        self
    }

    /// Set the connection timeout.
    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Set the command timeout.
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }
}

/// A connected store client.
pub struct StoreClient {
    client: Client,
    config: StoreConfig,
}

impl StoreClient {
    /// Create and connect a new store client.
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: StoreConfig) -> Result<Self, StoreError> {
        if config.host.is_empty() {
            return Err(StoreError::InvalidConfig("No host provided".to_string()));
        }

        let server_config = ServerConfig::Centralized {
            server: Server::new(config.host.clone(), config.port),
        };

        let mut fred_config = Config {
            server: server_config,
            ..Default::default()
        };

        if let Some(ref password) = config.password {
            fred_config.password = Some(password.clone());
        }

        let command_timeout = config.command_timeout;
        let connection_timeout = config.connection_timeout;

        let client = Builder::from_config(fred_config)
            .with_performance_config(|perf| {
                perf.default_command_timeout = command_timeout;
            })
            .with_connection_config(|conn| {
                conn.connection_timeout = connection_timeout;
            })
            .build()?;

        debug!("Connecting to store");
        client.init().await?;
        debug!("Connected to store");

        Ok(Self { client, config })
    }

    /// Get the underlying fred client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Check if the client is connected.
    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }

    /// Close the connection.
    pub async fn close(&self) -> Result<(), StoreError> {
        self.client.quit().await?;
        Ok(())
    }

    /// Ping the server.
    #[instrument(skip(self))]
    pub async fn ping(&self) -> Result<String, StoreError> {
        let response: String = self.client.ping(None).await?;
        Ok(response)
    }
}

impl StoreOps for StoreClient {
    #[instrument(skip(self))]
    async fn scan_page(&self, cursor: &str, count: u32) -> Result<ScanPage, StoreError> {
        let args: Vec<Value> = vec![
            cursor.into(),
            "COUNT".into(),
            count.to_string().into(),
        ];
        let reply: Value = self.client.custom(cmd!("SCAN"), args).await?;
        parse_scan_reply(reply)
    }

    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    async fn key_types(&self, keys: &[String]) -> Result<Vec<TypeTag>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let pipeline = self.client.pipeline();
        for key in keys {
            let _: () = pipeline
                .custom(cmd!("TYPE"), vec![Value::from(key.as_str())])
                .await?;
        }

        let replies: Vec<Value> = pipeline.all().await?;
        replies
            .into_iter()
            .map(|reply| {
                let raw: String = reply.convert()?;
                Ok(raw.parse::<TypeTag>()?)
            })
            .collect()
    }

    #[instrument(skip(self, keys), fields(keys = keys.len()))]
    async fn key_ttls(&self, keys: &[String]) -> Result<Vec<i64>, StoreError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let pipeline = self.client.pipeline();
        for key in keys {
            let _: () = pipeline.ttl(key.as_str()).await?;
        }

        let ttls: Vec<i64> = pipeline.all().await?;
        Ok(ttls)
    }

    #[instrument(skip(self, requests), fields(keys = requests.len()))]
    async fn fetch_values(
        &self,
        requests: &[(String, TypeTag)],
    ) -> Result<Vec<Option<StoreValue>>, StoreError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let pipeline = self.client.pipeline();
        for (key, tag) in requests {
            match tag {
                // NONE keys are fetched as GET solely to keep their pipeline
                // slot occupied; the reply is discarded during decoding.
                TypeTag::String | TypeTag::None => {
                    let _: () = pipeline.get(key.as_str()).await?;
                }
                TypeTag::Hash => {
                    let _: () = pipeline.hgetall(key.as_str()).await?;
                }
                TypeTag::List => {
                    let _: () = pipeline.lrange(key.as_str(), 0, -1).await?;
                }
                TypeTag::Set => {
                    let _: () = pipeline.smembers(key.as_str()).await?;
                }
                TypeTag::ZSet => {
                    let args: Vec<Value> =
                        vec![key.as_str().into(), "0".into(), "-1".into(), "WITHSCORES".into()];
                    let _: () = pipeline.custom(cmd!("ZRANGE"), args).await?;
                }
            }
        }

        let replies: Vec<Value> = pipeline.all().await?;
        requests
            .iter()
            .zip(replies)
            .map(|((key, tag), reply)| decode_value(key, *tag, reply))
            .collect()
    }

    #[instrument(skip(self, commands), fields(commands = commands.len()))]
    async fn apply_writes(&self, commands: &[WriteCommand]) -> Result<(), StoreError> {
        if commands.is_empty() {
            return Ok(());
        }

        let pipeline = self.client.pipeline();
        for command in commands {
            match command {
                WriteCommand::Set { key, value } => {
                    let _: () = pipeline
                        .set(key.as_str(), value.as_str(), None, None, false)
                        .await?;
                }
                WriteCommand::HSetAll { key, fields } => {
                    let _: () = pipeline.hset(key.as_str(), fields.clone()).await?;
                }
                WriteCommand::RPush { key, elements } => {
                    let _: () = pipeline.rpush(key.as_str(), elements.clone()).await?;
                }
                WriteCommand::SAdd { key, members } => {
                    let _: () = pipeline.sadd(key.as_str(), members.clone()).await?;
                }
                WriteCommand::ZAdd { key, members } => {
                    let scored: Vec<(f64, String)> = members
                        .iter()
                        .map(|(member, score)| (*score, member.clone()))
                        .collect();
                    let _: () = pipeline
                        .zadd(key.as_str(), None, None, false, false, scored)
                        .await?;
                }
                WriteCommand::Expire { key, seconds } => {
                    let _: () = pipeline.expire(key.as_str(), *seconds, None).await?;
                }
            }
        }

        let _: Vec<Value> = pipeline.all().await?;
        Ok(())
    }
}

/// Parse a raw SCAN reply: a two-element array of (next cursor, keys).
fn parse_scan_reply(reply: Value) -> Result<ScanPage, StoreError> {
    match reply {
        Value::Array(mut parts) if parts.len() == 2 => {
            let (Some(keys), Some(cursor)) = (parts.pop(), parts.pop()) else {
                return Err(ParseError::InvalidScanReply(
                    "missing cursor or key list".to_string(),
                )
                .into());
            };
            let cursor: String = cursor.convert()?;
            let keys: Vec<String> = keys.convert()?;
            Ok(ScanPage { cursor, keys })
        }
        other => Err(ParseError::InvalidScanReply(format!(
            "expected two-element array, got {other:?}"
        ))
        .into()),
    }
}

/// Decode one pipelined value reply according to the key's type tag.
///
/// Null and empty-aggregate replies mean the key vanished between type
/// resolution and the value fetch; both decode to `None` so downstream never
/// writes a default/empty value in place of a missing one.
fn decode_value(key: &str, tag: TypeTag, reply: Value) -> Result<Option<StoreValue>, StoreError> {
    if reply.is_null() {
        return Ok(None);
    }

    let context = |e: fred::error::Error| {
        StoreError::Protocol(format!("key '{key}' ({tag}): {e}"))
    };

    let value = match tag {
        TypeTag::None => return Ok(None),
        TypeTag::String => StoreValue::Text(reply.convert().map_err(context)?),
        TypeTag::Hash => {
            let fields: HashMap<String, String> = reply.convert().map_err(context)?;
            if fields.is_empty() {
                return Ok(None);
            }
            StoreValue::Fields(fields)
        }
        TypeTag::List => {
            let elements: Vec<String> = reply.convert().map_err(context)?;
            if elements.is_empty() {
                return Ok(None);
            }
            StoreValue::Elements(elements)
        }
        TypeTag::Set => {
            let members: Vec<String> = reply.convert().map_err(context)?;
            if members.is_empty() {
                return Ok(None);
            }
            StoreValue::Members(members)
        }
        TypeTag::ZSet => {
            let members: Vec<(String, f64)> = reply.convert().map_err(context)?;
            if members.is_empty() {
                return Ok(None);
            }
            StoreValue::Scored(members)
        }
    };

    Ok(Some(value))
}
