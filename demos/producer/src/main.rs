//! STOMP producer demo.
//!
//! Connects to a broker, enqueues ten JSON messages and disconnects once the
//! broker has confirmed the DISCONNECT with a receipt.
//!
//! Environment variables:
//! - STOMP_HOST: Broker host (default localhost)
//! - STOMP_PORT: Broker port (default 61613)
//! - STOMP_QUEUE: Destination (default /queue/testIn)
//! - STOMP_LOG: tracing filter, e.g. debug or stomp_transport=trace (default info)

use std::net::TcpStream;
use std::time::Duration;

use serde_json::json;
use stomp_transport::prelude::*;
use thiserror::Error;
use tracing::info;

const MESSAGE_COUNT: u64 = 10;
const RECEIPT_TIMEOUT: Duration = Duration::from_secs(5);
const DISCONNECT_RECEIPT: &str = "producer-disconnect";
// Neither sends nor expects heart-beats.
const NO_HEART_BEAT: &str = "0,0";

#[derive(Debug, Error)]
enum ProducerError {
    #[error("invalid {name}: {value:?}")]
    InvalidSetting { name: &'static str, value: String },

    #[error("cannot connect to {addr}: {source}")]
    Connect {
        addr: String,
        source: std::io::Error,
    },

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("broker refused session: {0}")]
    Refused(String),

    #[error("unexpected {0} frame")]
    Unexpected(Command),

    #[error("no receipt for DISCONNECT within {0:?}")]
    NoReceipt(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProducerConfig {
    host: String,
    port: u16,
    queue: String,
}

impl ProducerConfig {
    fn from_env() -> Result<Self, ProducerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProducerError> {
        let port = match lookup("STOMP_PORT") {
            Some(value) => value
                .parse()
                .map_err(|_| ProducerError::InvalidSetting {
                    name: "STOMP_PORT",
                    value,
                })?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: lookup("STOMP_HOST").unwrap_or_else(|| "localhost".to_string()),
            port,
            queue: lookup("STOMP_QUEUE").unwrap_or_else(|| "/queue/testIn".to_string()),
        })
    }
}

fn connect(config: &ProducerConfig) -> Result<FrameTransport<TcpStream>, ProducerError> {
    let mut transport = FrameTransport::new(config.host.clone(), config.port);
    let stream = TcpStream::connect((config.host.as_str(), config.port)).map_err(|source| {
        ProducerError::Connect {
            addr: format!("{}:{}", config.host, config.port),
            source,
        }
    })?;
    transport.attach(stream);

    let accept: Vec<_> = Version::ALL.iter().map(|v| v.as_str()).collect();
    transport.send(
        &Frame::new(Command::Connect)
            .with_header(ACCEPT_VERSION_HEADER, accept.join(","))
            .with_header(HOST_HEADER, config.host.clone())
            .with_header(HEART_BEAT_HEADER, NO_HEART_BEAT),
    )?;

    let reply = transport.receive()?;
    match reply.command() {
        Command::Connected => {
            let version = reply
                .header(VERSION_HEADER)
                .map(str::parse::<Version>)
                .transpose()
                .map_err(|e| ProducerError::InvalidSetting {
                    name: VERSION_HEADER,
                    value: e.0,
                })?
                .unwrap_or(Version::V1_0);
            transport.set_version(version);
            info!(%version, "session established");
            Ok(transport)
        }
        Command::Error => Err(ProducerError::Refused(
            reply.header(MESSAGE_HEADER).unwrap_or_default().to_string(),
        )),
        other => Err(ProducerError::Unexpected(other)),
    }
}

fn run(config: &ProducerConfig) -> Result<(), ProducerError> {
    let mut transport = connect(config)?;

    for count in 0..MESSAGE_COUNT {
        let body = json!({ "count": count }).to_string();
        transport.send(
            &Frame::new(Command::Send)
                .with_header(DESTINATION_HEADER, config.queue.clone())
                .with_header(CONTENT_TYPE_HEADER, "application/json")
                .with_body(body),
        )?;
    }
    info!(queue = %config.queue, count = MESSAGE_COUNT, "messages enqueued");

    transport.send(
        &Frame::new(Command::Disconnect).with_header(RECEIPT_HEADER, DISCONNECT_RECEIPT),
    )?;
    if !transport.can_read(Some(RECEIPT_TIMEOUT))? {
        return Err(ProducerError::NoReceipt(RECEIPT_TIMEOUT));
    }
    let receipt = transport.receive()?;
    if receipt.command() != Command::Receipt
        || receipt.header(RECEIPT_ID_HEADER) != Some(DISCONNECT_RECEIPT)
    {
        return Err(ProducerError::Unexpected(receipt.command()));
    }

    transport.release();
    info!("disconnected");
    Ok(())
}

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("STOMP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = ProducerConfig::from_env().and_then(|config| {
        info!(host = %config.host, port = config.port, "connecting");
        run(&config)
    });
    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
