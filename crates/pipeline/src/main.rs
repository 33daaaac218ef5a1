//! Crime Stream Pipeline - Main Entry Point
//!
//! Usage:
//!   crime-stream [--config pipeline.json] [--stdin | host port]
//!
//! Connects to a line-oriented JSON source (or reads stdin), groups records
//! into timed micro-batches, and trains the incremental classifier on each.

use anyhow::{bail, Context, Result};
use pipeline::{init_logging, read_lines, BatchDispatcher, MicroBatcher, PipelineConfig};
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::time::Duration;
use tracing::info;

struct CliArgs {
    config_path: Option<String>,
    use_stdin: bool,
    host: Option<String>,
    port: Option<u16>,
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut parsed = CliArgs {
        config_path: None,
        use_stdin: false,
        host: None,
        port: None,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config_path = Some(args.next().context("--config requires a path")?);
            }
            "--stdin" => parsed.use_stdin = true,
            other if parsed.host.is_none() => parsed.host = Some(other.to_string()),
            other if parsed.port.is_none() => {
                parsed.port = Some(other.parse().context("port must be a number")?);
            }
            other => bail!("unexpected argument: {other}"),
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    info!("=== Crime Stream Pipeline v{} ===", env!("CARGO_PKG_VERSION"));

    let args = parse_args()?;
    let mut config = match &args.config_path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => PipelineConfig::default(),
    };
    if let Some(host) = args.host {
        config.ingest.host = host;
    }
    if let Some(port) = args.port {
        config.ingest.port = port;
    }

    let schema = config.schema.clone();
    let interval = Duration::from_secs(config.ingest.batch_interval_secs);
    let (sender, batcher) = MicroBatcher::channel(config.ingest.channel_capacity, interval);
    let mut dispatcher = BatchDispatcher::new(config.train.clone());

    // Stream failures come back through the channel as a terminal event,
    // so run() below surfaces them as its own error.
    let reader_handle = if args.use_stdin {
        info!("reading records from stdin");
        tokio::spawn(async move {
            let reader = BufReader::new(tokio::io::stdin());
            read_lines(reader, &schema, sender).await;
        })
    } else {
        let addr = format!("{}:{}", config.ingest.host, config.ingest.port);
        info!("connecting to record source at {addr}");
        let stream = TcpStream::connect(&addr)
            .await
            .with_context(|| format!("failed to connect to {addr}"))?;
        tokio::spawn(async move {
            let reader = BufReader::new(stream);
            read_lines(reader, &schema, sender).await;
        })
    };

    batcher.run(&mut dispatcher).await?;
    reader_handle.await?;

    info!(
        classes_known = dispatcher.global().n_classes(),
        samples_seen = dispatcher.global().samples_seen(),
        "pipeline finished"
    );
    Ok(())
}
