use anyhow::{Context, Result};
use gyrocast_orientation::RawSample;
use std::time::Instant;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

/// One parsed line from the sample source.
#[derive(Debug, PartialEq)]
enum Command {
    Sample { alpha: f64, beta: f64, gamma: f64 },
    Sync(bool),
}

/// Parse one line of the slash-separated angle protocol.
///
/// Angle lines are `beta/gamma/alpha` in degrees (the order the phone
/// sends them); `sync` and `unsync` toggle calibration.
fn parse_line(line: &str) -> Result<Command> {
    let line = line.trim();
    match line {
        "sync" => return Ok(Command::Sync(true)),
        "unsync" => return Ok(Command::Sync(false)),
        _ => {}
    }

    let mut parts = line.splitn(3, '/');
    let mut angle = |name: &str| -> Result<f64> {
        let raw = parts
            .next()
            .with_context(|| format!("missing {name} field"))?;
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("bad {name} value {raw:?}"))
    };

    let beta = angle("beta")?;
    let gamma = angle("gamma")?;
    let alpha = angle("alpha")?;

    Ok(Command::Sample {
        alpha: alpha.to_radians(),
        beta: beta.to_radians(),
        gamma: gamma.to_radians(),
    })
}

/// Read the angle protocol from stdin until EOF, feeding samples and
/// sync toggles into the pipeline.
///
/// A malformed line is logged and discarded; it never stops the
/// pipeline. `ts_delta` is stamped from the wall-clock gap between
/// consecutive angle lines.
pub async fn run_stdin_source(
    samples: mpsc::Sender<RawSample>,
    sync: mpsc::Sender<bool>,
) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut prev: Option<Instant> = None;

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(&line) {
            Ok(Command::Sync(on)) => {
                sync.send(on).await.context("orientation pipeline gone")?;
            }
            Ok(Command::Sample { alpha, beta, gamma }) => {
                let now = Instant::now();
                let ts_delta = prev
                    .map(|p| now.duration_since(p).as_millis() as u64)
                    .unwrap_or(0);
                prev = Some(now);

                samples
                    .send(RawSample {
                        alpha,
                        beta,
                        gamma,
                        ts_delta,
                    })
                    .await
                    .context("orientation pipeline gone")?;
            }
            Err(e) => {
                tracing::warn!(error = %e, line, "Discarding malformed sample line");
            }
        }
    }

    Ok(())
}
