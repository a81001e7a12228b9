//! Operator console task
//!
//! Line-based text console on UART0. Accepts the vacuum commands plus
//! `QUERY_VACUUM` and `HELP`, answering each line with `ok` or an
//! `!! <reason>` error line.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::{BufferedUartRx, BufferedUartTx};
use embedded_io_async::{Read, Write};
use heapless::{String, Vec};

use vacuum_core::{Command, CommandError};

use crate::channels::{zone_status, COMMAND_CHANNEL};

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 32;

/// Longest accepted command line
const LINE_LEN: usize = 64;

/// Status request handled by the console itself
const QUERY: &str = "QUERY_VACUUM";

/// Help request handled by the console itself
const HELP: &str = "HELP";

/// Console task - reads lines and dispatches commands
#[embassy_executor::task]
pub async fn console_task(mut rx: BufferedUartRx, mut tx: BufferedUartTx) {
    info!("Console task started");

    let mut buf = [0u8; RX_BUF_SIZE];
    let mut line: Vec<u8, LINE_LEN> = Vec::new();
    let mut overflow = false;

    loop {
        let n = match rx.read(&mut buf).await {
            Ok(n) => n,
            Err(e) => {
                warn!("UART read error: {:?}", e);
                continue;
            }
        };

        for &byte in &buf[..n] {
            match byte {
                b'\r' | b'\n' => {
                    if overflow {
                        reply(&mut tx, "!! line too long").await;
                    } else if !line.is_empty() {
                        match core::str::from_utf8(&line) {
                            Ok(text) => handle_line(&mut tx, text).await,
                            Err(_) => reply(&mut tx, "!! invalid text").await,
                        }
                    }
                    line.clear();
                    overflow = false;
                }
                _ => {
                    if line.push(byte).is_err() {
                        overflow = true;
                    }
                }
            }
        }
    }
}

/// Handle one complete line
async fn handle_line(tx: &mut BufferedUartTx, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }

    if text.eq_ignore_ascii_case(QUERY) {
        send_status(tx).await;
        reply(tx, "ok").await;
        return;
    }

    if text.eq_ignore_ascii_case(HELP) {
        send_help(tx).await;
        reply(tx, "ok").await;
        return;
    }

    match Command::parse(text) {
        Ok(command) => {
            debug!("Console command: {}", command.name());
            COMMAND_CHANNEL.send(command).await;
            reply(tx, "ok").await;
        }
        Err(e) => {
            debug!("Rejected console line: {:?}", e);
            reply(tx, error_text(e)).await;
        }
    }
}

fn error_text(e: CommandError) -> &'static str {
    match e {
        CommandError::Empty => "!! empty command",
        CommandError::Unknown => "!! unknown command",
        CommandError::UnexpectedArguments => "!! command takes no parameters",
    }
}

/// Report the latest zone status
async fn send_status(tx: &mut BufferedUartTx) {
    let Some(status) = zone_status() else {
        reply(tx, "controller not started").await;
        return;
    };

    let mut out: String<128> = String::new();
    let mut written = write!(
        out,
        "pressure={:.2} absolute={:.2} activated={} running={}",
        status.pressure, status.absolute_pressure, status.activated, status.running
    );
    // Raw normalized ADC sample behind the pressure reading
    written = written.and_then(|()| match (status.raw_sample, status.sampled_at_ms) {
        (Some(value), Some(at_ms)) => write!(out, " adc={:.4} sampled_at={}", value, at_ms),
        _ => write!(out, " adc=none"),
    });
    if written.is_err() {
        warn!("Status line truncated");
    }
    reply(tx, out.as_str()).await;
}

/// List the vacuum commands
async fn send_help(tx: &mut BufferedUartTx) {
    for command in Command::ALL {
        let mut out: String<64> = String::new();
        if write!(out, "{}: {}", command.name(), command.help()).is_ok() {
            reply(tx, out.as_str()).await;
        }
    }
    reply(tx, "QUERY_VACUUM: Report vacuum pressure, raw sample and state").await;
}

/// Send one response line
async fn reply(tx: &mut BufferedUartTx, text: &str) {
    if let Err(e) = write_line(tx, text).await {
        warn!("Failed to send console reply: {:?}", e);
    }
}

async fn write_line(
    tx: &mut BufferedUartTx,
    text: &str,
) -> Result<(), embassy_rp::uart::Error> {
    tx.write_all(text.as_bytes()).await?;
    tx.write_all(b"\r\n").await
}
