//! `handoff listen` – one-shot collector for the hand-off page POST.

use anyhow::Result;
use serde_json::Value;

use handoff_core::config::HandoffConfig;
use handoff_core::receiver::{verify_payload, Collector};

pub fn run_listen(cfg: &HandoffConfig, port: Option<u16>, expect_keys: &[String]) -> Result<()> {
    let port = port.unwrap_or(cfg.listen_port);
    let collector = Collector::bind(port)?;
    println!("Waiting for hand-off at {}", collector.endpoint()?);

    let payload = collector.collect()?;
    if !expect_keys.is_empty() {
        verify_payload(&payload, expect_keys)?;
    }

    // The payload goes to stdout so the invoking process can consume it.
    println!("{}", serde_json::to_string_pretty(&Value::Object(payload))?);
    Ok(())
}
