//! `handoff send` – deliver a parsed fragment to the collector.

use anyhow::{bail, Result};
use std::time::Duration;

use handoff_core::config::HandoffConfig;
use handoff_core::fragment::{parse_fragment, parse_url_fragment};
use handoff_core::submit::hand_off;

pub fn run_send(
    cfg: &HandoffConfig,
    fragment: Option<&str>,
    from_url: Option<&str>,
    endpoint: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<()> {
    let params = match (fragment, from_url) {
        (Some(f), None) => parse_fragment(f),
        (None, Some(u)) => parse_url_fragment(u)?,
        _ => bail!("pass a fragment or --from-url"),
    };

    let endpoint = endpoint.unwrap_or(&cfg.endpoint);
    let mut limits = cfg.delivery_limits();
    if let Some(secs) = timeout_secs {
        limits.total_timeout = Some(Duration::from_secs(secs));
    }

    tracing::info!("delivering {} keys to {}", params.len(), endpoint);
    let outcome = hand_off(endpoint, &params, limits);
    println!("{}", outcome.message());
    Ok(())
}
