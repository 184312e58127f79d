//! JSON delivery to the loopback collector.
//!
//! Uses the curl crate to POST the parsed fragment as one JSON object and
//! capture the response status. No retry; the caller maps the result onto
//! the success/failure message.

mod error;

pub use error::DeliveryError;

use std::time::Duration;

use crate::fragment::FragmentParams;
use crate::outcome::Outcome;

/// What came back from the collector.
#[derive(Debug, Clone)]
pub struct Delivery {
    /// HTTP status code of the response.
    pub status: u32,
    /// Raw response body (the collector usually sends none).
    pub body: Vec<u8>,
}

/// Timeouts applied to a delivery. `None` leaves curl's default of no limit,
/// matching the hand-off page, which never times out a submission.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryLimits {
    pub connect_timeout: Option<Duration>,
    pub total_timeout: Option<Duration>,
}

/// POSTs `params` as a JSON object to `endpoint`.
///
/// Sends `Accept: application/json` and `Content-Type: application/json`.
/// Returns the response status and body; any transport failure surfaces as
/// a [`DeliveryError`].
pub fn deliver(
    endpoint: &str,
    params: &FragmentParams,
    limits: DeliveryLimits,
) -> Result<Delivery, DeliveryError> {
    let body = serde_json::to_string(&params.to_json())?;
    tracing::debug!("delivering {} bytes to {}", body.len(), endpoint);

    let mut response_body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(endpoint)?;
    easy.post(true)?;
    easy.post_fields_copy(body.as_bytes())?;
    if let Some(t) = limits.connect_timeout {
        easy.connect_timeout(t)?;
    }
    if let Some(t) = limits.total_timeout {
        easy.timeout(t)?;
    }

    let mut list = curl::easy::List::new();
    list.append("Accept: application/json")?;
    list.append("Content-Type: application/json")?;
    easy.http_headers(list)?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            response_body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    tracing::debug!(
        "collector answered HTTP {} ({} body bytes)",
        status,
        response_body.len()
    );
    Ok(Delivery {
        status,
        body: response_body,
    })
}

/// The full hand-off: deliver once and fold the result into the user-visible
/// outcome. Transport failures become the generic failure outcome; the
/// detail is logged.
pub fn hand_off(endpoint: &str, params: &FragmentParams, limits: DeliveryLimits) -> Outcome {
    match deliver(endpoint, params, limits) {
        Ok(delivery) => Outcome::from_status(delivery.status),
        Err(e) => {
            tracing::warn!("delivery to {} failed: {}", endpoint, e);
            Outcome::TransportFailed
        }
    }
}
