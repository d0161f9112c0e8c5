use std::io::Write;

use serde::Serialize;
use serde::ser::{SerializeSeq, Serializer};

use crate::model::score::RatingEstimate;
use crate::pipeline::summary::DatasetSummary;
use crate::pipeline::view::DisplayPayload;

pub fn render_payload_json(payload: &DisplayPayload) -> serde_json::Result<String> {
    serde_json::to_string_pretty(payload)
}

/// Streams `count` payloads into one JSON array, serializing each as soon as
/// `next` produces it.
pub fn write_payloads_json<W, F, E>(out: &mut W, count: u32, mut next: F) -> Result<(), E>
where
    W: Write,
    F: FnMut(u32) -> Result<DisplayPayload, E>,
    E: From<serde_json::Error>,
{
    let mut ser = serde_json::Serializer::pretty(out);
    let mut seq = ser.serialize_seq(None)?;
    for i in 0..count {
        seq.serialize_element(&next(i)?)?;
    }
    seq.end()?;
    Ok(())
}

pub fn render_estimate_json(estimate: &RatingEstimate) -> serde_json::Result<String> {
    serde_json::to_string_pretty(estimate)
}

#[derive(Serialize)]
struct SummaryDocument<'a> {
    tool: &'static str,
    version: &'static str,
    #[serde(flatten)]
    summary: &'a DatasetSummary,
}

pub fn render_summary_json(summary: &DatasetSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&SummaryDocument {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        summary,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/json.rs"]
mod tests;
