//! Recording adapters that capture interactions to cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use tracing::warn;

use crate::cassette::format::RecordedError;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::ImageError;

/// Record a call using the `{Ok: value}` / `{Err: recorded error}` convention.
pub(crate) fn record_result<T, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, ImageError>,
) where
    T: Serialize,
    I: Serialize,
{
    let output = match result {
        Ok(v) => serde_json::to_value(v).map(|inner| serde_json::json!({ "Ok": inner })),
        Err(e) => serde_json::to_value(RecordedError::from(e))
            .map(|inner| serde_json::json!({ "Err": inner })),
    };
    let input = serde_json::to_value(input);

    match (input, output) {
        (Ok(input), Ok(output)) => {
            let mut guard = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            guard.record(port, method, input, output);
        }
        (Err(e), _) | (_, Err(e)) => warn!("Not recording {port}::{method}: {e}"),
    }
}
