//! Replaying adapters that serve recorded interactions from cassettes.

pub mod image_generator;

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;

use crate::cassette::format::RecordedError;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::ImageError;

/// Retrieve the next recorded output for a given port and method.
///
/// # Panics
///
/// Panics if the cassette has no more interactions for the pair.
pub(crate) fn next_output(
    replayer: &Arc<Mutex<CassetteReplayer>>,
    port: &str,
    method: &str,
) -> serde_json::Value {
    let mut guard = replayer.lock().unwrap_or_else(PoisonError::into_inner);
    guard.next_interaction(port, method).output
}

/// Turn a recorded output back into the result the live adapter returned.
pub(crate) fn replay_result<T: DeserializeOwned>(
    output: serde_json::Value,
) -> Result<T, ImageError> {
    if let Some(err) = output.get("Err").or_else(|| output.get("err")) {
        let recorded: RecordedError = serde_json::from_value(err.clone())
            .map_err(|e| ImageError::Replay(format!("Malformed recorded error: {e}")))?;
        return Err(recorded.into());
    }
    let ok = output.get("Ok").or_else(|| output.get("ok")).cloned().unwrap_or(output);
    serde_json::from_value(ok)
        .map_err(|e| ImageError::Replay(format!("Malformed recorded output: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::ImagePayload;
    use serde_json::json;

    #[test]
    fn ok_output_deserializes() {
        let payload: ImagePayload =
            replay_result(json!({"Ok": {"data": "AQID", "source": "u"}})).unwrap();
        assert_eq!(payload.data, vec![1, 2, 3]);
    }

    #[test]
    fn structured_error_keeps_kind() {
        let err = replay_result::<ImagePayload>(
            json!({"Err": {"kind": "rejected", "status": 400, "message": "no"}}),
        )
        .unwrap_err();
        assert!(matches!(err, ImageError::Rejected { status: 400, .. }));
    }

    #[test]
    fn unstructured_error_is_malformed() {
        let err = replay_result::<ImagePayload>(json!({"Err": "boom"})).unwrap_err();
        assert!(
            matches!(err, ImageError::Replay(ref m) if m.starts_with("Malformed recorded error"))
        );
    }

    #[test]
    fn malformed_ok_is_reported() {
        let err = replay_result::<ImagePayload>(json!({"Ok": {"nope": 1}})).unwrap_err();
        assert!(matches!(err, ImageError::Replay(_)));
    }
}
