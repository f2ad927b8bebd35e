//! Recording adapter for the `ImageGenerator` port.

use std::sync::{Arc, Mutex};

use super::record_result;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_generator::{GenerateFuture, GenerationRequest, ImageGenerator};

/// Records every call while delegating to an inner generator.
pub struct RecordingImageGenerator {
    inner: Box<dyn ImageGenerator>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageGenerator {
    /// Wrap `inner`, writing calls into `recorder`.
    pub fn new(inner: Box<dyn ImageGenerator>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageGenerator for RecordingImageGenerator {
    fn generate(&self, request: &GenerationRequest) -> GenerateFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let result = self.inner.generate(&request).await;
            record_result(&self.recorder, "image_generator", "generate", &request, &result);
            result
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;
    use crate::model::Engine;
    use crate::ports::ImagePayload;

    /// Succeeds on odd calls, fails with a transport error on even ones.
    struct Alternating {
        calls: Mutex<u32>,
    }

    impl ImageGenerator for Alternating {
        fn generate(&self, _request: &GenerationRequest) -> GenerateFuture<'_> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            let result = if *calls % 2 == 1 {
                Ok(ImagePayload { data: vec![7], source: "local file, seed=none".into() })
            } else {
                Err(ImageError::Transport { status: 503, message: "busy".into() })
            };
            Box::pin(async move { result })
        }
    }

    #[tokio::test]
    async fn captures_successes_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.cassette.yaml");
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(&path, "rec", "abc")));
        let generator = RecordingImageGenerator::new(
            Box::new(Alternating { calls: Mutex::new(0) }),
            Arc::clone(&recorder),
        );
        let request = GenerationRequest {
            engine: Engine::Stable,
            prompt: "a cat".into(),
            count: 2,
            aspect_ratio: "1:1".into(),
            negative_prompt: None,
            seed: None,
        };

        assert!(generator.generate(&request).await.is_ok());
        assert!(generator.generate(&request).await.unwrap_err().is_skippable());
        drop(generator);

        let recorder = Arc::try_unwrap(recorder).unwrap().into_inner().unwrap();
        assert_eq!(recorder.len(), 2);
        recorder.finish().unwrap();

        let yaml = std::fs::read_to_string(&path).unwrap();
        assert!(yaml.contains("kind: transport"));
        assert!(yaml.contains("prompt: a cat"));
    }
}
