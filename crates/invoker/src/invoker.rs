use crate::{
    config::{ConfigError, EngineConfig, InvokerConfig},
    engine::OcrEngine,
    engines::{MockEngine, ProcessEngine, RemoteEngine},
    error::OcrError,
    image::ImageData,
};
use log::{info, warn};
use models::{
    recognition::{OcrMode, Recognition},
    vin,
};
use std::{sync::Arc, time::Duration};
use tokio::time::{Instant, timeout_at};

/// Calls the configured OCR engine under a deadline and normalizes its output.
///
/// Cloning is cheap; every clone shares the same engine.
#[derive(Clone)]
pub struct Invoker {
    engine: Arc<dyn OcrEngine>,
    fallback: Option<Arc<dyn OcrEngine>>,
    timeout: Duration,
    vin_filter: bool,
}

impl Invoker {
    pub fn new(engine: Arc<dyn OcrEngine>, timeout: Duration) -> Self {
        Self {
            engine,
            fallback: None,
            timeout,
            vin_filter: true,
        }
    }

    /// Engine to answer from when the primary one reports [`OcrError::Unavailable`]
    pub fn with_fallback(mut self, fallback: Arc<dyn OcrEngine>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn with_vin_filter(mut self, enabled: bool) -> Self {
        self.vin_filter = enabled;
        self
    }

    /// Builds the engine described by `config`
    pub fn from_config(config: &InvokerConfig) -> Result<Self, ConfigError> {
        let engine: Arc<dyn OcrEngine> = match &config.engine {
            EngineConfig::Test => Arc::new(MockEngine),
            EngineConfig::Process { program, args } => {
                Arc::new(ProcessEngine::new(program.clone(), args.clone()))
            }
            EngineConfig::Remote { url } => {
                let engine = RemoteEngine::new(url.clone(), config.timeout).map_err(|e| {
                    ConfigError::Invalid {
                        key: "OCR_URL",
                        value: url.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Arc::new(engine)
            }
        };

        let mut invoker = Self::new(engine, config.timeout).with_vin_filter(config.vin_filter);
        if config.fallback {
            invoker = invoker.with_fallback(Arc::new(MockEngine));
        }

        Ok(invoker)
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Recognizes text in `image`.
    ///
    /// The whole call, fallback included, finishes within the configured
    /// timeout. Nothing is retried.
    pub async fn recognize(&self, image: &ImageData) -> Result<Recognition, OcrError> {
        let deadline = Instant::now() + self.timeout;

        let primary = self.run(self.engine.as_ref(), image, deadline).await;
        let (engine, texts): (&dyn OcrEngine, Vec<String>) = match primary {
            Ok(texts) => (self.engine.as_ref(), texts),
            Err(OcrError::Unavailable(reason)) => match &self.fallback {
                Some(fallback) => {
                    warn!(
                        "OCR engine `{}` unavailable ({reason}), falling back to `{}`",
                        self.engine.name(),
                        fallback.name()
                    );
                    let texts = self.run(fallback.as_ref(), image, deadline).await?;
                    (fallback.as_ref(), texts)
                }
                None => return Err(OcrError::Unavailable(reason)),
            },
            Err(e) => return Err(e),
        };

        let mode = engine.mode();
        let texts = if self.vin_filter && mode == OcrMode::Production {
            vin::filter_candidates(texts)
        } else {
            texts
        };

        info!(
            "OCR via `{}` recognized {} text(s) ({mode})",
            engine.name(),
            texts.len()
        );

        Ok(Recognition::new(texts, mode))
    }

    /// Runs one engine, abandoning it at `deadline`
    async fn run(
        &self,
        engine: &dyn OcrEngine,
        image: &ImageData,
        deadline: Instant,
    ) -> Result<Vec<String>, OcrError> {
        timeout_at(deadline, engine.recognize(image))
            .await
            .map_err(|_| OcrError::Timeout(self.timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Instant as StdInstant;

    /// Production engine answering with canned texts
    struct StaticEngine(Vec<&'static str>);

    #[async_trait]
    impl OcrEngine for StaticEngine {
        fn name(&self) -> &'static str {
            "static"
        }

        fn mode(&self) -> OcrMode {
            OcrMode::Production
        }

        async fn recognize(&self, _image: &ImageData) -> Result<Vec<String>, OcrError> {
            Ok(self.0.iter().map(|s| s.to_string()).collect())
        }
    }

    /// Engine that never answers in time
    struct SlowEngine;

    #[async_trait]
    impl OcrEngine for SlowEngine {
        fn name(&self) -> &'static str {
            "slow"
        }

        fn mode(&self) -> OcrMode {
            OcrMode::Production
        }

        async fn recognize(&self, _image: &ImageData) -> Result<Vec<String>, OcrError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(Vec::new())
        }
    }

    /// Engine whose capability is not installed
    struct MissingEngine;

    #[async_trait]
    impl OcrEngine for MissingEngine {
        fn name(&self) -> &'static str {
            "missing"
        }

        fn mode(&self) -> OcrMode {
            OcrMode::Production
        }

        async fn recognize(&self, _image: &ImageData) -> Result<Vec<String>, OcrError> {
            Err(OcrError::Unavailable("not installed".to_string()))
        }
    }

    fn image() -> ImageData {
        ImageData::new(b"hello".to_vec())
    }

    #[tokio::test]
    async fn test_mock_output_is_not_filtered() {
        let invoker = Invoker::from_config(&InvokerConfig::default()).unwrap();
        let recognition = invoker.recognize(&image()).await.unwrap();

        assert_eq!(recognition.mode, OcrMode::Test);
        assert_eq!(
            recognition.texts,
            vec!["1HGBH41JXMN109186", "WBAFR9C50CC123456"]
        );
    }

    #[tokio::test]
    async fn test_production_output_is_filtered() {
        let engine = StaticEngine(vec!["noise", "WBA12345678", "1hgbh41jxmn1o9186"]);
        let invoker = Invoker::new(Arc::new(engine), Duration::from_secs(1));

        let recognition = invoker.recognize(&image()).await.unwrap();
        assert_eq!(recognition.mode, OcrMode::Production);
        assert_eq!(recognition.texts, vec!["1HGBH41JXMN109186", "WBA12345678"]);
    }

    #[tokio::test]
    async fn test_filter_can_be_disabled() {
        let engine = StaticEngine(vec!["noise", "WBA12345678"]);
        let invoker =
            Invoker::new(Arc::new(engine), Duration::from_secs(1)).with_vin_filter(false);

        let recognition = invoker.recognize(&image()).await.unwrap();
        assert_eq!(recognition.texts, vec!["noise", "WBA12345678"]);
    }

    #[tokio::test]
    async fn test_timeout_is_bounded() {
        let bound = Duration::from_millis(50);
        let invoker = Invoker::new(Arc::new(SlowEngine), bound);

        let started = StdInstant::now();
        let err = invoker.recognize(&image()).await.unwrap_err();

        assert!(matches!(err, OcrError::Timeout(d) if d == bound), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_unavailable_without_fallback() {
        let invoker = Invoker::new(Arc::new(MissingEngine), Duration::from_secs(1));
        let err = invoker.recognize(&image()).await.unwrap_err();
        assert!(matches!(err, OcrError::Unavailable(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_unavailable_with_fallback() {
        let invoker = Invoker::new(Arc::new(MissingEngine), Duration::from_secs(1))
            .with_fallback(Arc::new(MockEngine));

        let recognition = invoker.recognize(&image()).await.unwrap();
        assert_eq!(recognition.mode, OcrMode::Test);
        assert_eq!(recognition.texts.len(), 2);
    }

    #[test]
    fn test_from_config_selects_engine() {
        let config = InvokerConfig {
            engine: EngineConfig::Process {
                program: "ocr-vin".to_string(),
                args: Vec::new(),
            },
            ..InvokerConfig::default()
        };
        assert_eq!(Invoker::from_config(&config).unwrap().engine_name(), "process");

        let config = InvokerConfig {
            engine: EngineConfig::Remote {
                url: "http://localhost:8080/ocr/vin".to_string(),
            },
            timeout: Duration::from_secs(3),
            ..InvokerConfig::default()
        };
        let invoker = Invoker::from_config(&config).unwrap();
        assert_eq!(invoker.engine_name(), "remote");
        assert_eq!(invoker.timeout(), Duration::from_secs(3));
    }

    /// Fresh path in the temp dir that a script may create
    #[cfg(unix)]
    fn marker(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ocr-{name}-{}", std::process::id()));
        let _ = std::fs::remove_file(&path);
        path
    }

    /// Runs `script` under a short bound and checks `marker` never appears
    #[cfg(unix)]
    async fn assert_killed_on_timeout(script: String, marker: &std::path::Path) {
        let engine = ProcessEngine::new("sh", vec!["-c".to_string(), script]);
        let invoker = Invoker::new(Arc::new(engine), Duration::from_millis(200));

        let started = StdInstant::now();
        let err = invoker.recognize(&image()).await.unwrap_err();

        assert!(matches!(err, OcrError::Timeout(_)), "{err:?}");
        assert!(started.elapsed() < Duration::from_secs(1));

        // Outlast the script's own delay
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!marker.exists(), "{} was created", marker.display());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timed_out_process_is_killed() {
        let marker = marker("child");
        let script = format!("sleep 1; touch {}", marker.display());
        assert_killed_on_timeout(script, &marker).await;
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timed_out_process_group_is_killed() {
        let marker = marker("grandchild");
        let script = format!("(sleep 1; touch {}) & wait", marker.display());
        assert_killed_on_timeout(script, &marker).await;
    }
}
