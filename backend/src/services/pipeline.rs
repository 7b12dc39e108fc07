//! Coverage-to-recommendation pipeline
//!
//! Stage order:
//! 1. caption the map image with the coverage prompt
//! 2. extract the fenced coverage JSON
//! 3. validate the coverage record
//! 4. fetch current weather for the city
//! 5. resolve the season
//! 6. generate recommendations from the assembled prompt
//! 7. parse recommendations and assemble the report
//!
//! Validation runs before the weather and generation calls so a bad
//! coverage estimate never costs further paid API requests. Every failure
//! is returned as a tagged [`PipelineResult::Error`] carrying what was
//! already computed.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shared::{
    extract_coverage, parse_recommendations, resolve_season, validate_coverage, FinalReport,
    LocationContext, PartialContext, PipelineResult, PipelineStage,
};

use super::prompts::{recommendation_prompt, COVERAGE_PROMPT};
use crate::external::{MapProvider, TextGenerator, VisionCaptioner, WeatherProvider};

/// Runs the analysis stages for one location
#[derive(Clone)]
pub struct AnalysisPipeline {
    captioner: Arc<dyn VisionCaptioner>,
    weather: Arc<dyn WeatherProvider>,
    generator: Arc<dyn TextGenerator>,
}

/// A single location analysis request
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub location: LocationContext,
    pub zoom: u8,
}

impl AnalysisPipeline {
    pub fn new(
        captioner: Arc<dyn VisionCaptioner>,
        weather: Arc<dyn WeatherProvider>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            captioner,
            weather,
            generator,
        }
    }

    /// Analyse an already stored map image
    pub async fn run(
        &self,
        map_image: &Path,
        location: &LocationContext,
    ) -> PipelineResult<FinalReport> {
        let mut context = PartialContext::with_file_path(map_image.display().to_string());

        tracing::info!("Estimating land coverage from {}", map_image.display());
        let caption = match self.captioner.caption(map_image, COVERAGE_PROMPT).await {
            Ok(text) => text,
            Err(e) => return fail(PipelineStage::Captioning, e, context),
        };

        let coverage = match extract_coverage(&caption) {
            Ok(coverage) => coverage,
            Err(e) => {
                tracing::debug!("Caption without usable coverage JSON: {:?}", caption);
                return fail(PipelineStage::CoverageExtraction, e, context);
            }
        };
        context.land_coverage = Some(coverage);

        if let Err(e) = validate_coverage(&coverage) {
            return fail(PipelineStage::Validation, e, context);
        }

        tracing::info!("Fetching weather for {}", location.city);
        let weather = match self.weather.current(&location.city).await {
            Ok(weather) => weather,
            Err(e) => return fail(PipelineStage::WeatherFetch, e, context),
        };
        context.weather_data = Some(weather.clone());

        let season = resolve_season(
            &weather.local_time,
            &weather.timezone,
            location.latitude,
            &location.country,
        );
        tracing::info!(
            "Season for {}, {}: {} (growing: {})",
            location.city,
            location.country,
            season.season,
            season.is_growing_season
        );

        let prompt = recommendation_prompt(location, &weather, &coverage, &season);
        let text = match self.generator.generate(&prompt).await {
            Ok(text) => text,
            Err(e) => return fail(PipelineStage::RecommendationGeneration, e, context),
        };

        let parsed = parse_recommendations(&text);
        if let Some(diagnostic) = &parsed.parse_error {
            tracing::warn!("Recommendation parsing recovered nothing: {}", diagnostic);
        }

        PipelineResult::Success(FinalReport {
            recommendations: parsed.recommendations,
            parse_error: parsed.parse_error,
            weather_data: weather,
            land_coverage: coverage,
            season,
            location: location.clone(),
        })
    }
}

/// Report for a location together with its stored map image
#[derive(Debug, Clone)]
pub struct LocationAnalysis {
    pub file_path: PathBuf,
    pub report: FinalReport,
}

/// Acquire the map image, then run the pipeline on it
pub async fn analyze_location(
    maps: &dyn MapProvider,
    pipeline: &AnalysisPipeline,
    request: &AnalysisRequest,
) -> PipelineResult<LocationAnalysis> {
    let location = &request.location;
    let stored = match maps
        .fetch_map(location.latitude, location.longitude, request.zoom)
        .await
    {
        Ok(stored) => stored,
        Err(e) => return fail(PipelineStage::MapAcquisition, e, PartialContext::default()),
    };

    pipeline
        .run(&stored.file_path, location)
        .await
        .map(|report| LocationAnalysis {
            file_path: stored.file_path,
            report,
        })
}

fn fail<T>(
    stage: PipelineStage,
    error: impl std::fmt::Display,
    context: PartialContext,
) -> PipelineResult<T> {
    tracing::warn!("Pipeline stage {} failed: {}", stage, error);
    PipelineResult::error(stage, error.to_string(), context)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use shared::{LandCoverageRecord, Season, WeatherSnapshot};

    use super::*;
    use crate::external::{CollaboratorError, CollaboratorResult, StoredMap};

    const COVERAGE_100: &str = "```json\n{\"plant_coverage\": 35.0, \"building_coverage\": 40.0, \"road_coverage\": 15.0, \"empty_land\": 10.0, \"water_body\": 2.0}\n```";
    const COVERAGE_80: &str = "```json\n{\"plant_coverage\": 30.0, \"building_coverage\": 30.0, \"road_coverage\": 10.0, \"empty_land\": 10.0, \"water_body\": 20.0}\n```";
    const TWO_PLANTS: &str = "Plant: Neem\nReason: Tolerates heat and heavy rain\nCare: Water weekly\n\nPlant: Tulsi\nReason: Thrives in monsoon humidity\nCare: Pinch flowers to keep it bushy\n";

    struct FakeCaptioner(CollaboratorResult<String>);

    #[async_trait]
    impl VisionCaptioner for FakeCaptioner {
        async fn caption(&self, _image_path: &Path, _prompt: &str) -> CollaboratorResult<String> {
            match &self.0 {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(CollaboratorError::Upstream {
                    service: "fake",
                    detail: e.to_string(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct FakeWeather {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl WeatherProvider for FakeWeather {
        async fn current(&self, _city: &str) -> CollaboratorResult<WeatherSnapshot> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CollaboratorError::Upstream {
                    service: "fake weather",
                    detail: "503".to_string(),
                });
            }
            Ok(lucknow_july())
        }
    }

    struct FakeGenerator {
        calls: AtomicUsize,
        reply: CollaboratorResult<String>,
    }

    impl FakeGenerator {
        fn replying(text: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Ok(text.to_string()),
            }
        }

        fn missing_key() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                reply: Err(CollaboratorError::missing_key("text_generation.api_key")),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> CollaboratorResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.contains("Lucknow"));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(CollaboratorError::Configuration(e.to_string())),
            }
        }
    }

    struct FakeMaps(bool);

    #[async_trait]
    impl MapProvider for FakeMaps {
        async fn fetch_map(
            &self,
            _lat: f64,
            _lon: f64,
            _zoom: u8,
        ) -> CollaboratorResult<StoredMap> {
            if self.0 {
                Ok(StoredMap {
                    file_path: PathBuf::from("static_maps/map_test.png"),
                })
            } else {
                Err(CollaboratorError::Upstream {
                    service: "fake maps",
                    detail: "403 Forbidden".to_string(),
                })
            }
        }
    }

    fn lucknow_july() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: 32.0,
            feels_like: 39.0,
            humidity: 80.0,
            pressure: 1000.0,
            wind_speed: 3.5,
            precipitation: 8.0,
            uv_index: 7.0,
            visibility: 6.0,
            weather_description: "Light rain".to_string(),
            local_time: "2024-07-15 10:00".to_string(),
            timezone: "Asia/Kolkata".to_string(),
        }
    }

    fn lucknow() -> LocationContext {
        LocationContext {
            city: "Lucknow".to_string(),
            country: "India".to_string(),
            latitude: 26.8467,
            longitude: 80.9462,
        }
    }

    struct Harness {
        weather: Arc<FakeWeather>,
        generator: Arc<FakeGenerator>,
        pipeline: AnalysisPipeline,
    }

    fn harness(
        caption: CollaboratorResult<String>,
        weather: FakeWeather,
        generator: FakeGenerator,
    ) -> Harness {
        let weather = Arc::new(weather);
        let generator = Arc::new(generator);
        let pipeline = AnalysisPipeline::new(
            Arc::new(FakeCaptioner(caption)),
            weather.clone(),
            generator.clone(),
        );
        Harness {
            weather,
            generator,
            pipeline,
        }
    }

    fn map() -> &'static Path {
        Path::new("static_maps/map_test.png")
    }

    #[tokio::test]
    async fn test_end_to_end_success() {
        let h = harness(
            Ok(format!("Estimate:\n{}", COVERAGE_100)),
            FakeWeather::default(),
            FakeGenerator::replying(TWO_PLANTS),
        );

        let result = h.pipeline.run(map(), &lucknow()).await;
        let report = tokio_test::assert_ok!(result.success().ok_or("expected success"));

        assert_eq!(report.recommendations.len(), 2);
        assert_eq!(report.recommendations[0].name, "Neem");
        assert_eq!(report.season.season, Season::Rainy);
        assert!(report.season.is_growing_season);
        assert_eq!(
            report.land_coverage,
            LandCoverageRecord::new(35.0, 40.0, 15.0, 10.0, 2.0)
        );
        assert_eq!(report.location.city, "Lucknow");
        assert!(report.parse_error.is_none());
    }

    #[tokio::test]
    async fn test_captioning_failure() {
        let h = harness(
            Err(CollaboratorError::Configuration("vision.api_key is not set".into())),
            FakeWeather::default(),
            FakeGenerator::replying(TWO_PLANTS),
        );

        match h.pipeline.run(map(), &lucknow()).await {
            PipelineResult::Error { stage, context, .. } => {
                assert_eq!(stage, PipelineStage::Captioning);
                assert_eq!(context.file_path.as_deref(), Some("static_maps/map_test.png"));
                assert!(context.land_coverage.is_none());
            }
            other => panic!("Expected captioning error, got {:?}", other),
        }
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_caption_without_json() {
        let h = harness(
            Ok("The image shows a dense city block.".to_string()),
            FakeWeather::default(),
            FakeGenerator::replying(TWO_PLANTS),
        );

        let result = h.pipeline.run(map(), &lucknow()).await;
        assert_eq!(result.stage(), Some(PipelineStage::CoverageExtraction));
    }

    #[tokio::test]
    async fn test_validation_short_circuits_paid_calls() {
        let h = harness(
            Ok(COVERAGE_80.to_string()),
            FakeWeather::default(),
            FakeGenerator::replying(TWO_PLANTS),
        );

        match h.pipeline.run(map(), &lucknow()).await {
            PipelineResult::Error {
                stage,
                message,
                context,
            } => {
                assert_eq!(stage, PipelineStage::Validation);
                assert!(message.contains("do not sum to 100±1"));
                assert!(context.land_coverage.is_some());
                assert!(context.file_path.is_some());
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_weather_failure() {
        let h = harness(
            Ok(COVERAGE_100.to_string()),
            FakeWeather {
                fail: true,
                ..FakeWeather::default()
            },
            FakeGenerator::replying(TWO_PLANTS),
        );

        let result = h.pipeline.run(map(), &lucknow()).await;
        assert_eq!(result.stage(), Some(PipelineStage::WeatherFetch));
        assert_eq!(h.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_keeps_weather() {
        let h = harness(
            Ok(COVERAGE_100.to_string()),
            FakeWeather::default(),
            FakeGenerator::missing_key(),
        );

        match h.pipeline.run(map(), &lucknow()).await {
            PipelineResult::Error { stage, context, .. } => {
                assert_eq!(stage, PipelineStage::RecommendationGeneration);
                assert_eq!(context.weather_data, Some(lucknow_july()));
            }
            other => panic!("Expected generation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_recommendations_still_succeed() {
        let h = harness(
            Ok(COVERAGE_100.to_string()),
            FakeWeather::default(),
            FakeGenerator::replying("Sorry, I can only suggest consulting a local nursery."),
        );

        let result = h.pipeline.run(map(), &lucknow()).await;
        assert!(result.is_success());
        let report = result.success().unwrap();
        assert!(report.recommendations.is_empty());
        assert!(report.parse_error.is_some());
    }

    #[tokio::test]
    async fn test_analyze_location_map_failure() {
        let h = harness(
            Ok(COVERAGE_100.to_string()),
            FakeWeather::default(),
            FakeGenerator::replying(TWO_PLANTS),
        );
        let request = AnalysisRequest {
            location: lucknow(),
            zoom: 18,
        };

        match analyze_location(&FakeMaps(false), &h.pipeline, &request).await {
            PipelineResult::Error { stage, context, .. } => {
                assert_eq!(stage, PipelineStage::MapAcquisition);
                assert!(context.file_path.is_none());
            }
            other => panic!("Expected map error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_analyze_location_success() {
        let h = harness(
            Ok(COVERAGE_100.to_string()),
            FakeWeather::default(),
            FakeGenerator::replying(TWO_PLANTS),
        );
        let request = AnalysisRequest {
            location: lucknow(),
            zoom: 18,
        };

        let analysis = analyze_location(&FakeMaps(true), &h.pipeline, &request)
            .await
            .success()
            .unwrap();
        assert_eq!(analysis.file_path, PathBuf::from("static_maps/map_test.png"));
        assert_eq!(analysis.report.recommendations.len(), 2);
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 1);
    }
}
