//! Pipeline orchestration: normalize → aggregate → recommend → (export)

use super::error::PipelineError;
use super::session::{AnalysisSession, SessionId, SessionStore};
use super::telemetry::{Metadata, MetricsCollector, NoOpCollector, PipelineEvent};
use crate::aggregate::aggregate;
use crate::ingest::RecordNormalizer;
use crate::recommend::RecommendationEngine;
use crate::synth::{ConfigSynthesizer, SynthesizedConfig};
use std::sync::Arc;
use std::time::Instant;

/// Runs analyses and exports, keeping the latest result per session
///
/// # Examples
///
/// ```
/// use cost_optimizer::pipeline::{Pipeline, SessionId};
///
/// let pipeline = Pipeline::default();
/// let id = SessionId::generate();
/// let csv = "Service,Region,Cost,Date\nEC2,us-east-1,450,2025-09\nEC2,us-east-1,420,2025-08\n";
///
/// let session = pipeline.analyze(&id, csv)?;
/// assert_eq!(session.total_rows, 2);
/// assert!(pipeline.current(&id).is_some());
///
/// let config = pipeline.export_config(&session)?;
/// assert!(config.script.contains("Reserved Capacity"));
/// # Ok::<(), cost_optimizer::pipeline::PipelineError>(())
/// ```
pub struct Pipeline {
    normalizer: RecordNormalizer,
    engine: RecommendationEngine,
    synthesizer: ConfigSynthesizer,
    store: SessionStore,
    collector: Arc<dyn MetricsCollector>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(RecommendationEngine::default())
    }
}

impl Pipeline {
    /// Create a pipeline around an engine
    pub fn new(engine: RecommendationEngine) -> Self {
        Self {
            normalizer: RecordNormalizer::new(),
            engine,
            synthesizer: ConfigSynthesizer::new(),
            store: SessionStore::new(),
            collector: Arc::new(NoOpCollector),
        }
    }

    /// Replace the metrics collector
    pub fn with_collector(mut self, collector: Arc<dyn MetricsCollector>) -> Self {
        self.collector = collector;
        self
    }

    /// Engine used for recommendations
    pub fn engine(&self) -> &RecommendationEngine {
        &self.engine
    }

    /// Analyze an extract and make it the session's current result
    ///
    /// # Errors
    /// Schema and consistency failures abort the run and leave the session's
    /// previous result untouched. Malformed rows do not fail the run.
    pub fn analyze(&self, session_id: &SessionId, raw_text: &str) -> Result<Arc<AnalysisSession>, PipelineError> {
        self.collector
            .record_event(PipelineEvent::AnalysisStarted, session_metadata(session_id));
        let started = Instant::now();

        let result = self.store.commit_with(session_id, || self.run(session_id, raw_text));

        match &result {
            Ok(session) => {
                self.collector
                    .record_duration("analysis", started.elapsed());
                self.collector.record_count("rows", session.total_rows);
                self.collector
                    .record_count("recommendations", session.recommendations.len());

                let mut metadata = session_metadata(session_id);
                metadata.insert(
                    "recommendations".to_string(),
                    session.recommendations.len().to_string(),
                );
                self.collector
                    .record_event(PipelineEvent::AnalysisCompleted, metadata);

                log::info!(
                    "Session {} committed: {} of {} rows, {} recommendations",
                    session_id,
                    session.processed_rows(),
                    session.total_rows,
                    session.recommendations.len()
                );
            }
            Err(e) => {
                let mut metadata = session_metadata(session_id);
                metadata.insert("stage".to_string(), e.stage().to_string());
                metadata.insert("error".to_string(), e.to_string());
                self.collector
                    .record_event(PipelineEvent::AnalysisFailed, metadata);
                log::debug!("Session {} analysis failed: {}", session_id, e);
            }
        }

        result
    }

    fn run(&self, session_id: &SessionId, raw_text: &str) -> Result<AnalysisSession, PipelineError> {
        let stage = Instant::now();
        let normalized = self.normalizer.normalize(raw_text)?;
        self.collector.record_duration("ingest", stage.elapsed());
        let total_rows = normalized.total_rows();

        let stage = Instant::now();
        let summary = aggregate(&normalized.records);
        self.collector.record_duration("aggregate", stage.elapsed());

        let stage = Instant::now();
        let recommendations = self.engine.recommend(&normalized.records, &summary)?;
        self.collector.record_duration("recommend", stage.elapsed());

        Ok(AnalysisSession {
            id: session_id.clone(),
            aggregate: summary,
            recommendations,
            row_errors: normalized.row_errors,
            total_rows,
        })
    }

    /// Current result for a session
    pub fn current(&self, session_id: &SessionId) -> Option<Arc<AnalysisSession>> {
        self.store.current(session_id)
    }

    /// Discard a session's result; returns whether one existed
    pub fn reset(&self, session_id: &SessionId) -> bool {
        let existed = self.store.reset(session_id);
        if existed {
            log::debug!("Session {} reset", session_id);
        }
        existed
    }

    /// Export every recommendation of a session as Terraform
    pub fn export_config(&self, session: &AnalysisSession) -> Result<SynthesizedConfig, PipelineError> {
        let config = self.synthesizer.synthesize(&session.recommendations)?;
        self.record_export(session, &config);
        Ok(config)
    }

    /// Export the recommendations named by `ids`
    pub fn export_selected(
        &self,
        session: &AnalysisSession,
        ids: &[u32],
    ) -> Result<SynthesizedConfig, PipelineError> {
        let config = self
            .synthesizer
            .synthesize_selected(&session.recommendations, ids)?;
        self.record_export(session, &config);
        Ok(config)
    }

    fn record_export(&self, session: &AnalysisSession, config: &SynthesizedConfig) {
        let mut metadata = session_metadata(&session.id);
        metadata.insert(
            "optimizations".to_string(),
            config.optimization_count.to_string(),
        );
        self.collector
            .record_event(PipelineEvent::ExportCompleted, metadata);
    }
}

fn session_metadata(session_id: &SessionId) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert("session".to_string(), session_id.to_string());
    metadata
}
