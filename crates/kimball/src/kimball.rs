//! Main Kimball pipeline and public API.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::classification::{ClassifierConfig, ColumnClassifier};
use crate::error::{KimballError, Result};
use crate::hierarchy::{Hierarchy, HierarchyBuilder};
use crate::inference::{InferenceConfig, TypeInferenceEngine};
use crate::input::{ProfileStore, StoreConfig};
use crate::model::{DimensionalModelRecommender, ErdModel, ModelRecommendation, RecommenderConfig};
use crate::parallel::map_partitioned;
use crate::quality::{QualityAssessor, QualityConfig, QualityReport};
use crate::relationship::{DiscoveryConfig, Relationship, RelationshipDiscoverer};
use crate::schema::{ColumnAnalysis, ColumnProfile, ColumnType, SchemaSummary, TableAnalysis};

/// Configuration for a model build.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KimballConfig {
    pub inference: InferenceConfig,
    pub classifier: ClassifierConfig,
    pub discovery: DiscoveryConfig,
    pub recommender: RecommenderConfig,
    pub quality: QualityConfig,
    /// Settings for stores built from files.
    pub store: StoreConfig,
    /// Profile tables concurrently.
    pub parallel: bool,
}

impl Default for KimballConfig {
    fn default() -> Self {
        Self {
            inference: InferenceConfig::default(),
            classifier: ClassifierConfig::default(),
            discovery: DiscoveryConfig::default(),
            recommender: RecommenderConfig::default(),
            quality: QualityConfig::default(),
            store: StoreConfig::default(),
            parallel: true,
        }
    }
}

impl KimballConfig {
    /// Load configuration from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| KimballError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: KimballConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold lies in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("inference.date_threshold", self.inference.date_threshold),
            ("inference.numeric_threshold", self.inference.numeric_threshold),
            ("discovery.confidence_threshold", self.discovery.confidence_threshold),
            (
                "recommender.foreign_key_min_confidence",
                self.recommender.foreign_key_min_confidence,
            ),
        ];
        for (name, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(KimballError::Config(format!(
                    "{name} must be between 0 and 1, got {value}"
                )));
            }
        }
        if self.inference.sample_size == 0 {
            return Err(KimballError::Config(
                "inference.sample_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Stage reached by a model build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStage {
    NotStarted,
    Profiling,
    Classified,
    RelationshipsDiscovered,
    HierarchiesBuilt,
    Recommended,
}

impl BuildStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStage::NotStarted => "not_started",
            BuildStage::Profiling => "profiling",
            BuildStage::Classified => "classified",
            BuildStage::RelationshipsDiscovered => "relationships_discovered",
            BuildStage::HierarchiesBuilt => "hierarchies_built",
            BuildStage::Recommended => "recommended",
        }
    }
}

impl std::fmt::Display for BuildStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a model build produced, up to the stage it reached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBuild {
    pub stage: BuildStage,
    pub analyzed_at: DateTime<Utc>,
    pub tables: Vec<TableAnalysis>,
    pub relationships: Vec<Relationship>,
    pub hierarchies: Vec<Hierarchy>,
    /// Fact recommendations first, then dimensions.
    pub recommendations: Vec<ModelRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub erd: Option<ErdModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
    pub summary: SchemaSummary,
    /// Why the build stopped before its final stage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ModelBuild {
    fn new() -> Self {
        Self {
            stage: BuildStage::NotStarted,
            analyzed_at: Utc::now(),
            tables: Vec::new(),
            relationships: Vec::new(),
            hierarchies: Vec::new(),
            recommendations: Vec::new(),
            erd: None,
            quality: None,
            summary: SchemaSummary::default(),
            failure: None,
            warnings: Vec::new(),
        }
    }

    fn fail(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(stage = %self.stage, reason = %reason, "model build stopped");
        self.failure = Some(reason);
        self
    }

    /// Whether every stage ran.
    pub fn is_complete(&self) -> bool {
        self.stage == BuildStage::Recommended && self.failure.is_none()
    }

    pub fn table(&self, name: &str) -> Option<&TableAnalysis> {
        self.tables.iter().find(|t| t.table == name)
    }

    pub fn fact_recommendations(&self) -> impl Iterator<Item = &ModelRecommendation> {
        self.recommendations.iter().filter(|r| r.is_fact())
    }

    pub fn dimension_recommendations(&self) -> impl Iterator<Item = &ModelRecommendation> {
        self.recommendations.iter().filter(|r| !r.is_fact())
    }

    /// Save the build as pretty-printed JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    KimballError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let file = File::create(path).map_err(|e| {
            KimballError::Persistence(format!(
                "Failed to create file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), self).map_err(|e| {
            KimballError::Persistence(format!("Failed to serialize model build: {}", e))
        })?;

        debug!(path = %path.display(), "saved model build");
        Ok(())
    }

    /// Load a build saved with [`ModelBuild::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            KimballError::Persistence(format!(
                "Failed to open file '{}': {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            KimballError::Persistence(format!(
                "Failed to parse model build '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

/// The dimensional modeling pipeline.
pub struct Kimball {
    config: KimballConfig,
    engine: TypeInferenceEngine,
    classifier: ColumnClassifier,
    discoverer: RelationshipDiscoverer,
    hierarchy_builder: HierarchyBuilder,
    recommender: DimensionalModelRecommender,
    assessor: QualityAssessor,
}

impl Default for Kimball {
    fn default() -> Self {
        Self::new()
    }
}

impl Kimball {
    /// Create a pipeline with default configuration.
    pub fn new() -> Self {
        Self::with_config(KimballConfig::default())
    }

    /// Create a pipeline with custom configuration.
    pub fn with_config(config: KimballConfig) -> Self {
        Self {
            engine: TypeInferenceEngine::with_config(config.inference.clone()),
            classifier: ColumnClassifier::with_config(config.classifier.clone()),
            discoverer: RelationshipDiscoverer::with_config(config.discovery.clone()),
            hierarchy_builder: HierarchyBuilder::new(),
            recommender: DimensionalModelRecommender::with_config(config.recommender.clone()),
            assessor: QualityAssessor::with_config(config.quality.clone()),
            config,
        }
    }

    pub fn config(&self) -> &KimballConfig {
        &self.config
    }

    /// The inference engine, for feeding back corrections.
    pub fn inference_engine(&self) -> &TypeInferenceEngine {
        &self.engine
    }

    /// Infer, refine and classify one column from its profile.
    pub fn analyze_column(&self, profile: ColumnProfile) -> ColumnAnalysis {
        let inference = self.engine.infer(&profile.sample_values, &profile.column);
        let column_type = ColumnType::refine(inference.inferred_type, &profile.sample_values);
        let classification = self.classifier.classify_profile(&profile, column_type);
        ColumnAnalysis {
            profile,
            column_type,
            inference,
            classification,
        }
    }

    /// Run every stage over the store's tables.
    ///
    /// Never fails: a stage that cannot proceed stops the build there and
    /// records the reason in [`ModelBuild::failure`].
    #[instrument(skip_all)]
    pub fn build(&self, store: &dyn ProfileStore) -> ModelBuild {
        let mut build = ModelBuild::new();

        build.stage = BuildStage::Profiling;
        let table_names = match store.list_tables() {
            Ok(names) if names.is_empty() => return build.fail("no tables found"),
            Ok(names) => names,
            Err(e) => return build.fail(format!("failed to list tables: {e}")),
        };
        info!(tables = table_names.len(), "profiling tables");

        build.tables = map_partitioned(&table_names, self.config.parallel, |table| {
            self.profile_table(store, table)
        });
        for table in &build.tables {
            build.warnings.extend(table.warnings.iter().cloned());
            if let Some(error) = &table.error {
                build.warnings.push(format!("{}: {}", table.table, error));
            }
        }
        build.summary = SchemaSummary::from_tables(&build.tables);
        if !build.tables.iter().any(TableAnalysis::is_ok) {
            return build.fail("no table could be profiled");
        }
        build.stage = BuildStage::Classified;

        let discovery = self.discoverer.discover(
            store,
            &build.tables,
            self.config.discovery.confidence_threshold,
        );
        build.warnings.extend(discovery.warnings);
        build.relationships = discovery.relationships;
        build.stage = BuildStage::RelationshipsDiscovered;

        build.hierarchies = build
            .tables
            .iter()
            .filter(|t| t.is_ok())
            .filter_map(|t| self.hierarchy_builder.build(&t.table, &t.dimension_profiles()))
            .collect();
        build.stage = BuildStage::HierarchiesBuilt;

        let erd = ErdModel::from_analysis(&build.tables, &build.relationships, &self.config.recommender);
        build.recommendations = self
            .recommender
            .recommend(&erd, &build.hierarchies, &build.tables);
        build.quality = Some(self.assessor.assess(&build.tables));
        build.erd = Some(erd);
        build.stage = BuildStage::Recommended;

        info!(
            tables = build.tables.len(),
            relationships = build.relationships.len(),
            hierarchies = build.hierarchies.len(),
            recommendations = build.recommendations.len(),
            "model build complete"
        );
        build
    }

    #[instrument(skip(self, store))]
    fn profile_table(&self, store: &dyn ProfileStore, table: &str) -> TableAnalysis {
        let columns = match store.list_columns(table) {
            Ok(columns) => columns,
            Err(e) => {
                warn!(error = %e, "failed to list columns");
                return TableAnalysis::failed(table, e.to_string());
            }
        };

        let mut warnings = Vec::new();
        let analyses: Vec<ColumnAnalysis> = columns
            .iter()
            .filter_map(|info| match store.column_profile(table, &info.name) {
                Ok(profile) => Some(self.analyze_column(profile)),
                Err(e) => {
                    warn!(column = %info.name, error = %e, "skipping column");
                    warnings.push(format!("{table}.{}: profile unavailable: {e}", info.name));
                    None
                }
            })
            .collect();

        debug!(columns = analyses.len(), skipped = warnings.len(), "profiled table");
        TableAnalysis::new(table, analyses).with_warnings(warnings)
    }
}
