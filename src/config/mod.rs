//! Scenario files: YAML descriptions of one or more model evaluations.
//!
//! Mistake-proofing happens in two layers:
//! - serde rejects unknown keys and wrongly typed values
//! - [`ModelSpec::to_parameters`] turns the loose key/value record into a
//!   validated [`ModelParameters`], rejecting missing, out-of-domain and
//!   irrelevant fields with `InvalidParameter`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use validator::Validate;

use crate::error::{QueueError, QueueResult};
use crate::metrics::QueueMetrics;
use crate::models::{evaluate, ModelKind};
use crate::params::{
    Md1Params, Mg1Params, Mm1Params, Mm1nParams, Mm2Mode, Mm2Params, ModelParameters,
    PriorityParams, StateQuery,
};

/// Top-level scenario file.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Human-readable name of the scenario set.
    #[serde(default)]
    pub name: String,

    /// Output rendering options.
    #[validate(nested)]
    #[serde(default)]
    pub output: OutputConfig,

    /// Evaluations to run, in order.
    #[validate(length(min = 1, message = "at least one scenario is required"))]
    pub scenarios: Vec<ModelSpec>,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl ScenarioConfig {
    /// Load a scenario file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> QueueResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a scenario file from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> QueueResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Create a builder for programmatic construction.
    #[must_use]
    pub fn builder() -> ScenarioConfigBuilder {
        ScenarioConfigBuilder::default()
    }

    fn validate_semantic(&self) -> QueueResult<()> {
        if self.schema_version.split('.').next() != Some("1") {
            return Err(QueueError::config(format!(
                "unsupported schema_version '{}', expected 1.x",
                self.schema_version
            )));
        }
        Ok(())
    }

    /// Evaluate every scenario in order. A failing scenario does not stop
    /// the ones after it.
    #[must_use]
    pub fn evaluate(&self) -> Vec<ScenarioOutcome> {
        self.scenarios
            .iter()
            .enumerate()
            .map(|(i, spec)| {
                let name = spec
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("scenario-{}", i + 1));
                let result = spec.to_parameters().and_then(|params| evaluate(&params));
                match &result {
                    Ok(metrics) => {
                        tracing::info!(scenario = %name, model = %metrics.model, "scenario evaluated");
                    }
                    Err(err) => tracing::warn!(scenario = %name, error = %err, "scenario failed"),
                }
                ScenarioOutcome {
                    name,
                    model: spec.model,
                    result,
                }
            })
            .collect()
    }
}

/// Result of evaluating one scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// Scenario name, or `scenario-<n>` when none was given.
    pub name: String,
    /// Requested model.
    pub model: ModelKind,
    /// Metrics or the terminal error.
    pub result: QueueResult<QueueMetrics>,
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ScenarioConfigBuilder {
    name: Option<String>,
    output: OutputConfig,
    scenarios: Vec<ModelSpec>,
}

impl ScenarioConfigBuilder {
    /// Set the scenario-set name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the number of decimal places.
    #[must_use]
    pub fn precision(mut self, precision: usize) -> Self {
        self.output.precision = precision;
        self
    }

    /// Set the output format.
    #[must_use]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.output.format = format;
        self
    }

    /// Append a scenario.
    #[must_use]
    pub fn scenario(mut self, spec: ModelSpec) -> Self {
        self.scenarios.push(spec);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// Returns error if the assembled configuration fails validation.
    pub fn build(self) -> QueueResult<ScenarioConfig> {
        let config = ScenarioConfig {
            schema_version: default_schema_version(),
            name: self.name.unwrap_or_default(),
            output: self.output,
            scenarios: self.scenarios,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Output rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Decimal places for text output.
    #[validate(range(max = 15))]
    #[serde(default = "default_precision")]
    pub precision: usize,
    /// Text table or JSON.
    #[serde(default)]
    pub format: OutputFormat,
}

const fn default_precision() -> usize {
    6
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
            format: OutputFormat::default(),
        }
    }
}

/// How results are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Labelled rows, one metric per line.
    #[default]
    Text,
    /// `serde_json` serialization of the metrics.
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(QueueError::config(format!(
                "unknown output format '{other}', expected 'text' or 'json'"
            ))),
        }
    }
}

/// A loosely typed model request, as written in a scenario file or on the
/// command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelSpec {
    /// Optional scenario name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Which model to evaluate.
    pub model: ModelKind,
    /// Arrival rate λ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambda: Option<f64>,
    /// Per-class arrival rates, highest priority first (priority only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lambdas: Option<Vec<f64>>,
    /// Service rate μ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu: Option<f64>,
    /// First server rate (M/M/2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu1: Option<f64>,
    /// Second server rate (M/M/2).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mu2: Option<f64>,
    /// M/M/2 formulation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mm2Mode>,
    /// System capacity N (M/M/1/N).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    /// Service-time variance σ² (M/G/1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variance: Option<f64>,
    /// Service-time standard deviation σ (M/G/1).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std_dev: Option<f64>,
    /// Report P(exactly n in system).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pn: Option<u32>,
    /// Report P(at least x in system).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pax: Option<u32>,
}

fn required(name: &str, value: Option<f64>) -> QueueResult<f64> {
    value.ok_or_else(|| QueueError::invalid(name, "is required"))
}

impl ModelSpec {
    /// An empty request for `model`.
    #[must_use]
    pub const fn new(model: ModelKind) -> Self {
        Self {
            name: None,
            model,
            lambda: None,
            lambdas: None,
            mu: None,
            mu1: None,
            mu2: None,
            mode: None,
            capacity: None,
            variance: None,
            std_dev: None,
            pn: None,
            pax: None,
        }
    }

    /// Names of the model-specific fields that are set.
    fn present_fields(&self) -> Vec<&'static str> {
        [
            ("lambda", self.lambda.is_some()),
            ("lambdas", self.lambdas.is_some()),
            ("mu", self.mu.is_some()),
            ("mu1", self.mu1.is_some()),
            ("mu2", self.mu2.is_some()),
            ("mode", self.mode.is_some()),
            ("capacity", self.capacity.is_some()),
            ("variance", self.variance.is_some()),
            ("std_dev", self.std_dev.is_some()),
        ]
        .into_iter()
        .filter_map(|(name, set)| set.then_some(name))
        .collect()
    }

    fn allowed_fields(&self) -> &'static [&'static str] {
        match self.model {
            ModelKind::Mm1 | ModelKind::Md1 => &["lambda", "mu"],
            ModelKind::Mm2 => &["lambda", "mu", "mu1", "mu2", "mode"],
            ModelKind::Mm1n => &["lambda", "mu", "capacity"],
            ModelKind::Mg1 => &["lambda", "mu", "variance", "std_dev"],
            ModelKind::Priority => &["lambdas", "mu"],
        }
    }

    /// Convert into validated parameters.
    ///
    /// # Errors
    /// `InvalidParameter` for a missing, out-of-domain or irrelevant field.
    pub fn to_parameters(&self) -> QueueResult<ModelParameters> {
        let allowed = self.allowed_fields();
        if let Some(field) = self
            .present_fields()
            .into_iter()
            .find(|f| !allowed.contains(f))
        {
            return Err(QueueError::invalid(
                field,
                format!("is not used by {}", self.model),
            ));
        }

        let query = StateQuery {
            pn: self.pn,
            pax: self.pax,
        };

        let params: ModelParameters = match self.model {
            ModelKind::Mm1 => {
                Mm1Params::new(required("lambda", self.lambda)?, required("mu", self.mu)?)?
                    .with_query(query)
                    .into()
            }
            ModelKind::Md1 => {
                Md1Params::new(required("lambda", self.lambda)?, required("mu", self.mu)?)?
                    .with_query(query)
                    .into()
            }
            ModelKind::Mm2 => self.mm2_parameters()?.with_query(query).into(),
            ModelKind::Mm1n => Mm1nParams::from_real_capacity(
                required("lambda", self.lambda)?,
                required("mu", self.mu)?,
                required("capacity", self.capacity)?,
            )?
            .with_query(query)
            .into(),
            ModelKind::Mg1 => {
                let lambda = required("lambda", self.lambda)?;
                let mu = required("mu", self.mu)?;
                match (self.variance, self.std_dev) {
                    (Some(_), Some(_)) => {
                        return Err(QueueError::invalid(
                            "std_dev",
                            "give either variance or std_dev, not both",
                        ))
                    }
                    (None, Some(sigma)) => Mg1Params::with_std_dev(lambda, mu, sigma)?,
                    (variance, None) => Mg1Params::new(lambda, mu, variance)?,
                }
                .with_query(query)
                .into()
            }
            ModelKind::Priority => {
                let lambdas = self
                    .lambdas
                    .clone()
                    .ok_or_else(|| QueueError::invalid("lambdas", "is required"))?;
                PriorityParams::new(lambdas, required("mu", self.mu)?)?
                    .with_query(query)
                    .into()
            }
        };
        Ok(params)
    }

    fn mm2_parameters(&self) -> QueueResult<Mm2Params> {
        let lambda = required("lambda", self.lambda)?;
        let params = match (self.mu, self.mu1, self.mu2) {
            (Some(mu), None, None) => Mm2Params::identical(lambda, mu)?,
            (None, mu1, mu2) => Mm2Params::new(lambda, required("mu1", mu1)?, required("mu2", mu2)?)?,
            (Some(_), _, _) => {
                return Err(QueueError::invalid(
                    "mu",
                    "give either mu or mu1/mu2, not both",
                ))
            }
        };
        Ok(params.with_mode(self.mode.unwrap_or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults() {
        let output = OutputConfig::default();
        assert_eq!(output.precision, 6);
        assert_eq!(output.format, OutputFormat::Text);
    }

    #[test]
    fn test_yaml_parse() {
        let yaml = r"
name: Checkout lanes
scenarios:
  - name: baseline
    model: mm1
    lambda: 4
    mu: 5
    pn: 2
  - model: mm1n
    lambda: 4
    mu: 5
    capacity: 3
";
        let config = ScenarioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.schema_version, "1.0");
        assert_eq!(config.name, "Checkout lanes");
        assert_eq!(config.scenarios.len(), 2);
        assert_eq!(config.scenarios[0].pn, Some(2));
        assert_eq!(config.scenarios[1].capacity, Some(3.0));
    }

    #[test]
    fn test_yaml_rejects_unknown_keys() {
        let yaml = r"
scenarios:
  - model: mm1
    lambda: 4
    mu: 5
    theme: dark
";
        assert!(matches!(
            ScenarioConfig::from_yaml(yaml),
            Err(QueueError::YamlParse(_))
        ));
    }

    #[test]
    fn test_yaml_rejects_unknown_model() {
        let yaml = "scenarios:\n  - model: mmc\n    lambda: 1\n    mu: 2\n";
        let err = ScenarioConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, QueueError::YamlParse(_)));
        assert!(err.to_string().contains("unknown model 'mmc'"));
    }

    #[test]
    fn test_yaml_accepts_kendall_notation() {
        let yaml = "scenarios:\n  - model: M/M/1/N\n    lambda: 4\n    mu: 5\n    capacity: 3\n  - model: M/D/1\n    lambda: 1\n    mu: 2\n";
        let config = ScenarioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.scenarios[0].model, ModelKind::Mm1n);
        assert_eq!(config.scenarios[1].model, ModelKind::Md1);
        let outcomes = config.evaluate();
        assert!(outcomes.iter().all(|o| o.result.is_ok()));
    }

    #[test]
    fn test_validation_requires_scenarios() {
        let yaml = "scenarios: []\n";
        assert!(matches!(
            ScenarioConfig::from_yaml(yaml),
            Err(QueueError::Validation(_))
        ));
    }

    #[test]
    fn test_validation_precision_range() {
        let yaml = r"
output:
  precision: 40
scenarios:
  - model: md1
    lambda: 1
    mu: 2
";
        assert!(matches!(
            ScenarioConfig::from_yaml(yaml),
            Err(QueueError::Validation(_))
        ));
    }

    #[test]
    fn test_unsupported_schema_version() {
        let yaml = "schema_version: \"2.0\"\nscenarios:\n  - model: md1\n    lambda: 1\n    mu: 2\n";
        assert!(matches!(
            ScenarioConfig::from_yaml(yaml),
            Err(QueueError::Config { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let mut spec = ModelSpec::new(ModelKind::Mm1);
        spec.lambda = Some(4.0);
        spec.mu = Some(5.0);
        let config = ScenarioConfig::builder()
            .name("built")
            .precision(3)
            .format(OutputFormat::Json)
            .scenario(spec)
            .build()
            .unwrap();
        assert_eq!(config.output.precision, 3);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.name, "built");
    }

    #[test]
    fn test_builder_without_scenarios_fails() {
        assert!(ScenarioConfig::builder().build().is_err());
    }

    #[test]
    fn test_missing_required_field() {
        let mut spec = ModelSpec::new(ModelKind::Mm1);
        spec.lambda = Some(4.0);
        match spec.to_parameters().unwrap_err() {
            QueueError::InvalidParameter { parameter, reason } => {
                assert_eq!(parameter, "mu");
                assert!(reason.contains("required"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_irrelevant_field_rejected() {
        let mut spec = ModelSpec::new(ModelKind::Mm1);
        spec.lambda = Some(4.0);
        spec.mu = Some(5.0);
        spec.capacity = Some(3.0);
        let err = spec.to_parameters().unwrap_err();
        assert!(err.to_string().contains("capacity"));
    }

    #[test]
    fn test_mm2_accepts_common_or_split_rates() {
        let mut spec = ModelSpec::new(ModelKind::Mm2);
        spec.lambda = Some(3.0);
        spec.mu = Some(2.0);
        assert!(spec.to_parameters().is_ok());

        spec.mu = None;
        spec.mu1 = Some(2.0);
        spec.mu2 = Some(2.5);
        spec.mode = Some(Mm2Mode::Symmetric);
        match spec.to_parameters().unwrap() {
            ModelParameters::Mm2(p) => assert_eq!(p.mode(), Mm2Mode::Symmetric),
            other => panic!("unexpected parameters: {other:?}"),
        }

        spec.mu = Some(2.0);
        assert!(spec.to_parameters().is_err());
    }

    #[test]
    fn test_mg1_variance_and_std_dev_are_exclusive() {
        let mut spec = ModelSpec::new(ModelKind::Mg1);
        spec.lambda = Some(1.0);
        spec.mu = Some(2.0);
        spec.variance = Some(0.25);
        spec.std_dev = Some(0.5);
        assert!(spec.to_parameters().is_err());

        spec.variance = None;
        match spec.to_parameters().unwrap() {
            ModelParameters::Mg1(p) => assert!((p.variance() - 0.25).abs() < 1e-15),
            other => panic!("unexpected parameters: {other:?}"),
        }
    }

    #[test]
    fn test_fractional_capacity_rejected() {
        let mut spec = ModelSpec::new(ModelKind::Mm1n);
        spec.lambda = Some(1.0);
        spec.mu = Some(2.0);
        spec.capacity = Some(2.5);
        assert!(matches!(
            spec.to_parameters(),
            Err(QueueError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_evaluate_keeps_going_after_failure() {
        let yaml = r"
scenarios:
  - name: unstable
    model: mm1
    lambda: 5
    mu: 5
  - name: fine
    model: priority
    lambdas: [1, 2]
    mu: 5
";
        let outcomes = ScenarioConfig::from_yaml(yaml).unwrap().evaluate();
        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            outcomes[0].result,
            Err(QueueError::UnstableSystem { .. })
        ));
        let metrics = outcomes[1].result.as_ref().unwrap();
        assert_eq!(metrics.classes.len(), 2);
        assert_eq!(outcomes[1].name, "fine");
    }

    #[test]
    fn test_unnamed_scenarios_get_index_names() {
        let yaml = "scenarios:\n  - model: md1\n    lambda: 1\n    mu: 2\n";
        let outcomes = ScenarioConfig::from_yaml(yaml).unwrap().evaluate();
        assert_eq!(outcomes[0].name, "scenario-1");
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
