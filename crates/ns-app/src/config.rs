//! YAML run configuration: schema, validation, load/save.

use crate::error::{AppError, AppResult};
use ns_eos::{EosResult, Polytrope};
use ns_tidal::SearchConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LATEST_VERSION: u32 = 1;

/// One batch run: candidate EOSs, the stars to compute for each, and the
/// constraints that filter candidates before any star is integrated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub version: u32,
    pub name: String,
    pub candidates: Vec<CandidateDef>,
    /// Density checkpoints reported for every star
    #[serde(default)]
    pub checkpoints: Vec<NamedDensity>,
    #[serde(default)]
    pub search: SearchDef,
    #[serde(default)]
    pub constraints: Vec<ConstraintDef>,
    /// Result store root; defaults to `.nstidal/runs` next to the config file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateDef {
    pub id: String,
    #[serde(flatten)]
    pub eos: EosDef,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EosDef {
    Polytrope {
        k: f64,
        gamma: f64,
        max_density: f64,
        /// Defaults to the nucleon mass
        #[serde(default, skip_serializing_if = "Option::is_none")]
        rest_mass: Option<f64>,
    },
}

impl EosDef {
    pub fn polytrope(k: f64, gamma: f64, max_density: f64) -> Self {
        EosDef::Polytrope {
            k,
            gamma,
            max_density,
            rest_mass: None,
        }
    }

    /// Instantiate the model under `name`.
    pub fn build(&self, name: &str) -> EosResult<Polytrope> {
        let eos = match *self {
            EosDef::Polytrope {
                k,
                gamma,
                max_density,
                rest_mass: None,
            } => Polytrope::new(k, gamma, max_density),
            EosDef::Polytrope {
                k,
                gamma,
                max_density,
                rest_mass: Some(m),
            } => Polytrope::with_rest_mass(k, gamma, m, max_density),
        };
        eos.map(|eos| eos.named(name))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamedDensity {
    pub name: String,
    /// [fm^-3]
    pub density: f64,
}

/// Search starting point and target, see [`SearchConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDef {
    /// [MeV fm^-3]
    pub central_pressure0: f64,
    /// [M_sun]
    pub target_mass: f64,
    pub max_retries: usize,
}

impl Default for SearchDef {
    fn default() -> Self {
        let search = SearchConfig::default();
        Self {
            central_pressure0: search.central_pressure0,
            target_mass: search.target_mass,
            max_retries: search.max_retries,
        }
    }
}

impl SearchDef {
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            central_pressure0: self.central_pressure0,
            target_mass: self.target_mass,
            max_retries: self.max_retries,
            ..SearchConfig::default()
        }
    }
}

/// Polygon in (n/n0, P [MeV fm^-3]) space the EOS has to run through.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstraintDef {
    pub name: String,
    #[serde(default = "default_x_min")]
    pub x_min: f64,
    #[serde(default = "default_x_max")]
    pub x_max: f64,
    #[serde(default = "default_accept_fraction")]
    pub accept_fraction: f64,
    pub polygon: Vec<[f64; 2]>,
}

fn default_x_min() -> f64 {
    2.0
}

fn default_x_max() -> f64 {
    4.5
}

fn default_accept_fraction() -> f64 {
    0.8
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported config version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, v: f64) -> Result<(), ValidationError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, v, "must be positive and finite"))
    }
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version == 0 || config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }
    if config.name.trim().is_empty() {
        return Err(invalid("name", "\"\"", "must not be empty"));
    }
    if config.candidates.is_empty() {
        return Err(invalid("candidates", "[]", "at least one candidate is required"));
    }

    let mut ids = HashSet::new();
    for candidate in &config.candidates {
        if !ids.insert(candidate.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: candidate.id.clone(),
                context: "candidates".to_string(),
            });
        }
        if let Err(e) = candidate.eos.build(&candidate.id) {
            return Err(invalid(
                format!("candidate '{}'", candidate.id),
                format!("{:?}", candidate.eos),
                &e.to_string(),
            ));
        }
    }

    let mut names = HashSet::new();
    for checkpoint in &config.checkpoints {
        if !names.insert(checkpoint.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: checkpoint.name.clone(),
                context: "checkpoints".to_string(),
            });
        }
        positive(&format!("checkpoint '{}' density", checkpoint.name), checkpoint.density)?;
    }

    positive("search.central_pressure0", config.search.central_pressure0)?;
    positive("search.target_mass", config.search.target_mass)?;

    let mut names = HashSet::new();
    for constraint in &config.constraints {
        if !names.insert(constraint.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: constraint.name.clone(),
                context: "constraints".to_string(),
            });
        }
        validate_constraint(constraint)?;
    }

    Ok(())
}

fn validate_constraint(constraint: &ConstraintDef) -> Result<(), ValidationError> {
    let field = |what: &str| format!("constraint '{}' {what}", constraint.name);
    if constraint.polygon.len() < 3 {
        return Err(invalid(
            field("polygon"),
            constraint.polygon.len(),
            "needs at least 3 vertices",
        ));
    }
    if constraint.polygon.iter().flatten().any(|v| !v.is_finite()) {
        return Err(invalid(field("polygon"), "non-finite", "vertices must be finite"));
    }
    if !(constraint.x_min.is_finite() && constraint.x_max.is_finite())
        || constraint.x_min >= constraint.x_max
    {
        return Err(invalid(
            field("range"),
            format!("[{}, {}]", constraint.x_min, constraint.x_max),
            "x_min must be below x_max",
        ));
    }
    if !(0.0..=1.0).contains(&constraint.accept_fraction) {
        return Err(invalid(
            field("accept_fraction"),
            constraint.accept_fraction,
            "must lie in [0, 1]",
        ));
    }
    Ok(())
}

pub fn load_yaml(path: &Path) -> AppResult<RunConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let config: RunConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &RunConfig) -> AppResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content).map_err(|source| AppError::ConfigFileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
version: 1
name: polytropes
candidates:
  - id: soft
    type: polytrope
    k: 254.0
    gamma: 2.0
    max_density: 2.0
  - id: stiff
    type: polytrope
    k: 100.0
    gamma: 2.5
    max_density: 1.5
    rest_mass: 938.9
checkpoints:
  - name: crust
    density: 0.08
search:
  target_mass: 1.2
constraints:
  - name: flow
    polygon: [[2.0, 5.0], [4.5, 5.0], [4.5, 300.0], [2.0, 300.0]]
"#;

    fn example() -> RunConfig {
        serde_yaml::from_str(EXAMPLE).unwrap()
    }

    #[test]
    fn parses_with_defaults() {
        let config = example();
        validate_config(&config).unwrap();
        assert_eq!(config.candidates.len(), 2);
        assert_eq!(
            config.candidates[0].eos,
            EosDef::polytrope(254.0, 2.0, 2.0)
        );
        assert!(matches!(
            config.candidates[1].eos,
            EosDef::Polytrope {
                rest_mass: Some(_),
                ..
            }
        ));
        // partially given search block keeps the remaining defaults
        assert_eq!(config.search.target_mass, 1.2);
        assert_eq!(config.search.central_pressure0, 10.0);
        assert_eq!(config.search.max_retries, 16);
        let constraint = &config.constraints[0];
        assert_eq!((constraint.x_min, constraint.x_max), (2.0, 4.5));
        assert_eq!(constraint.accept_fraction, 0.8);
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn yaml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");
        let config = example();
        save_yaml(&path, &config).unwrap();
        assert_eq!(load_yaml(&path).unwrap(), config);
    }

    #[test]
    fn duplicate_candidates_rejected() {
        let mut config = example();
        config.candidates[1].id = "soft".to_string();
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::DuplicateId { .. })
        ));
    }

    #[test]
    fn bad_parameters_rejected() {
        let mut config = example();
        config.candidates[0].eos = EosDef::polytrope(254.0, 0.9, 2.0);
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::InvalidValue { .. })
        ));

        let mut config = example();
        config.constraints[0].polygon.truncate(2);
        assert!(validate_config(&config).is_err());

        let mut config = example();
        config.constraints[0].x_min = 5.0;
        assert!(validate_config(&config).is_err());

        let mut config = example();
        config.search.target_mass = -1.0;
        assert!(validate_config(&config).is_err());

        let mut config = example();
        config.version = LATEST_VERSION + 1;
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::UnsupportedVersion { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = load_yaml(Path::new("/nonexistent/run.yaml")).unwrap_err();
        assert!(matches!(err, AppError::ConfigFileRead { .. }));
    }

    #[test]
    fn built_eos_carries_candidate_name() {
        use ns_eos::EquationOfState;
        let eos = example().candidates[0].eos.build("soft").unwrap();
        assert_eq!(eos.name(), "soft");
    }
}
