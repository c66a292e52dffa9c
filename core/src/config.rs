//! # Generator Configuration
//!
//! Data-driven description of what each task extracts, how field types are
//! projected, and where artifacts land. The static content blocks (the scalar
//! wrapper declarations and the mirrored TypeScript aliases) are checked-in
//! data files, not code, and every part of the configuration can be overridden
//! from a YAML file.

use crate::error::{AppError, AppResult};
use crate::extractor::StructuralPattern;
use crate::type_mapping::{QualifierRemap, TypeTable};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The plain scalar wrapper declarations emitted verbatim as `db/pgtype.go`.
pub const PGTYPE_DECLS: &str = include_str!("data/pgtype_decls.go");

/// The mirrored TypeScript alias block injected into the generated client.
pub const TS_ALIASES: &str = include_str!("data/ts_aliases.ts");

/// A file written verbatim, with no extraction involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticOutput {
    /// Output path, relative to the project root.
    pub path: PathBuf,
    /// Literal file contents.
    pub content: String,
}

/// Extraction step of one task: which blocks to pull, how to project their
/// types, and the artifact they assemble into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Structural pattern the extractor scans for.
    pub pattern: StructuralPattern,
    /// Optional namespace-qualifier remap, applied before the scalar table.
    #[serde(default)]
    pub remap: Option<QualifierRemap>,
    /// Optional scalar substitution table.
    #[serde(default)]
    pub table: Option<TypeTable>,
    /// Artifact header: package declaration plus imports.
    pub header: String,
    /// Artifact path, relative to the project root.
    pub output: PathBuf,
}

/// Region replacement step: swap the body of a marker-opened region inside a
/// foreign artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPatch {
    /// The foreign file to patch, relative to the project root.
    pub target: PathBuf,
    /// Start-marker regex; must match up to and including the opening `{`.
    pub marker: String,
    /// Replacement body placed between the opener and its closing `}`.
    pub content: String,
}

/// One selectable task: any combination of static outputs, an extraction
/// step, and a foreign-region patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Task identifier selected on the command line.
    pub name: String,
    /// Files written verbatim before extraction runs.
    #[serde(default)]
    pub statics: Vec<StaticOutput>,
    /// Extraction + projection + assembly step.
    #[serde(default)]
    pub extraction: Option<ExtractionConfig>,
    /// Foreign-region replacement step.
    #[serde(default)]
    pub patch: Option<RegionPatch>,
}

/// Full generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Directory (relative to the project root) scanned for source units.
    pub source_dir: PathBuf,
    /// Filename suffix a source unit must carry (e.g. `.sql.go`).
    pub source_suffix: String,
    /// The selectable tasks.
    pub tasks: Vec<TaskConfig>,
}

impl GeneratorConfig {
    /// Loads a configuration from a YAML file.
    pub fn load(path: &Path) -> AppResult<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&text)
            .map_err(|e| AppError::General(format!("Invalid config {:?}: {}", path, e)))
    }

    /// Looks a task up by its identifier.
    pub fn task(&self, name: &str) -> Option<&TaskConfig> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

/// The scalar substitution table for row structs: wrapper tokens in
/// unqualified form paired with their plain Go equivalents.
fn row_scalar_table() -> TypeTable {
    TypeTable::from_pairs([
        ("Text", "string"),
        ("Bool", "bool"),
        ("Int2", "int16"),
        ("Float4", "float32"),
        ("Float8", "float64"),
        ("Date", "time.Time"),
        ("Timestamp", "time.Time"),
        ("Timestamptz", "time.Time"),
        ("Time", "int64"),
        ("Interval", "int64"),
        ("Uint32", "uint32"),
        ("UUID", "string"),
        ("InfinityModifier", "int8"),
    ])
}

impl Default for GeneratorConfig {
    /// The canonical encore/sqlc setup.
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("db"),
            source_suffix: ".sql.go".to_string(),
            tasks: vec![
                TaskConfig {
                    name: "pgtype".to_string(),
                    statics: vec![StaticOutput {
                        path: PathBuf::from("db/pgtype.go"),
                        content: PGTYPE_DECLS.to_string(),
                    }],
                    extraction: Some(ExtractionConfig {
                        pattern: StructuralPattern::new("type", "Params"),
                        remap: Some(QualifierRemap::new("pgtype.", "db.")),
                        table: None,
                        header: "package p\n\nimport \"encore.app/db\"".to_string(),
                        output: PathBuf::from("db/params/params.go"),
                    }),
                    patch: None,
                },
                TaskConfig {
                    name: "rows".to_string(),
                    statics: vec![],
                    extraction: Some(ExtractionConfig {
                        pattern: StructuralPattern::new("type", "Row"),
                        remap: Some(QualifierRemap::new("pgtype.", "")),
                        table: Some(row_scalar_table()),
                        header: "package r\n\nimport (\n\t\"time\"\n)".to_string(),
                        output: PathBuf::from("db/rows/rows.go"),
                    }),
                    patch: None,
                },
                TaskConfig {
                    name: "ts".to_string(),
                    statics: vec![],
                    extraction: None,
                    patch: Some(RegionPatch {
                        target: PathBuf::from("src/lib/encore/generated.ts"),
                        marker: r"export\s+namespace\s+pgtype\s*\{".to_string(),
                        content: TS_ALIASES.trim_end().to_string(),
                    }),
                },
            ],
        }
    }
}
