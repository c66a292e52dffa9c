#![deny(missing_docs)]

//! # Pipeline Driver
//!
//! Orchestrates one task invocation:
//! `Idle -> Extracting -> Projecting -> Assembling -> Replacing -> Done`,
//! with `Failed` reachable from any step. No retries.
//!
//! Every output is staged in memory first; the filesystem is only touched in
//! a final commit of atomic writes after all steps succeeded. A failed
//! invocation therefore writes nothing, instead of the mixed state a
//! step-by-step writer would leave behind.
//!
//! Source units are enumerated under the configured directory and sorted by
//! path, so block order in the output never depends on filesystem enumeration
//! order.

use crate::assembler::{write_atomic, Artifact};
use crate::config::{GeneratorConfig, TaskConfig};
use crate::error::{AppError, AppResult};
use crate::extractor::{extract_blocks, SourceUnit};
use crate::region::replace_region;
use crate::type_mapping::Projector;
use derive_more::Display;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Steps of one task invocation, in execution order.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nothing started yet.
    #[display("idle")]
    Idle,
    /// Scanning source units for structural blocks.
    #[display("extracting")]
    Extracting,
    /// Applying the type substitution passes.
    #[display("projecting")]
    Projecting,
    /// Rendering artifacts and staging them.
    #[display("assembling")]
    Assembling,
    /// Patching the foreign artifact's delimited region.
    #[display("replacing")]
    Replacing,
    /// All steps succeeded and the staging set was committed.
    #[display("done")]
    Done,
    /// A step reported a terminal diagnostic.
    #[display("failed")]
    Failed,
}

/// Outcome of one successful task invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Task identifier that ran.
    pub task: String,
    /// Terminal stage; always `Done` for a report that was returned at all.
    pub stage: Stage,
    /// Paths committed to disk, in commit order.
    pub written: Vec<PathBuf>,
    /// Soft conditions reported along the way (skipped steps, empty scans).
    pub notices: Vec<String>,
}

/// Drives task invocations against one project root.
pub struct Driver {
    root: PathBuf,
    config: GeneratorConfig,
}

impl Driver {
    /// Creates a driver for `root` with the given configuration.
    pub fn new(root: impl Into<PathBuf>, config: GeneratorConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Runs a single task by identifier.
    pub fn run_task(&self, name: &str) -> AppResult<RunReport> {
        let task = self
            .config
            .task(name)
            .ok_or_else(|| AppError::General(format!("Unknown task '{}'", name)))?;
        self.run(task)
    }

    /// Runs every configured task in declaration order, stopping at the first
    /// failure. Tasks already committed stay committed; each task commits
    /// atomically on its own.
    pub fn run_all(&self) -> AppResult<Vec<RunReport>> {
        self.config.tasks.iter().map(|t| self.run(t)).collect()
    }

    fn run(&self, task: &TaskConfig) -> AppResult<RunReport> {
        let mut stage = Stage::Idle;
        let mut staged: Vec<(PathBuf, String)> = Vec::new();
        let mut notices = Vec::new();

        for static_out in &task.statics {
            staged.push((self.root.join(&static_out.path), static_out.content.clone()));
        }

        if let Some(ext) = &task.extraction {
            stage = Stage::Extracting;
            let units = self.collect_units().map_err(|e| at(stage, e))?;
            let mut blocks = Vec::new();
            for unit in &units {
                blocks.extend(extract_blocks(unit, &ext.pattern).map_err(|e| at(stage, e))?);
            }
            if blocks.is_empty() {
                notices.push(format!(
                    "no '*{}' declarations found under {:?}",
                    ext.pattern.suffix,
                    self.root.join(&self.config.source_dir)
                ));
            }

            stage = Stage::Projecting;
            let projector =
                Projector::new(ext.remap.clone(), ext.table.as_ref()).map_err(|e| at(stage, e))?;
            let projected: Vec<String> = blocks.iter().map(|b| projector.project(&b.text)).collect();

            stage = Stage::Assembling;
            let artifact = Artifact::new(ext.header.clone(), projected);
            staged.push((self.root.join(&ext.output), artifact.render()));
        }

        if let Some(patch) = &task.patch {
            stage = Stage::Replacing;
            let target = self.root.join(&patch.target);
            let source = std::fs::read_to_string(&target).map_err(|e| at(stage, e.into()))?;
            let marker = Regex::new(&patch.marker)
                .map_err(|e| at(stage, AppError::General(format!("Invalid marker: {}", e))))?;

            match replace_region(&source, &marker, &patch.content).map_err(|e| at(stage, e))? {
                Some(new_text) => staged.push((target, new_text)),
                None => notices.push(format!(
                    "marker '{}' not found in {:?}; file left untouched",
                    patch.marker, target
                )),
            }
        }

        let mut written = Vec::new();
        for (path, content) in staged {
            write_atomic(&path, &content).map_err(|e| at(stage, e))?;
            written.push(path);
        }

        Ok(RunReport {
            task: task.name.clone(),
            stage: Stage::Done,
            written,
            notices,
        })
    }

    /// Enumerates source units in canonical (sorted path) order.
    fn collect_units(&self) -> AppResult<Vec<SourceUnit>> {
        let dir = self.root.join(&self.config.source_dir);
        if !dir.exists() {
            return Err(AppError::General(format!(
                "Source directory not found: {:?}",
                dir
            )));
        }

        let mut paths: Vec<PathBuf> = WalkDir::new(&dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| is_source_unit(e.path(), &self.config.source_suffix))
            .map(|e| e.into_path())
            .collect();
        paths.sort();

        paths.iter().map(|p| SourceUnit::read(p)).collect()
    }
}

/// Attaches the failing stage to a diagnostic.
fn at(stage: Stage, err: AppError) -> AppError {
    match err {
        AppError::Pattern(m) => AppError::Pattern(format!("{} [{}]: {}", Stage::Failed, stage, m)),
        AppError::General(m) => AppError::General(format!("{} [{}]: {}", Stage::Failed, stage, m)),
        AppError::Io(e) => AppError::General(format!("{} [{}]: IO Error: {}", Stage::Failed, stage, e)),
    }
}

/// Convenience: whether `path` looks like a source unit for `suffix`.
///
/// Split out for direct testing of the discovery filter.
pub fn is_source_unit(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use std::fs;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_is_source_unit() {
        assert!(is_source_unit(Path::new("db/users.sql.go"), ".sql.go"));
        assert!(!is_source_unit(Path::new("db/users.go"), ".sql.go"));
        assert!(!is_source_unit(Path::new("db"), ".sql.go"));
    }

    #[test]
    fn test_unknown_task_is_an_error() {
        let dir = tempdir().unwrap();
        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        assert!(driver.run_task("nope").is_err());
    }

    #[test]
    fn test_missing_source_dir_fails_before_any_write() {
        let dir = tempdir().unwrap();
        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        let res = driver.run_task("pgtype");
        assert!(res.is_err());
        // Staging discipline: the static pgtype.go must not exist either.
        assert!(!dir.path().join("db/pgtype.go").exists());
    }

    #[test]
    fn test_pgtype_task_emits_static_and_params_artifact() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "db/users.sql.go",
            "package db\n\ntype CreateUserParams struct {\n\tEmail pgtype.Text `json:\"email\"`\n}\n",
        );

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        let report = driver.run_task("pgtype").unwrap();

        assert_eq!(report.written.len(), 2);
        assert!(dir.path().join("db/pgtype.go").exists());

        let params = fs::read_to_string(dir.path().join("db/params/params.go")).unwrap();
        assert!(params.starts_with("package p\n\nimport \"encore.app/db\"\n"));
        assert!(params.contains("Email db.Text `json:\"email\"`"));
        assert!(!params.contains("pgtype."));
    }

    #[test]
    fn test_rows_task_projects_to_plain_scalars() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "db/users.sql.go",
            "package db\n\ntype GetUserRow struct {\n\tName pgtype.Text\n\tAt pgtype.Timestamptz\n}\n",
        );

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        driver.run_task("rows").unwrap();

        let rows = fs::read_to_string(dir.path().join("db/rows/rows.go")).unwrap();
        assert!(rows.starts_with("package r\n"));
        assert!(rows.contains("Name string"));
        assert!(rows.contains("At time.Time"));
    }

    #[test]
    fn test_block_order_follows_sorted_unit_paths() {
        let dir = tempdir().unwrap();
        // Written in reverse name order; output must follow sorted paths.
        write(
            dir.path(),
            "db/z_last.sql.go",
            "type ZParams struct {\n\tX string\n}\n",
        );
        write(
            dir.path(),
            "db/a_first.sql.go",
            "type AParams struct {\n\tY string\n}\n",
        );

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        driver.run_task("pgtype").unwrap();

        let params = fs::read_to_string(dir.path().join("db/params/params.go")).unwrap();
        let a = params.find("AParams").unwrap();
        let z = params.find("ZParams").unwrap();
        assert!(a < z);
    }

    #[test]
    fn test_regeneration_is_idempotent() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "db/users.sql.go",
            "type CreateUserParams struct {\n\tEmail pgtype.Text\n}\n",
        );

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        driver.run_task("pgtype").unwrap();
        let first = fs::read_to_string(dir.path().join("db/params/params.go")).unwrap();
        driver.run_task("pgtype").unwrap();
        let second = fs::read_to_string(dir.path().join("db/params/params.go")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_ts_task_replaces_namespace_region() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "src/lib/encore/generated.ts",
            "// client\nexport namespace pgtype {\n  old: { nested: { stuff: 1 } }\n}\nexport const keep = 1;\n",
        );

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        let report = driver.run_task("ts").unwrap();
        assert_eq!(report.written.len(), 1);

        let patched =
            fs::read_to_string(dir.path().join("src/lib/encore/generated.ts")).unwrap();
        assert!(patched.contains("export type Text = string | null"));
        assert!(patched.contains("export const keep = 1;"));
        assert!(!patched.contains("nested"));
    }

    #[test]
    fn test_ts_task_missing_marker_is_soft_noop() {
        let dir = tempdir().unwrap();
        let original = "// client without the namespace\nexport const keep = 1;\n";
        write(dir.path(), "src/lib/encore/generated.ts", original);

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        let report = driver.run_task("ts").unwrap();

        assert!(report.written.is_empty());
        assert_eq!(report.notices.len(), 1);
        let untouched =
            fs::read_to_string(dir.path().join("src/lib/encore/generated.ts")).unwrap();
        assert_eq!(untouched, original);
    }

    #[test]
    fn test_nested_body_aborts_without_commit() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "db/bad.sql.go",
            "type BadParams struct {\n\tInner struct {\n\t\tX int\n\t}\n}\n",
        );

        let driver = Driver::new(dir.path(), GeneratorConfig::default());
        let res = driver.run_task("pgtype");
        assert!(matches!(res, Err(AppError::Pattern(_))));
        // Nothing committed, not even the static blob.
        assert!(!dir.path().join("db/pgtype.go").exists());
        assert!(!dir.path().join("db/params/params.go").exists());
    }
}
