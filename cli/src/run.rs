#![deny(missing_docs)]

//! # Run Command
//!
//! Wires the parsed command line to the core pipeline driver:
//! load the task configuration (built-in defaults or a YAML override),
//! run the selected task(s), and report outcomes as human-readable text.

use crate::error::CliResult;
use pgplain_core::{Driver, GeneratorConfig, RunReport};
use std::path::PathBuf;

/// Arguments shared by every task subcommand.
#[derive(clap::Args, Debug, Clone)]
pub struct TaskArgs {
    /// Project root the configured relative paths resolve under.
    #[clap(long, default_value = ".")]
    pub root: PathBuf,

    /// Optional YAML file overriding the built-in task configuration.
    #[clap(long)]
    pub config: Option<PathBuf>,
}

impl TaskArgs {
    fn load_config(&self) -> CliResult<GeneratorConfig> {
        match &self.config {
            Some(path) => Ok(GeneratorConfig::load(path)?),
            None => Ok(GeneratorConfig::default()),
        }
    }
}

/// Runs one task by identifier.
pub fn execute(task: &str, args: &TaskArgs) -> CliResult<()> {
    let driver = Driver::new(&args.root, args.load_config()?);
    println!("Running task '{}' under {:?}...", task, args.root);
    let report = driver.run_task(task)?;
    print_report(&report);
    Ok(())
}

/// Runs every configured task in declaration order.
pub fn execute_all(args: &TaskArgs) -> CliResult<()> {
    let driver = Driver::new(&args.root, args.load_config()?);
    println!("Running all tasks under {:?}...", args.root);
    for report in driver.run_all()? {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &RunReport) {
    for notice in &report.notices {
        eprintln!("[{}] notice: {}", report.task, notice);
    }
    for path in &report.written {
        println!("[{}] wrote {:?}", report.task, path);
    }
    println!("[{}] done.", report.task);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_execute_pgtype_against_temp_tree() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("db");
        fs::create_dir_all(&db).unwrap();
        fs::write(
            db.join("users.sql.go"),
            "type CreateUserParams struct {\n\tEmail pgtype.Text\n}\n",
        )
        .unwrap();

        let args = TaskArgs {
            root: dir.path().to_path_buf(),
            config: None,
        };
        execute("pgtype", &args).unwrap();

        let params = fs::read_to_string(dir.path().join("db/params/params.go")).unwrap();
        assert!(params.contains("Email db.Text"));
    }

    #[test]
    fn test_execute_unknown_task_fails() {
        let dir = tempdir().unwrap();
        let args = TaskArgs {
            root: dir.path().to_path_buf(),
            config: None,
        };
        assert!(execute("bogus", &args).is_err());
    }

    #[test]
    fn test_config_override_is_honored() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("input")).unwrap();
        fs::write(
            dir.path().join("input/one.sql.go"),
            "type PingParams struct {\n\tAt pgtype.Timestamptz\n}\n",
        )
        .unwrap();

        // Minimal YAML: one task, custom source dir and output, strip-only.
        let yaml = r#"
source_dir: input
source_suffix: .sql.go
tasks:
  - name: custom
    extraction:
      pattern:
        keyword: type
        suffix: Params
      remap:
        from: "pgtype."
        to: ""
      header: "package q"
      output: out/custom.go
"#;
        let cfg_path = dir.path().join("pgplain.yaml");
        fs::write(&cfg_path, yaml).unwrap();

        let args = TaskArgs {
            root: dir.path().to_path_buf(),
            config: Some(cfg_path),
        };
        execute("custom", &args).unwrap();

        let out = fs::read_to_string(dir.path().join("out/custom.go")).unwrap();
        assert!(out.starts_with("package q\n"));
        assert!(out.contains("At Timestamptz"));
    }
}
