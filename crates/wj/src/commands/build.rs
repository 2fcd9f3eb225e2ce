//! `webjson <source> <output>` implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use wj_config::{CliSettings, Config};
use wj_site::{
    BuildConfig, BuildError, BuildEvent, BuildReport, FileReport, Outcome, SiteBuilder,
};
use wj_storage::{FsStorage, Storage};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for building a site.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Source directory followed by output directory.
    #[arg(value_name = "DIR")]
    pub paths: Vec<PathBuf>,

    /// Path to configuration file (default: auto-discover webjson.toml).
    #[arg(short, long, env = "WEBJSON_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output (list every processed file and directory).
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    /// Source and output directories.
    ///
    /// Returns `None` when no directories were given.
    pub(crate) fn dirs(&self) -> Result<Option<(&Path, &Path)>, CliError> {
        match self.paths.as_slice() {
            [] => Ok(None),
            [source, output] => Ok(Some((source.as_path(), output.as_path()))),
            _ => Err(CliError::InvalidArguments),
        }
    }

    /// Execute the build.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the source directory is
    /// invalid, or an output directory can't be created.
    pub(crate) fn execute(&self, source: &Path, output_dir: &Path) -> Result<(), CliError> {
        let output = Output::new();
        let storage: Arc<dyn Storage> = Arc::new(FsStorage::new());

        // A bad source directory wins over any config problem
        if !storage.is_dir(source) {
            return Err(BuildError::InvalidSourceDir(source.to_path_buf()).into());
        }

        let cli_settings = CliSettings {
            source_dir: Some(source.to_path_buf()),
            output_dir: Some(output_dir.to_path_buf()),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::info!(path = %path.display(), "Loaded configuration");
        }

        let builder = SiteBuilder::new(storage, BuildConfig::from_config(&config));

        let report = builder.build_with(&mut |event| self.print_event(&output, &event))?;

        print_summary(&output, &report);
        Ok(())
    }

    fn print_event(&self, output: &Output, event: &BuildEvent<'_>) {
        match event {
            BuildEvent::EnterDir { relative } => {
                if self.verbose {
                    output.detail(&format!("Processing directory: {}", display_dir(relative)));
                }
            }
            BuildEvent::File(file) => self.print_file(output, file),
        }
    }

    fn print_file(&self, output: &Output, file: &FileReport) {
        let source = file.source.display();
        match &file.outcome {
            Outcome::Rendered {
                output: path,
                warnings,
                ..
            } => {
                if self.verbose {
                    output.info(&format!("  {source} -> {}", path.display()));
                }
                for warning in warnings {
                    output.warning(&format!("  {source}: {warning}"));
                }
            }
            Outcome::Copied { output: path } => {
                if self.verbose {
                    output.detail(&format!("  {source} -> {}", path.display()));
                }
            }
            Outcome::Skipped(err) => output.warning(&format!("  {source}: {err}")),
            Outcome::Failed(err) => output.error(&format!("  {source}: {err}")),
        }
    }
}

fn display_dir(relative: &Path) -> String {
    if relative.as_os_str().is_empty() {
        ".".to_owned()
    } else {
        relative.display().to_string()
    }
}

fn print_summary(output: &Output, report: &BuildReport) {
    let summary = format!(
        "{} rendered, {} copied, {} skipped, {} failed",
        report.rendered(),
        report.copied(),
        report.skipped(),
        report.failed(),
    );
    if report.failed() > 0 {
        output.warning(&format!("Build finished with errors: {summary}"));
    } else {
        output.success(&format!("Build complete: {summary}"));
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn args(paths: &[&str]) -> BuildArgs {
        BuildArgs {
            paths: paths.iter().map(PathBuf::from).collect(),
            config: None,
            verbose: false,
        }
    }

    #[test]
    fn test_dirs_none() {
        assert!(args(&[]).dirs().unwrap().is_none());
    }

    #[test]
    fn test_dirs_pair() {
        let args = args(&["site", "public"]);

        let (source, output) = args.dirs().unwrap().unwrap();

        assert_eq!(source, Path::new("site"));
        assert_eq!(output, Path::new("public"));
    }

    #[test]
    fn test_dirs_wrong_count() {
        assert!(matches!(
            args(&["site"]).dirs(),
            Err(CliError::InvalidArguments)
        ));
        assert!(matches!(
            args(&["a", "b", "c"]).dirs(),
            Err(CliError::InvalidArguments)
        ));
    }

    #[test]
    fn test_display_dir() {
        assert_eq!(display_dir(Path::new("")), ".");
        assert_eq!(display_dir(Path::new("blog")), "blog");
    }

    #[test]
    fn test_execute_invalid_source() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("webjson.toml");
        std::fs::write(&config, "").unwrap();
        let args = BuildArgs {
            paths: Vec::new(),
            config: Some(config),
            verbose: false,
        };

        let err = args
            .execute(&dir.path().join("missing"), &dir.path().join("out"))
            .unwrap_err();

        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_execute_invalid_source_before_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("webjson.toml");
        std::fs::write(&config, "[layout").unwrap();
        let args = BuildArgs {
            paths: Vec::new(),
            config: Some(config),
            verbose: false,
        };

        let err = args
            .execute(&dir.path().join("missing"), &dir.path().join("out"))
            .unwrap_err();

        assert!(matches!(err, CliError::Build(BuildError::InvalidSourceDir(_))));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_execute_does_not_publish_config() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("site");
        let out = dir.path().join("public");
        std::fs::create_dir_all(&src).unwrap();
        std::fs::write(src.join("webjson.toml"), "[pages]\n").unwrap();
        std::fs::write(src.join("site.css"), "body {}").unwrap();
        let args = BuildArgs {
            paths: Vec::new(),
            config: Some(src.join("webjson.toml")),
            verbose: false,
        };

        args.execute(&src, &out).unwrap();

        assert!(out.join("site.css").exists());
        assert!(!out.join("webjson.toml").exists());
    }

    #[test]
    fn test_execute_builds_site() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("site");
        let out = dir.path().join("public");
        std::fs::create_dir_all(src.join("_templates")).unwrap();
        std::fs::write(src.join("_templates/base.html"), "<p>[{title}]</p>").unwrap();
        std::fs::write(src.join("page.json"), r#"{"template":"base","title":"Hello"}"#)
            .unwrap();
        std::fs::write(src.join("draft.json"), r#"{"title":"untitled"}"#).unwrap();
        let config = dir.path().join("webjson.toml");
        std::fs::write(&config, "").unwrap();
        let args = BuildArgs {
            paths: Vec::new(),
            config: Some(config),
            verbose: true,
        };

        args.execute(&src, &out).unwrap();

        assert_eq!(
            std::fs::read_to_string(out.join("page.html")).unwrap(),
            "<p>Hello</p>"
        );
        assert!(!out.join("draft.html").exists());
    }
}
