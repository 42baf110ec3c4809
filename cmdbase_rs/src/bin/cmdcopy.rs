//! cmdcopy - copies a file or, with /S, the contents of a directory tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use globset::{Glob, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;

use cmdbase::cli::{Application, Context, ensure_count, exit_code, run_main, unknown_switch_among};
use cmdbase::error::{AppError, ErrorKind, InitError, Message};
use cmdbase::messages::{Catalog, MessageProvider};
use cmdbase::types::{EXIT_UNHANDLED, Level};

const CATALOG: &str = include_str!("../../messages/copy.toml");

const KNOWN_SWITCHES: &[&str] = &["/S", "/Y", "/EXCLUDE"];

struct CopyTool {
    catalog: Catalog,
    source: PathBuf,
    destination: PathBuf,
    recurse: bool,
    overwrite: bool,
    excludes: GlobSetBuilder,
    copied: usize,
    skipped: usize,
}

impl CopyTool {
    fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            source: PathBuf::new(),
            destination: PathBuf::from("."),
            recurse: false,
            overwrite: false,
            excludes: GlobSetBuilder::new(),
            copied: 0,
            skipped: 0,
        }
    }

    fn copy_file(&mut self, ctx: &mut Context, from: &Path, to: &Path) -> Result<(), AppError> {
        let (from_text, to_text) = (from.display().to_string(), to.display().to_string());
        if to.exists() && !self.overwrite {
            ctx.message(Level::Warning, "copy.skipped", &[&to_text]);
            self.skipped += 1;
            return Ok(());
        }
        fs::copy(from, to).map_err(|err| {
            AppError::new(
                ErrorKind::InvalidArguments,
                Message::new("copy.failed", vec![from_text.clone(), to_text.clone()]),
            )
            .with_source(err)
        })?;
        ctx.message(Level::Verbose, "copy.copied", &[&from_text, &to_text]);
        self.copied += 1;
        Ok(())
    }

    fn copy_tree(&mut self, ctx: &mut Context, excludes: &GlobSet) -> anyhow::Result<()> {
        let source = self.source.clone();
        let target_root = self.destination.clone();
        fs::create_dir_all(&target_root)?;
        // A destination inside the source must not be copied into itself.
        let target_identity = fs::canonicalize(&target_root)?;

        let walker = WalkDir::new(&source)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                if entry.file_type().is_dir()
                    && fs::canonicalize(entry.path()).is_ok_and(|path| path == target_identity)
                {
                    tracing::debug!(path = %entry.path().display(), "skipping destination");
                    return false;
                }
                let excluded = excludes.is_match(entry.file_name());
                if excluded {
                    tracing::debug!(path = %entry.path().display(), "excluded");
                }
                !excluded
            });

        for entry in walker {
            let entry = entry?;
            let relative = entry.path().strip_prefix(&source)?;
            let target = target_root.join(relative);
            if entry.file_type().is_dir() {
                fs::create_dir_all(&target)?;
            } else {
                self.copy_file(ctx, entry.path(), &target)?;
            }
        }
        Ok(())
    }
}

impl Application for CopyTool {
    fn catalog(&self) -> Box<dyn MessageProvider> {
        Box::new(self.catalog.clone())
    }

    fn validate_arguments(
        &mut self,
        _ctx: &mut Context,
        arguments: Option<&[String]>,
    ) -> anyhow::Result<()> {
        ensure_count(arguments, 1, 2, None)?;
        let arguments = arguments.unwrap_or_default();
        self.source = PathBuf::from(&arguments[0]);
        if let Some(destination) = arguments.get(1) {
            self.destination = PathBuf::from(destination);
        }
        Ok(())
    }

    fn validate_switch(
        &mut self,
        _ctx: &mut Context,
        name: &str,
        values: &[String],
    ) -> anyhow::Result<()> {
        match name.to_uppercase().as_str() {
            "/S" => {
                ensure_count(Some(values), 0, 0, Some(name))?;
                self.recurse = true;
            }
            "/Y" => {
                ensure_count(Some(values), 0, 0, Some(name))?;
                self.overwrite = true;
            }
            "/EXCLUDE" => {
                ensure_count(Some(values), 1, usize::MAX, Some(name))?;
                for pattern in values {
                    let glob = Glob::new(pattern).map_err(|err| {
                        AppError::invalid_arguments_keyed("copy.bad_pattern", vec![pattern.clone()])
                            .with_source(err)
                    })?;
                    self.excludes.add(glob);
                }
            }
            _ => return Err(unknown_switch_among(name, KNOWN_SWITCHES).into()),
        }
        Ok(())
    }

    fn run(&mut self, ctx: &mut Context) -> anyhow::Result<()> {
        let source_text = self.source.display().to_string();
        if !self.source.exists() {
            return Err(
                AppError::invalid_arguments_keyed("copy.missing_source", vec![source_text]).into(),
            );
        }

        let excludes = self.excludes.build()?;

        if self.source.is_dir() {
            if !self.recurse {
                return Err(AppError::invalid_arguments_keyed(
                    "copy.directory_needs_s",
                    vec![source_text],
                )
                .into());
            }
            self.copy_tree(ctx, &excludes)?;
        } else {
            let name = self.source.file_name().unwrap_or_default();
            if excludes.is_match(name) {
                ctx.message(Level::Verbose, "copy.excluded", &[&source_text]);
            } else {
                let target = if self.destination.is_dir() {
                    self.destination.join(name)
                } else {
                    self.destination.clone()
                };
                let source = self.source.clone();
                self.copy_file(ctx, &source, &target)?;
            }
        }

        let (copied, skipped) = (self.copied.to_string(), self.skipped.to_string());
        ctx.message(Level::Normal, "copy.summary", &[&copied, &skipped]);
        if self.skipped > 0 {
            ctx.set_return_value(1);
        }
        Ok(())
    }
}

fn main() -> ExitCode {
    let catalog = match Catalog::from_toml_str(CATALOG) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("fatal: {}", InitError::from(err));
            return exit_code(EXIT_UNHANDLED);
        }
    };
    run_main(CopyTool::new(catalog))
}
