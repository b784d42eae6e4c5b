//! Isolated virtual entry builds
//!
//! Each entry is compiled by its own bundler child process inside a scratch
//! directory named with a fresh uuid, so concurrent builds share no bundler
//! state. The entry module text, externals, and output directory cross the
//! process boundary as arguments/environment; the manifest comes back as a
//! file.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::config::EntryDescriptor;
use crate::error::SizewatchError;
use crate::infra::{CommandExecutor, FileSystem, RealCommandExecutor, RealFileSystem};

use super::manifest::Manifest;

/// The result of one isolated entry build.
#[derive(Debug)]
pub struct BuildOutput {
    /// Parsed bundler manifest
    pub manifest: Manifest,
    /// Directory emitted chunk files live under
    pub out_dir: PathBuf,
    /// Scratch directory owning the whole build; remove after measuring
    pub scratch_dir: PathBuf,
}

impl BuildOutput {
    /// Absolute path of an emitted chunk file.
    pub fn chunk_path(&self, emitted_file: &str) -> PathBuf {
        self.out_dir.join(emitted_file)
    }
}

/// Builds one virtual entry module via the bundler.
pub struct BundleBuilder<FS: FileSystem = RealFileSystem, CE: CommandExecutor = RealCommandExecutor>
{
    project_root: PathBuf,
    bundler_cmd: Vec<String>,
    fs: FS,
    executor: CE,
}

impl BundleBuilder {
    /// Create a builder with real filesystem and command execution.
    pub fn new(project_root: impl AsRef<Path>, bundler_cmd: Vec<String>) -> Self {
        Self::with_executors(project_root, bundler_cmd, RealFileSystem, RealCommandExecutor)
    }
}

impl<FS: FileSystem, CE: CommandExecutor> BundleBuilder<FS, CE> {
    /// Create a builder with custom filesystem and command executor
    /// implementations (for testing).
    pub fn with_executors(
        project_root: impl AsRef<Path>,
        bundler_cmd: Vec<String>,
        fs: FS,
        executor: CE,
    ) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
            bundler_cmd,
            fs,
            executor,
        }
    }

    /// Build one entry in isolation and parse its manifest.
    ///
    /// # Errors
    /// Returns [`SizewatchError::BuildFailed`] when the bundler exits
    /// non-zero and [`SizewatchError::ManifestMissing`] when it exits
    /// successfully without emitting a manifest.
    pub fn build(&self, entry: &EntryDescriptor) -> Result<BuildOutput> {
        let scratch_dir = self
            .project_root
            .join(".sizewatch")
            .join("builds")
            .join(uuid::Uuid::new_v4().to_string());
        let out_dir = scratch_dir.join("dist");

        self.fs
            .create_dir_all(&scratch_dir)
            .map_err(|e| SizewatchError::Io {
                context: format!("creating scratch dir for entry '{}'", entry.id),
                source: e,
            })?;

        let entry_file = scratch_dir.join("entry.js");
        self.fs
            .write(&entry_file, entry.entry_module())
            .map_err(|e| SizewatchError::Io {
                context: format!("writing virtual entry for '{}'", entry.id),
                source: e,
            })?;

        debug!("building entry '{}' in {}", entry.id, scratch_dir.display());
        self.run_bundler(entry, &entry_file, &out_dir)?;

        let manifest = self.read_manifest(&out_dir)?;
        Ok(BuildOutput {
            manifest,
            out_dir,
            scratch_dir,
        })
    }

    /// Remove a build's scratch directory.
    pub fn cleanup(&self, output: &BuildOutput) -> Result<()> {
        self.fs
            .remove_dir_all(&output.scratch_dir)
            .with_context(|| format!("removing {}", output.scratch_dir.display()))
    }

    fn run_bundler(
        &self,
        entry: &EntryDescriptor,
        entry_file: &Path,
        out_dir: &Path,
    ) -> Result<()> {
        let program = self
            .bundler_cmd
            .first()
            .map(String::as_str)
            .unwrap_or("npx");
        let args = &self.bundler_cmd[1.min(self.bundler_cmd.len())..];

        let output = self
            .executor
            .execute(
                |cmd| {
                    cmd.args(args)
                        .current_dir(&self.project_root)
                        .env("SIZEWATCH_ENTRY", entry_file)
                        .env("SIZEWATCH_ENTRY_ID", &entry.id)
                        .env("SIZEWATCH_EXTERNALS", entry.externals.join(","))
                        .env("SIZEWATCH_OUT_DIR", out_dir)
                },
                program,
            )
            .map_err(|e| SizewatchError::Io {
                context: format!("spawning bundler '{}'", program),
                source: e,
            })?;

        if !output.status.success() {
            return Err(SizewatchError::BuildFailed {
                entry: entry.id.clone(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }

        Ok(())
    }

    fn read_manifest(&self, out_dir: &Path) -> Result<Manifest> {
        // vite nests its manifest under .vite/; older setups emit it at the
        // output root
        let candidates = [
            out_dir.join(".vite").join("manifest.json"),
            out_dir.join("manifest.json"),
        ];

        for path in &candidates {
            match self.fs.read_to_string(path) {
                Ok(contents) => return Manifest::parse(&contents),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(SizewatchError::Io {
                        context: format!("reading manifest {}", path.display()),
                        source: e,
                    }
                    .into())
                }
            }
        }

        Err(SizewatchError::ManifestMissing {
            path: candidates[0].clone(),
        }
        .into())
    }
}
