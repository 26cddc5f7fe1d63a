use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{Error, ErrorKind, Result};

pub const DEFAULT_PROGRAM: &str = "latexmk";
pub const DEFAULT_PACKAGE_MANAGER: &str = "tlmgr";

/// Turns a rendered document into a PDF by running an external tool.
#[derive(Debug, Clone)]
pub struct DocumentCompiler {
    program: String,
    base_args: Vec<String>,
    package_manager: String,
}

impl Default for DocumentCompiler {
    fn default() -> Self {
        DocumentCompiler {
            program: DEFAULT_PROGRAM.to_owned(),
            base_args: vec!["--pdf".to_owned()],
            package_manager: DEFAULT_PACKAGE_MANAGER.to_owned(),
        }
    }
}

impl DocumentCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn program(mut self, program: &str) -> Self {
        self.program = program.to_owned();
        self
    }

    pub fn package_manager(mut self, program: &str) -> Self {
        self.package_manager = program.to_owned();
        self
    }

    /// Runs `<program> <args...> <extra_args...> <file name>` inside the
    /// document's directory and returns the path of the produced PDF.
    pub fn compile<S: AsRef<str>>(&self, document: &Path, extra_args: &[S]) -> Result<PathBuf> {
        if !document.is_file() {
            return Err(Error::new(
                ErrorKind::IOError(io::Error::from(io::ErrorKind::NotFound)),
                &format!("'{}' is not a file", document.display()),
            ));
        }

        let file_name = document.file_name().unwrap_or_default();
        let workdir = match document.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        log::info!("Compiling '{}' with {}", document.display(), self.program);

        let status = Command::new(&self.program)
            .args(&self.base_args)
            .args(extra_args.iter().map(AsRef::<str>::as_ref))
            .arg(file_name)
            .current_dir(workdir)
            .status()
            .map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => Error::new(
                    ErrorKind::ToolNotFound,
                    &format!(
                        "'{}' not found in PATH, install it to compile documents",
                        self.program
                    ),
                ),
                _ => Error::from(err),
            })?;

        if !status.success() {
            return Err(Error::new(
                ErrorKind::CompileFailed(status),
                &format!("{} could not compile '{}'", self.program, document.display()),
            ));
        }

        Ok(document.with_extension("pdf"))
    }

    /// Asks the TeX package manager about each package and returns the ones it
    /// does not report as installed. Without a package manager nothing can be
    /// verified and the result is empty.
    pub fn check_packages<S: AsRef<str>>(&self, packages: &[S]) -> Vec<String> {
        let available = Command::new(&self.package_manager)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok();

        if !available {
            log::debug!(
                "{} not found; cannot verify TeX packages",
                self.package_manager
            );
            return Vec::new();
        }

        packages
            .iter()
            .map(AsRef::<str>::as_ref)
            .filter(|pkg| {
                let installed = Command::new(&self.package_manager)
                    .arg("info")
                    .arg(pkg)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .map(|status| status.success())
                    .unwrap_or(false);

                if !installed {
                    log::warn!(
                        "TeX package '{}' not reported as installed by {}. Consider: {} install {}",
                        pkg,
                        self.package_manager,
                        self.package_manager,
                        pkg
                    );
                }
                !installed
            })
            .map(str::to_owned)
            .collect()
    }
}
