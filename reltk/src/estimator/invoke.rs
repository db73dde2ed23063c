use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crate::error::Error;

/// Estimator stdout and stderr end up here inside the scratch directory
pub const ESTIMATOR_LOG: &str = "estimator.log";

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const LOG_TAIL_LINES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Platform {
    Linux,
    #[cfg_attr(feature = "clap", value(name = "macos"))]
    MacOs,
    Windows,
}

impl Platform {
    pub fn current() -> Result<Self, Error> {
        match std::env::consts::OS {
            "linux" => Ok(Self::Linux),
            "macos" => Ok(Self::MacOs),
            "windows" => Ok(Self::Windows),
            os => Err(Error::Configuration(format!(
                "the estimator is not distributed for operating system {os:?}"
            ))),
        }
    }

    pub fn executable(&self) -> &'static str {
        match self {
            Self::Linux => "relatedness_linux",
            Self::MacOs => "relatedness_macos",
            Self::Windows => "relatedness_win.exe",
        }
    }

    /// Shared libraries that have to sit next to the executable
    pub fn libraries(&self) -> &'static [&'static str] {
        match self {
            Self::Windows => &["libiomp5md.dll", "libmmd.dll"],
            Self::Linux | Self::MacOs => &[],
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match *self {
            Self::Linux => write!(f, "Linux"),
            Self::MacOs => write!(f, "macOS"),
            Self::Windows => write!(f, "Windows"),
        }
    }
}

/// Estimator files for one platform inside an installation directory
#[derive(Debug, Clone, PartialEq)]
pub struct Installation {
    dir: PathBuf,
    platform: Platform,
}

impl Installation {
    pub fn new(dir: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            dir: dir.into(),
            platform,
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn required_files(&self) -> Vec<&'static str> {
        std::iter::once(self.platform.executable())
            .chain(self.platform.libraries().iter().copied())
            .collect()
    }

    /// Check that every required file is present. Touches nothing on disk.
    pub fn verify(&self) -> Result<(), Error> {
        for name in self.required_files() {
            let path = self.dir.join(name);
            if !path.is_file() {
                return Err(Error::DependencyMissing { path });
            }
        }
        tracing::debug!(
            "Found {} estimator files for {} in {:?}",
            self.required_files().len(),
            self.platform,
            self.dir
        );
        Ok(())
    }

    /// Copy the estimator files into `scratch` and return the absolute path of the staged executable
    pub fn stage(&self, scratch: &Path) -> Result<PathBuf, Error> {
        self.verify()?;
        std::fs::create_dir_all(scratch).map_err(|e| Error::io(scratch, e))?;

        for name in self.required_files() {
            let (src, dest) = (self.dir.join(name), scratch.join(name));

            if is_same_file(&src, &dest) {
                tracing::debug!("{src:?} already in the scratch directory");
                continue;
            }

            std::fs::copy(&src, &dest).map_err(|e| Error::io(&dest, e))?;
            tracing::trace!("Staged {src:?} -> {dest:?}");
        }

        let executable = scratch.join(self.platform.executable());
        std::fs::canonicalize(&executable).map_err(|e| Error::io(&executable, e))
    }
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Run the estimator inside `scratch` and block until it exits.
///
/// The child gets `scratch` as its working directory, the working directory of
/// this process is never changed. A non-zero exit status is only logged, a run
/// that failed silently is caught when its report is parsed.
pub fn run_estimator(
    executable: &Path,
    scratch: &Path,
    control_file: &str,
    timeout: Option<Duration>,
) -> Result<ExitStatus, Error> {
    let log_path = scratch.join(ESTIMATOR_LOG);
    let stdout = File::create(&log_path).map_err(|e| Error::io(&log_path, e))?;
    let stderr = stdout.try_clone().map_err(|e| Error::io(&log_path, e))?;

    tracing::info!("Running the estimator {executable:?} in {scratch:?}");
    let start = Instant::now();

    let mut child = Command::new(executable)
        .arg(control_file)
        .current_dir(scratch)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(|source| Error::Spawn {
            path: executable.to_path_buf(),
            source,
        })?;

    let status = wait_for(&mut child, timeout);
    log_tail(&log_path);
    let status = status?;

    match status.success() {
        true => tracing::info!(
            "Estimator finished in {:.2} s",
            start.elapsed().as_secs_f64()
        ),
        false => tracing::warn!(
            "Estimator exited with {status} after {:.2} s",
            start.elapsed().as_secs_f64()
        ),
    }

    Ok(status)
}

fn wait_for(child: &mut Child, timeout: Option<Duration>) -> Result<ExitStatus, Error> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }

        let elapsed = start.elapsed();
        if elapsed >= timeout {
            tracing::error!("Estimator exceeded the timeout of {timeout:?}, terminating");
            // The child may have exited between try_wait and kill
            if let Err(e) = child.kill() {
                tracing::debug!("Failed to kill the estimator: {e}");
            }
            child.wait()?;
            return Err(Error::Timeout {
                seconds: timeout.as_secs_f64(),
            });
        }

        std::thread::sleep(POLL_INTERVAL.min(timeout - elapsed));
    }
}

fn log_tail(path: &Path) {
    match std::fs::read(path) {
        Ok(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            let lines: Vec<&str> = text.lines().collect();
            for line in &lines[lines.len().saturating_sub(LOG_TAIL_LINES)..] {
                tracing::debug!("estimator: {line}");
            }
        }
        Err(e) => tracing::debug!("Cannot read the estimator log {path:?}: {e}"),
    }
}
