use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::{
    config::Config,
    error::{AppError, AppResult},
};

const CLI_NAME: &str = "review-vibes";

/// Runs one recommendation and returns its text output
#[async_trait::async_trait]
pub trait RecommendationRunner: Send + Sync {
    async fn run(&self, title: &str, top: usize) -> AppResult<String>;
}

/// Runs the `review-vibes` binary as a child process and captures its stdout
#[derive(Debug, Clone)]
pub struct SubprocessRunner {
    program: PathBuf,
}

impl SubprocessRunner {
    pub fn new(program: PathBuf) -> Self {
        Self { program }
    }

    /// Uses `CLI_PATH` when set, otherwise the CLI next to the running executable
    pub fn from_config(config: &Config) -> AppResult<Self> {
        if let Some(path) = &config.cli_path {
            return Ok(Self::new(path.clone()));
        }

        let current = std::env::current_exe()?;
        let dir = current.parent().ok_or_else(|| {
            AppError::Config("Cannot locate the directory of the running executable".to_string())
        })?;
        Ok(Self::new(
            dir.join(format!("{}{}", CLI_NAME, std::env::consts::EXE_SUFFIX)),
        ))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

#[async_trait::async_trait]
impl RecommendationRunner for SubprocessRunner {
    async fn run(&self, title: &str, top: usize) -> AppResult<String> {
        let output = Command::new(&self.program)
            .arg("--top")
            .arg(top.to_string())
            .arg("--")
            .arg(title)
            .kill_on_drop(true)
            .output()
            .await?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr,
                "Recommendation process failed"
            );
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str(&stderr);
        }

        Ok(text)
    }
}
