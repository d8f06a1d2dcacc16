//! Optional CLI plugin installation
//!
//! The wizard can offer to install the plugin that subscribes deployed
//! actions to their events automatically. Installing it mutates the host
//! environment, so it sits behind `PluginInstaller` and the wizard only calls
//! the capability.

use anyhow::Result;
use colored::Colorize;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Timeout for installation (plugins are fetched from the npm registry)
const INSTALL_TIMEOUT: Duration = Duration::from_secs(120);

/// Capability to detect and install the optional CLI plugin
#[allow(async_fn_in_trait)]
pub trait PluginInstaller {
    /// Package name of the plugin
    fn plugin_name(&self) -> &str;

    /// Check whether the plugin is already installed
    async fn is_installed(&self) -> bool;

    /// Install the plugin
    async fn install(&self) -> Result<()>;
}

/// Installs plugins through the `aio` CLI
#[derive(Debug, Clone)]
pub struct AioPluginInstaller {
    /// Name of the host CLI binary
    cli: String,
    plugin_name: String,
}

impl AioPluginInstaller {
    pub fn new(plugin_name: impl Into<String>) -> Self {
        Self {
            cli: "aio".to_string(),
            plugin_name: plugin_name.into(),
        }
    }

    /// Use another host CLI binary
    pub fn with_cli(mut self, cli: impl Into<String>) -> Self {
        self.cli = cli.into();
        self
    }

    /// Get the install command string
    pub fn install_command(&self) -> String {
        format!("{} plugins:install {}", self.cli, self.plugin_name)
    }
}

impl PluginInstaller for AioPluginInstaller {
    fn plugin_name(&self) -> &str {
        &self.plugin_name
    }

    async fn is_installed(&self) -> bool {
        let output = TokioCommand::new(&self.cli)
            .arg("plugins")
            .stdin(Stdio::null())
            .output()
            .await;

        match output {
            Ok(output) if output.status.success() => {
                String::from_utf8_lossy(&output.stdout).contains(&self.plugin_name)
            }
            Ok(output) => {
                tracing::debug!("`{} plugins` exited with {}", self.cli, output.status);
                false
            }
            Err(e) => {
                tracing::debug!("Could not run `{} plugins`: {}", self.cli, e);
                false
            }
        }
    }

    /// Shows the command being executed and streams output
    async fn install(&self) -> Result<()> {
        let cmd = self.install_command();
        println!();
        println!("{} {}", "Running:".dimmed(), cmd.yellow());
        println!();

        let mut child = TokioCommand::new(&self.cli)
            .arg("plugins:install")
            .arg(&self.plugin_name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            anyhow::bail!("Failed to capture installer output");
        };

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();

        let output_task = async {
            loop {
                tokio::select! {
                    line = stdout_reader.next_line() => {
                        match line {
                            Ok(Some(line)) => println!("  {}", line),
                            Ok(None) => break,
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stdout:".red(), e);
                                break;
                            }
                        }
                    }
                    line = stderr_reader.next_line() => {
                        match line {
                            Ok(Some(line)) => eprintln!("  {}", line.yellow()),
                            Ok(None) => {}
                            Err(e) => {
                                eprintln!("{} {}", "Error reading stderr:".red(), e);
                            }
                        }
                    }
                }
            }
        };

        if timeout(INSTALL_TIMEOUT, output_task).await.is_err() {
            let _ = child.kill().await;
            println!();
            anyhow::bail!(
                "Installation timed out after {} seconds.\n\
                 Please try again later or install manually:\n\
                 {}",
                INSTALL_TIMEOUT.as_secs(),
                cmd
            );
        }

        match timeout(Duration::from_secs(5), child.wait()).await {
            Ok(Ok(status)) => {
                println!();
                if status.success() {
                    Ok(())
                } else {
                    anyhow::bail!(
                        "Installation failed with exit code: {}\n\
                         Please try installing manually: {}",
                        status.code().unwrap_or(-1),
                        cmd
                    );
                }
            }
            Ok(Err(e)) => {
                anyhow::bail!("Failed to wait for installer: {}", e);
            }
            Err(_) => {
                let _ = child.kill().await;
                anyhow::bail!(
                    "Installation process hung. Please try installing manually:\n{}",
                    cmd
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_command() {
        let installer = AioPluginInstaller::new("@adobe/aio-cli-plugin-extension");
        assert_eq!(
            installer.install_command(),
            "aio plugins:install @adobe/aio-cli-plugin-extension"
        );
    }

    #[tokio::test]
    async fn test_missing_cli_reports_not_installed() {
        let installer = AioPluginInstaller::new("some-plugin")
            .with_cli("definitely-not-a-real-cli-binary-4f1c");
        assert!(!installer.is_installed().await);
        assert!(installer.install().await.is_err());
    }
}
