//! Commerce Scaffolder Core - Shared library for the Commerce events scaffolding CLI
//!
//! This library asks a developer which Adobe Commerce events an App Builder
//! extension should listen to, records the answers in an extension manifest
//! and generates the runtime action skeleton from it.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - store configuration check, I/O Events
//!   lookups, action name allocation, manifest merging and file generation
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and the
//!   `Wizard` pipeline driven through the `WizardPrompts` seam
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use commerce_scaffolder_core::{naming::NamingState, manifest::ProjectManifest};
//!
//! let manifest = ProjectManifest::load(Path::new("extension-manifest.json"))?;
//! let naming = NamingState::seeded(manifest.action_names());
//! let proposal = naming.propose("order-created", &manifest.action_names());
//! println!("default action name: {}", proposal.name);
//! ```

pub mod commerce;
pub mod config;
pub mod error;
pub mod events;
pub mod manifest;
pub mod naming;
pub mod plugin;
pub mod product;
pub mod scaffold;
pub mod version;
pub mod wizard;

#[cfg(feature = "tui")]
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export main types for convenience
pub use commerce::{ConfigCheckOutcome, ConfigChecker};
pub use error::{CheckInputError, ConfigError, EventsError, ManifestError};
pub use events::{EventMetadata, EventProvider, EventsClient, HttpEventsClient};
pub use manifest::{ActionManifestEntry, ProjectManifest};
pub use naming::NamingState;
pub use plugin::{AioPluginInstaller, PluginInstaller};
pub use product::ProductConfig;
pub use wizard::{Wizard, WizardPrompts};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version fallback; each binary passes its own
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
