//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a product binary implements to configure
//! the wizard: its identity, documentation links and the remote endpoints it
//! talks to.

/// Configuration trait for the scaffolding CLI product
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Documentation links shown next to failures
/// - I/O Events API location
/// - Optional CLI plugin offered during the wizard
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Overview shown before the first question
    fn overview(&self) -> &'static str;

    /// URL for the main product documentation
    fn docs_url(&self) -> &'static str;

    /// URL explaining how to create a Commerce integration and its access token
    fn commerce_integration_doc_url(&self) -> &'static str;

    /// URL explaining how to configure Commerce for I/O Events
    fn commerce_configuration_doc_url(&self) -> &'static str;

    /// Default base URL of the I/O Events API
    fn default_events_api_url(&self) -> &'static str;

    /// Environment variable name for overriding the I/O Events API URL
    fn events_api_url_env(&self) -> &'static str;

    /// Name of the CLI plugin enabling automatic event subscriptions on deploy
    fn plugin_name(&self) -> &'static str;

    /// Overview shown before offering the plugin installation
    fn plugin_overview(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self) -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
