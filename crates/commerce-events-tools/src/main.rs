//! commerce-events CLI - Scaffolding for Adobe Commerce event-driven extensions

use anyhow::Result;
use clap::{Parser, Subcommand};
use commerce_scaffolder_core::tui::CreateArgs;
use commerce_scaffolder_core::ProductConfig;
use std::path::PathBuf;

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commerce events product configuration
#[derive(Clone)]
pub struct CommerceEventsConfig;

impl ProductConfig for CommerceEventsConfig {
    fn name(&self) -> &'static str {
        "commerce-events"
    }

    fn display_name(&self) -> &'static str {
        "Commerce Events Extension"
    }

    fn overview(&self) -> &'static str {
        "* You have the option to generate boilerplate code for listening and acting on Commerce events.\n\
         * You can add the Commerce event listeners that you are interested in two ways:\n\
         \x20   -> Connect to your Adobe Commerce instance and select available events.\n\
         \x20   -> Choose one of the Commerce event providers available in your organization.\n\
         * You can install an optional plugin extension to enable App Builder webhook auto subscriptions.\n\
         * You can get help regarding documentation at any time from the menu.\n\
         * You can check out a sample demo project.\n\
         * An App Builder project will be created with Node.js packages pre-configured."
    }

    fn docs_url(&self) -> &'static str {
        "https://developer.adobe.com/commerce/events/get-started/"
    }

    fn commerce_integration_doc_url(&self) -> &'static str {
        "https://docs.magento.com/user-guide/system/integrations.html"
    }

    fn commerce_configuration_doc_url(&self) -> &'static str {
        "https://developer.adobe.com/commerce/events/get-started/configure-commerce/"
    }

    fn default_events_api_url(&self) -> &'static str {
        "https://api.adobe.io/events"
    }

    fn events_api_url_env(&self) -> &'static str {
        "AIO_EVENTS_API_URL"
    }

    fn plugin_name(&self) -> &'static str {
        "@adobe/aio-cli-plugin-extension"
    }

    fn plugin_overview(&self) -> &'static str {
        "@adobe/aio-cli-plugin-extension subscribes your deployed runtime actions to the \
         Commerce events listed in app.config.yaml during `aio app deploy`, and removes \
         those subscriptions on `aio app undeploy`."
    }

    fn next_steps(&self) -> Vec<String> {
        vec![
            "Populate your local environment variables in the \".env\" file.".to_string(),
            "You can add your preferred event provider id in the \".env\" file to simplify extension deployment.".to_string(),
            "You can modify the event codes in the \"app.config.yaml\" file.".to_string(),
            "You can use `aio app run` or `aio app deploy` to see the sample code files in action.".to_string(),
        ]
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding Adobe Commerce event-driven extensions"
    }
}

#[derive(Parser, Debug)]
#[command(name = "commerce-events")]
#[command(about = "CLI for scaffolding Adobe Commerce event-driven extensions")]
#[command(version)]
pub struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or extend a Commerce events extension project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug)]
pub struct CliCreateArgs {
    /// Project folder (defaults to the current directory)
    #[arg(short, long = "dest-folder")]
    pub dest_folder: Option<PathBuf>,

    /// Generate from the existing extension manifest without asking anything
    #[arg(long = "skip-prompt")]
    pub skip_prompt: bool,

    /// Generate from this extension manifest instead of running the wizard (for development use)
    #[arg(long = "extension-manifest")]
    pub extension_manifest: Option<PathBuf>,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        CreateArgs {
            dest_folder: args.dest_folder,
            skip_prompt: args.skip_prompt,
            extension_manifest: args.extension_manifest,
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);
    let config = CommerceEventsConfig;

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        // No subcommand provided, default to create behavior (interactive mode)
        None => CreateArgs::default(),
    };

    let result = commerce_scaffolder_core::run(&config, create_args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
