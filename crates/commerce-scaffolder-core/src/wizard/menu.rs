//! Main menu, guide menu and the plugin offer

use super::{GuideMenuChoice, MainMenuChoice, Session, Wizard, WizardPrompts};
use crate::events::EventsClient;
use crate::manifest::ProjectManifest;
use crate::plugin::PluginInstaller;
use crate::product::ProductConfig;
use anyhow::Result;

/// How the main menu loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuExit {
    /// "I'm done"
    Done,
    /// The demo project replaced the manifest
    Demo,
}

impl<C, P, E, I> Wizard<'_, C, P, E, I>
where
    C: ProductConfig,
    P: WizardPrompts,
    E: EventsClient,
    I: PluginInstaller,
{
    /// Loop over the main menu until the user is done or picks the demo
    pub async fn main_menu(
        &mut self,
        session: &mut Session,
        manifest: &mut ProjectManifest,
    ) -> Result<MenuExit> {
        loop {
            let offer_plugin = !self.installer.is_installed().await;

            let added = match self.prompts.main_menu(offer_plugin)? {
                MainMenuChoice::AddFromCommerceInstance => {
                    self.add_listener_for_commerce_instance(session, manifest)
                        .await?
                }
                MainMenuChoice::AddFromEventProvider => {
                    self.add_listener_for_event_provider(session, manifest)
                        .await?
                }
                MainMenuChoice::InstallPlugin => {
                    self.offer_plugin_install().await?;
                    false
                }
                MainMenuChoice::Done => return Ok(MenuExit::Done),
                MainMenuChoice::Guide => {
                    if self.guide_menu(manifest)? {
                        return Ok(MenuExit::Demo);
                    }
                    false
                }
            };

            if added && !self.installer.is_installed().await {
                self.offer_plugin_install().await?;
            }
        }
    }

    /// Returns true when the demo project was loaded
    fn guide_menu(&mut self, manifest: &mut ProjectManifest) -> Result<bool> {
        loop {
            match self.prompts.guide_menu()? {
                GuideMenuChoice::DemoProject => {
                    *manifest = ProjectManifest::demo()?;
                    self.prompts.success(&format!(
                        "Loaded demo project '{}'",
                        manifest.name.as_deref().unwrap_or_default()
                    ))?;
                    return Ok(true);
                }
                GuideMenuChoice::FindHelp => self.find_help()?,
                GuideMenuChoice::GoBack => return Ok(false),
            }
        }
    }

    fn find_help(&mut self) -> Result<()> {
        let url = self.config.docs_url();
        self.prompts
            .info(&format!("Please refer to:\n-> {}", url))?;

        if self.prompts.confirm_open_docs(url)? {
            if let Err(e) = open::that(url) {
                self.prompts
                    .warning(&format!("Could not open a browser: {}", e))?;
            }
        }
        Ok(())
    }

    /// Explain the plugin and install it if the user agrees.
    ///
    /// A failed installation is reported; the wizard carries on.
    pub async fn offer_plugin_install(&mut self) -> Result<()> {
        let plugin = self.installer.plugin_name().to_string();

        if self.installer.is_installed().await {
            self.prompts.info(&format!(
                "{} is already installed and lets you subscribe to specified events \
                 automatically during the deploy phase. Skipping related prompt.",
                plugin
            ))?;
            return Ok(());
        }

        self.prompts.info(self.config.plugin_overview())?;
        if !self.prompts.confirm_plugin_install(&plugin)? {
            return Ok(());
        }

        self.prompts
            .start_progress(&format!("Installing plugin {}...", plugin));
        match self.installer.install().await {
            Ok(()) => {
                self.prompts
                    .stop_progress(&format!("Installed plugin {}", plugin));
                self.prompts.info(&format!(
                    "Please uninstall {} to remove webhook auto subscriptions capability.",
                    plugin
                ))?;
            }
            Err(e) => {
                self.prompts
                    .stop_progress(&format!("Failed to install plugin {}", plugin));
                self.prompts.error(&format!("{:#}", e))?;
            }
        }
        Ok(())
    }
}
