//! Run-scoped wizard state

use crate::events::ProviderCache;
use crate::manifest::ProjectManifest;
use crate::naming::NamingState;

/// State owned by one wizard run: name allocation bookkeeping and the
/// provider cache. Consumed by the finalize stage, never persisted.
#[derive(Debug, Default)]
pub struct Session {
    pub(crate) naming: NamingState,
    pub(crate) providers: ProviderCache,
}

impl Session {
    /// Start a session for `manifest`, treating its action names as taken
    pub fn start(manifest: &ProjectManifest) -> Self {
        Self {
            naming: NamingState::seeded(manifest.action_names()),
            providers: ProviderCache::new(),
        }
    }

    pub fn naming(&self) -> &NamingState {
        &self.naming
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ActionManifestEntry;

    #[test]
    fn test_session_is_seeded_with_manifest_names() {
        let mut manifest = ProjectManifest::default();
        manifest
            .merge(ActionManifestEntry::new("order-created", "p", vec!["c".into()]))
            .unwrap();

        let session = Session::start(&manifest);
        assert!(session.naming().is_seen("order-created"));
        assert!(!session.naming().is_seen("generic"));
    }
}
