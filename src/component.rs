use crate::config::Config;
use crate::marker::{self, MarkerInfo};
use crate::scene::{self, AppState, SceneNode};
use crate::subscription::{self, ListenCommand};

/// Result of one [`Markers::update`] pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkersUpdate {
    pub markers: Vec<MarkerInfo>,
    pub commands: Vec<ListenCommand>,
}

/// The markers component: call [`Markers::update`] whenever the snapshot
/// changes and [`Markers::unmount`] when the view goes away.
#[derive(Debug, Clone, Default)]
pub struct Markers {
    config: Config,
    displayed: Vec<SceneNode>,
}

impl Markers {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            displayed: Vec::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Nodes remembered from the last update.
    pub fn displayed(&self) -> &[SceneNode] {
        &self.displayed
    }

    pub fn update(&mut self, state: &AppState) -> MarkersUpdate {
        let derived = scene::derive(state, &self.config);
        let markers = marker::markers(&derived, &self.config.policy);
        let commands = subscription::reconcile(
            &self.displayed,
            &derived.nodes,
            self.config.unsubscribe_removed,
        );
        self.displayed = derived.nodes;
        MarkersUpdate { markers, commands }
    }

    /// Stop commands for every displayed node; a second call yields none.
    pub fn unmount(&mut self) -> Vec<ListenCommand> {
        let commands = subscription::unmount(&self.displayed);
        tracing::debug!(nodes = self.displayed.len(), commands = commands.len(), "markers unmounted");
        self.displayed.clear();
        commands
    }
}
