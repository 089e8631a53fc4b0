//! Live-update subscriptions for tracked node properties.
//!
//! Nothing here talks to the streaming service directly. Each update yields
//! a list of [`ListenCommand`]s and the caller dispatches them to whatever
//! implements [`PropertyService`].
//!
//! # How it works
//!
//! 1. Every tracked property reporting zero listeners gets a `Start`.
//! 2. Tracked URIs present last update but gone now get a `Stop` (optional).
//! 3. Unmount stops every tracked property of the displayed nodes.

use crate::scene::SceneNode;
use std::collections::HashSet;

/// The subscription API of the property-streaming service.
pub trait PropertyService {
    fn start_listening(&mut self, uri: &str);
    fn stop_listening(&mut self, uri: &str);
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ListenCommand {
    Start(String),
    Stop(String),
}

impl ListenCommand {
    pub fn uri(&self) -> &str {
        match self {
            ListenCommand::Start(uri) | ListenCommand::Stop(uri) => uri,
        }
    }

    pub fn dispatch<S: PropertyService + ?Sized>(&self, service: &mut S) {
        match self {
            ListenCommand::Start(uri) => service.start_listening(uri),
            ListenCommand::Stop(uri) => service.stop_listening(uri),
        }
    }
}

/// Dispatch a batch of commands in order.
pub fn dispatch_all<S: PropertyService + ?Sized>(commands: &[ListenCommand], service: &mut S) {
    for command in commands {
        command.dispatch(service);
    }
}

/// Commands that bring subscriptions in line with `current`.
///
/// Starts are issued only for properties with zero listeners; counting and
/// de-duplication belong to the service. With `unsubscribe_removed`, tracked
/// URIs of `previous` that no longer appear in `current` are stopped.
pub fn reconcile(
    previous: &[SceneNode],
    current: &[SceneNode],
    unsubscribe_removed: bool,
) -> Vec<ListenCommand> {
    let mut commands: Vec<ListenCommand> = current
        .iter()
        .flat_map(|node| node.properties.iter())
        .filter(|property| property.listeners == 0)
        .map(|property| ListenCommand::Start(property.uri().to_string()))
        .collect();

    if unsubscribe_removed {
        let live: HashSet<&str> = current
            .iter()
            .flat_map(|node| node.properties.iter())
            .map(|property| property.uri())
            .collect();
        let mut stopped = HashSet::new();
        for property in previous.iter().flat_map(|node| node.properties.iter()) {
            let uri = property.uri();
            if !live.contains(uri) && stopped.insert(uri) {
                tracing::debug!(uri, "tracked property removed, stopping");
                commands.push(ListenCommand::Stop(uri.to_string()));
            }
        }
    }

    tracing::trace!(
        previous = previous.len(),
        current = current.len(),
        commands = commands.len(),
        "subscription reconcile complete"
    );
    commands
}

/// One stop per tracked property per node, regardless of listener count.
pub fn unmount(nodes: &[SceneNode]) -> Vec<ListenCommand> {
    nodes
        .iter()
        .flat_map(|node| node.properties.iter())
        .map(|property| ListenCommand::Stop(property.uri().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scene::derive;
    use crate::scene::fixtures::{node, state};

    fn nodes(ids: &[&str]) -> Vec<SceneNode> {
        let owners = ids
            .iter()
            .map(|id| node(id, "story_a", "true", "[0,0]", "1", "1"))
            .collect();
        derive(&state("a", owners), &Config::default()).nodes
    }

    fn starts(commands: &[ListenCommand]) -> usize {
        commands.iter().filter(|c| matches!(c, ListenCommand::Start(_))).count()
    }

    #[test]
    fn starts_every_unlistened_property() {
        let current = nodes(&["Earth", "Mars"]);
        let commands = reconcile(&[], &current, true);
        assert_eq!(commands.len(), 8);
        assert_eq!(starts(&commands), 8);
        assert_eq!(commands[0], ListenCommand::Start("Scene.Earth.ScreenSpacePosition".into()));
    }

    #[test]
    fn skips_properties_with_listeners() {
        let mut current = nodes(&["Earth"]);
        current[0].properties.screen_visibility.listeners = 1;
        current[0].properties.screen_size_radius.listeners = 4;
        let commands = reconcile(&[], &current, true);
        assert_eq!(
            commands,
            vec![
                ListenCommand::Start("Scene.Earth.ScreenSpacePosition".into()),
                ListenCommand::Start("Scene.Earth.DistanceFromCamToNode".into()),
            ]
        );
    }

    #[test]
    fn stops_removed_properties_when_enabled() {
        let previous = nodes(&["Earth", "Mars"]);
        let mut current = nodes(&["Earth"]);
        let props = &mut current[0].properties;
        for property in [
            &mut props.screen_space_position,
            &mut props.screen_visibility,
            &mut props.distance_from_cam,
            &mut props.screen_size_radius,
        ] {
            property.listeners = 1;
        }

        let commands = reconcile(&previous, &current, true);
        assert_eq!(commands.len(), 4);
        assert!(commands.iter().all(|c| matches!(c, ListenCommand::Stop(uri) if uri.starts_with("Scene.Mars."))));

        assert!(reconcile(&previous, &current, false).is_empty());
    }

    #[test]
    fn unmount_stops_four_per_node() {
        let mut current = nodes(&["Earth", "Mars", "Venus"]);
        current[1].properties.screen_visibility.listeners = 7;
        let commands = unmount(&current);
        assert_eq!(commands.len(), 12);
        assert_eq!(starts(&commands), 0);
        assert!(unmount(&[]).is_empty());
    }
}
