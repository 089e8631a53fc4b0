//! State derivation: application snapshot in, ordered scene nodes out.

use crate::catalog::{FetchEntry, InfoIconCatalog};
use crate::config::Config;
use crate::property_tree::{Property, PropertyOwner, PropertyTree};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Immutable snapshot of the application state the markers read from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub property_tree: PropertyTree,
    #[serde(default)]
    pub fetch_data: Vec<FetchEntry>,
}

impl AppState {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&content)
    }
}

/// The four live properties tracked for every scene node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackedKind {
    ScreenSpacePosition,
    ScreenVisibility,
    DistanceFromCamToNode,
    ScreenSizeRadius,
}

impl TrackedKind {
    pub const ALL: [TrackedKind; 4] = [
        TrackedKind::ScreenSpacePosition,
        TrackedKind::ScreenVisibility,
        TrackedKind::DistanceFromCamToNode,
        TrackedKind::ScreenSizeRadius,
    ];

    pub fn property_name(self) -> &'static str {
        match self {
            TrackedKind::ScreenSpacePosition => "ScreenSpacePosition",
            TrackedKind::ScreenVisibility => "ScreenVisibility",
            TrackedKind::DistanceFromCamToNode => "DistanceFromCamToNode",
            TrackedKind::ScreenSizeRadius => "ScreenSizeRadius",
        }
    }

    pub fn uri(self, scene_root: &str, node: &str) -> String {
        format!("{}.{}.{}", scene_root, node, self.property_name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedProperties {
    pub screen_space_position: Property,
    pub screen_visibility: Property,
    pub distance_from_cam: Property,
    pub screen_size_radius: Property,
}

impl TrackedProperties {
    fn resolve(tree: &PropertyTree, scene_root: &str, node: &str) -> Option<Self> {
        let fetch = |kind: TrackedKind| tree.find_property(&kind.uri(scene_root, node)).cloned();
        Some(Self {
            screen_space_position: fetch(TrackedKind::ScreenSpacePosition)?,
            screen_visibility: fetch(TrackedKind::ScreenVisibility)?,
            distance_from_cam: fetch(TrackedKind::DistanceFromCamToNode)?,
            screen_size_radius: fetch(TrackedKind::ScreenSizeRadius)?,
        })
    }

    pub fn get(&self, kind: TrackedKind) -> &Property {
        match kind {
            TrackedKind::ScreenSpacePosition => &self.screen_space_position,
            TrackedKind::ScreenVisibility => &self.screen_visibility,
            TrackedKind::DistanceFromCamToNode => &self.distance_from_cam,
            TrackedKind::ScreenSizeRadius => &self.screen_size_radius,
        }
    }

    /// Properties in `TrackedKind::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        TrackedKind::ALL.into_iter().map(move |kind| self.get(kind))
    }
}

/// A scene child tagged with the active story, with its tracked properties.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub identifier: String,
    pub tags: Vec<String>,
    pub properties: TrackedProperties,
}

impl SceneNode {
    /// Only the string `"true"` counts; a raw JSON boolean does not.
    pub fn is_visible(&self) -> bool {
        self.properties.screen_visibility.is_string("true")
    }
}

/// Output of [`derive`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerState {
    pub nodes: Vec<SceneNode>,
    pub catalog: InfoIconCatalog,
}

impl MarkerState {
    /// One tracked property per node, index-aligned with `nodes`.
    pub fn column(&self, kind: TrackedKind) -> impl Iterator<Item = &Property> {
        self.nodes.iter().map(move |node| node.properties.get(kind))
    }
}

/// Derive the scene nodes and catalog for the active story.
pub fn derive(state: &AppState, config: &Config) -> MarkerState {
    let catalog = InfoIconCatalog::from_fetch_data(&state.fetch_data, &config.info_icon_key);
    let tree = &state.property_tree;
    if tree.is_empty() {
        return MarkerState {
            nodes: Vec::new(),
            catalog,
        };
    }

    let Some(story) = tree.find_property(&config.story_uri) else {
        tracing::debug!(story_uri = %config.story_uri, "story property not found");
        return MarkerState {
            nodes: Vec::new(),
            catalog,
        };
    };

    let nodes: Vec<SceneNode> = tree
        .roots_named(&config.scene_root)
        .flat_map(|root| root.subowners.iter())
        .filter(|owner| owner.has_tag_containing(&story.value))
        .filter_map(|owner| scene_node(tree, &config.scene_root, owner))
        .collect();

    tracing::debug!(story = %story.value, nodes = nodes.len(), "derived scene nodes");
    MarkerState { nodes, catalog }
}

fn scene_node(tree: &PropertyTree, scene_root: &str, owner: &PropertyOwner) -> Option<SceneNode> {
    let Some(properties) = TrackedProperties::resolve(tree, scene_root, &owner.identifier) else {
        tracing::debug!(node = %owner.identifier, "scene node lacks tracked properties, skipping");
        return None;
    };
    Some(SceneNode {
        identifier: owner.identifier.clone(),
        tags: owner.tag.clone(),
        properties,
    })
}


#[cfg(test)]
mod tests {
    use super::fixtures::{node, state};
    use super::*;

    #[test]
    fn filters_scene_children_by_story_tag() {
        let state = state(
            "solarsystem",
            vec![
                node("Earth", "story_solarsystem", "true", "[1,2]", "1e9", "30"),
                node("Andromeda", "story_galaxies", "true", "[3,4]", "1e20", "2"),
                node("Mars", "story_solarsystem", "false", "[5,6]", "2e9", "10"),
            ],
        );
        let derived = derive(&state, &Config::default());
        let ids: Vec<_> = derived.nodes.iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(ids, ["Earth", "Mars"]);
    }

    #[test]
    fn columns_are_index_aligned() {
        let state = state(
            "solarsystem",
            vec![
                node("Earth", "story_solarsystem", "true", "[1,2]", "1e9", "30"),
                node("Mars", "story_solarsystem", "false", "[5,6]", "2e9", "10"),
            ],
        );
        let derived = derive(&state, &Config::default());
        for kind in TrackedKind::ALL {
            let column: Vec<_> = derived.column(kind).collect();
            assert_eq!(column.len(), derived.nodes.len());
            for (node, property) in derived.nodes.iter().zip(column) {
                assert_eq!(property.uri(), kind.uri("Scene", &node.identifier));
            }
        }
    }

    #[test]
    fn empty_tree_yields_nothing() {
        let derived = derive(&AppState::default(), &Config::default());
        assert!(derived.nodes.is_empty());
        assert!(derived.catalog.is_empty());
    }

    #[test]
    fn missing_story_property_yields_nothing() {
        let mut state = state("solarsystem", vec![node("Earth", "story_solarsystem", "true", "[1,2]", "1", "1")]);
        state.property_tree.subowners.retain(|o| o.identifier != "Story");
        assert!(derive(&state, &Config::default()).nodes.is_empty());
    }

    #[test]
    fn incomplete_nodes_are_skipped() {
        let mut earth = node("Earth", "story_solarsystem", "true", "[1,2]", "1", "1");
        earth.properties.pop();
        let state = state(
            "solarsystem",
            vec![earth, node("Venus", "story_solarsystem", "true", "[1,2]", "1", "1")],
        );
        let derived = derive(&state, &Config::default());
        assert_eq!(derived.nodes.len(), 1);
        assert_eq!(derived.nodes[0].identifier, "Venus");
    }

    #[test]
    fn merges_children_of_every_scene_root() {
        let mut state = state("solarsystem", vec![node("Earth", "story_solarsystem", "true", "[1,2]", "1", "1")]);
        let mut second = PropertyOwner::new("Scene");
        second.subowners.push(node("Moon", "story_solarsystem", "true", "[1,2]", "1", "1"));
        state.property_tree.subowners.push(second);
        let derived = derive(&state, &Config::default());
        let ids: Vec<_> = derived.nodes.iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(ids, ["Earth", "Moon"]);
    }

    #[test]
    fn parses_snapshot_json() {
        let json = r#"{
            "propertyTree": {"subowners": []},
            "fetchData": [{"id": "infoIcons", "succeed": false}]
        }"#;
        let state = AppState::from_json(json).unwrap();
        assert!(state.property_tree.is_empty());
        assert_eq!(state.fetch_data.len(), 1);
        assert!(matches!(AppState::from_json("{"), Err(Error::Snapshot(_))));
    }
}
