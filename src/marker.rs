use crate::catalog::{InfoIconCatalog, PlanetInfo};
use crate::scene::{MarkerState, SceneNode};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Thresholds that turn raw node properties into display flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerPolicy {
    /// Numerator of the inverse-distance label heuristic.
    pub label_distance_scale: f64,
    /// Labels show while `label_distance_scale / distance` exceeds this.
    pub label_threshold: f64,
    pub size_factor: f64,
    pub min_size: f64,
    pub max_size: f64,
    /// Info panels show for screen radii strictly above this.
    pub info_radius_threshold: f64,
}

impl Default for MarkerPolicy {
    fn default() -> Self {
        Self {
            label_distance_scale: 1e11,
            label_threshold: 0.04,
            size_factor: 0.1,
            min_size: 1.5,
            max_size: 3.0,
            info_radius_threshold: 25.0,
        }
    }
}

impl MarkerPolicy {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_size <= self.max_size) {
            return Err(Error::Policy(format!(
                "min_size {} exceeds max_size {}",
                self.min_size, self.max_size
            )));
        }
        Ok(())
    }

    pub fn show_label(&self, distance: f64) -> bool {
        self.label_distance_scale / distance > self.label_threshold
    }

    /// NaN radii stay NaN. The floor is applied last, so an inverted range
    /// yields `min_size` rather than panicking.
    pub fn size(&self, radius: f64) -> f64 {
        let size = radius * self.size_factor;
        let size = if size >= self.max_size { self.max_size } else { size };
        if size <= self.min_size {
            self.min_size
        } else {
            size
        }
    }

    pub fn show_info(&self, radius: f64) -> bool {
        radius > self.info_radius_threshold
    }
}

/// Display record for one visible scene node.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerInfo {
    /// URI of the node's screen-space position property.
    pub key: String,
    pub identifier: String,
    pub position: Vec<f64>,
    pub size: f64,
    pub show_info: bool,
    pub show_label: bool,
    pub planet_radius: f64,
    pub planet_info: Option<PlanetInfo>,
}

impl MarkerInfo {
    pub fn new(node: &SceneNode, catalog: &InfoIconCatalog, policy: &MarkerPolicy) -> Self {
        let props = &node.properties;
        let distance = parse_number(&props.distance_from_cam.value);
        let planet_radius = parse_number(&props.screen_size_radius.value);

        Self {
            key: props.screen_space_position.uri().to_string(),
            identifier: node.identifier.clone(),
            position: parse_position(&props.screen_space_position.value),
            size: policy.size(planet_radius),
            show_info: policy.show_info(planet_radius),
            show_label: policy.show_label(distance),
            planet_radius,
            planet_info: catalog.lookup(&node.identifier).cloned(),
        }
    }

    /// First two components, NaN when absent.
    pub fn xy(&self) -> (f64, f64) {
        let component = |i: usize| self.position.get(i).copied().unwrap_or(f64::NAN);
        (component(0), component(1))
    }
}

/// One marker per visible node, in node order.
pub fn markers(state: &MarkerState, policy: &MarkerPolicy) -> Vec<MarkerInfo> {
    state
        .nodes
        .iter()
        .filter(|node| node.is_visible())
        .map(|node| MarkerInfo::new(node, &state.catalog, policy))
        .collect()
}

/// Parse a serialized vector such as `[12.5, 40]` or `{12.5,40}`.
pub fn parse_position(value: &str) -> Vec<f64> {
    let trimmed = value.trim_matches(|c: char| "[]{}()".contains(c) || c.is_whitespace());
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(',').map(parse_number).collect()
}

/// Blank reads as zero, anything else unparsable as NaN.
fn parse_number(value: &str) -> f64 {
    let value = value.trim();
    if value.is_empty() {
        return 0.0;
    }
    value.parse().unwrap_or(f64::NAN)
}
