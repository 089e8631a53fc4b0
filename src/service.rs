use crate::catalog::FetchEntry;
use crate::property_tree::PropertyTree;
use crate::scene::AppState;
use crate::subscription::PropertyService;

/// In-process stand-in for the property-streaming service.
///
/// Holds the current tree and keeps each property's `listeners` count in
/// step with start/stop requests.
#[derive(Debug, Default)]
pub struct LocalPropertyService {
    state: AppState,
    requests: usize,
}

impl LocalPropertyService {
    pub fn new(state: AppState) -> Self {
        Self { state, requests: 0 }
    }

    pub fn snapshot(&self) -> &AppState {
        &self.state
    }

    pub fn listeners(&self, uri: &str) -> Option<u32> {
        self.state
            .property_tree
            .find_property(uri)
            .map(|property| property.listeners)
    }

    /// Total start/stop requests handled, unknown URIs included.
    pub fn request_count(&self) -> usize {
        self.requests
    }

    /// Swap in a fresh tree, keeping listener counts for URIs that survive.
    pub fn replace_tree(&mut self, mut tree: PropertyTree) {
        let mut carried = 0usize;
        for property in self.state.property_tree.properties() {
            if property.listeners == 0 {
                continue;
            }
            if let Some(target) = tree.find_property_mut(property.uri()) {
                target.listeners = property.listeners;
                carried += 1;
            }
        }
        tracing::debug!(carried, "replaced property tree");
        self.state.property_tree = tree;
    }

    pub fn set_fetch_data(&mut self, fetch_data: Vec<FetchEntry>) {
        self.state.fetch_data = fetch_data;
    }

    /// Overwrite a single property value, as a streamed update would.
    pub fn set_value(&mut self, uri: &str, value: impl Into<String>) -> bool {
        match self.state.property_tree.find_property_mut(uri) {
            Some(property) => {
                property.value = value.into();
                property.quoted = true;
                true
            }
            None => false,
        }
    }
}

impl PropertyService for LocalPropertyService {
    fn start_listening(&mut self, uri: &str) {
        self.requests += 1;
        match self.state.property_tree.find_property_mut(uri) {
            Some(property) => {
                property.listeners += 1;
                tracing::debug!(uri, listeners = property.listeners, "start listening");
            }
            None => tracing::warn!(uri, "start listening on unknown property"),
        }
    }

    fn stop_listening(&mut self, uri: &str) {
        self.requests += 1;
        match self.state.property_tree.find_property_mut(uri) {
            Some(property) => {
                property.listeners = property.listeners.saturating_sub(1);
                tracing::debug!(uri, listeners = property.listeners, "stop listening");
            }
            None => tracing::warn!(uri, "stop listening on unknown property"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property_tree::{Property, PropertyOwner};

    fn tree(value: &str) -> PropertyTree {
        PropertyTree::new(vec![PropertyOwner::new("Scene").with_subowner(
            PropertyOwner::new("Earth")
                .with_property(Property::new("Scene.Earth.ScreenVisibility", value)),
        )])
    }

    fn service() -> LocalPropertyService {
        LocalPropertyService::new(AppState {
            property_tree: tree("true"),
            fetch_data: Vec::new(),
        })
    }

    #[test]
    fn counts_listeners() {
        let mut service = service();
        service.start_listening("Scene.Earth.ScreenVisibility");
        service.start_listening("Scene.Earth.ScreenVisibility");
        assert_eq!(service.listeners("Scene.Earth.ScreenVisibility"), Some(2));
        service.stop_listening("Scene.Earth.ScreenVisibility");
        service.stop_listening("Scene.Earth.ScreenVisibility");
        service.stop_listening("Scene.Earth.ScreenVisibility");
        assert_eq!(service.listeners("Scene.Earth.ScreenVisibility"), Some(0));
        assert_eq!(service.request_count(), 5);
    }

    #[test]
    fn ignores_unknown_uris() {
        let mut service = service();
        service.start_listening("Scene.Pluto.ScreenVisibility");
        assert_eq!(service.listeners("Scene.Pluto.ScreenVisibility"), None);
        assert_eq!(service.request_count(), 1);
    }

    #[test]
    fn replacing_tree_keeps_listener_counts() {
        let mut service = service();
        service.start_listening("Scene.Earth.ScreenVisibility");
        service.replace_tree(tree("false"));
        assert_eq!(service.listeners("Scene.Earth.ScreenVisibility"), Some(1));
        assert_eq!(
            service
                .snapshot()
                .property_tree
                .find_property("Scene.Earth.ScreenVisibility")
                .map(|p| p.value.as_str()),
            Some("false")
        );
    }

    #[test]
    fn sets_values() {
        let mut service = service();
        assert!(service.set_value("Scene.Earth.ScreenVisibility", "false"));
        assert!(!service.set_value("Scene.Mars.ScreenVisibility", "false"));
    }
}
