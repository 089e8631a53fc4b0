use proptest::prelude::*;
use scene_markers::{
    derive, markers, AppState, Config, MarkerPolicy, Property, PropertyOwner, PropertyTree, TrackedKind,
};

fn scene(visibility: &[bool]) -> AppState {
    let nodes = visibility
        .iter()
        .enumerate()
        .map(|(i, visible)| {
            let id = format!("Node{i}");
            let mut owner = PropertyOwner::new(id.as_str()).with_tags(["story_props"]);
            for kind in TrackedKind::ALL {
                let value = match kind {
                    TrackedKind::ScreenVisibility => if *visible { "true" } else { "false" },
                    TrackedKind::ScreenSpacePosition => "[10,20]",
                    TrackedKind::DistanceFromCamToNode => "1e9",
                    TrackedKind::ScreenSizeRadius => "12",
                };
                owner = owner.with_property(Property::new(kind.uri("Scene", &id), value));
            }
            owner
        })
        .collect();

    let mut scene = PropertyOwner::new("Scene");
    scene.subowners = nodes;
    let story = PropertyOwner::new("Story").with_property(Property::new("Story.Identifier", "props"));
    AppState {
        property_tree: PropertyTree::new(vec![story, scene]),
        fetch_data: Vec::new(),
    }
}

proptest! {
    #[test]
    fn size_stays_within_bounds(radius in -1e6f64..1e6) {
        let size = MarkerPolicy::default().size(radius);
        prop_assert!((1.5..=3.0).contains(&size));
    }

    #[test]
    fn info_flag_tracks_radius(radius in 0f64..100.0) {
        prop_assert_eq!(MarkerPolicy::default().show_info(radius), radius > 25.0);
    }

    #[test]
    fn label_flag_tracks_distance(distance in 1f64..1e14) {
        prop_assert_eq!(MarkerPolicy::default().show_label(distance), 1e11 / distance > 0.04);
    }

    #[test]
    fn one_marker_per_visible_node(visibility in prop::collection::vec(any::<bool>(), 0..12)) {
        let config = Config::default();
        let derived = derive(&scene(&visibility), &config);
        prop_assert_eq!(derived.nodes.len(), visibility.len());

        let produced = markers(&derived, &config.policy);
        let expected: Vec<String> = visibility
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(i, _)| format!("Node{i}"))
            .collect();
        let ids: Vec<String> = produced.into_iter().map(|m| m.identifier).collect();
        prop_assert_eq!(ids, expected);
    }
}
