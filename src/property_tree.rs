//! Property tree model as streamed from the visualization engine.
//!
//! Owners nest through `subowners`; every property is addressed by a dotted
//! URI such as `Scene.Earth.ScreenVisibility`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyTree {
    #[serde(default)]
    pub subowners: Vec<PropertyOwner>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyOwner {
    pub identifier: String,
    #[serde(default, alias = "tags")]
    pub tag: Vec<String>,
    #[serde(default)]
    pub subowners: Vec<PropertyOwner>,
    #[serde(default)]
    pub properties: Vec<Property>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescription {
    #[serde(rename = "Identifier")]
    pub identifier: String,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireProperty", into = "WireProperty")]
pub struct Property {
    pub description: PropertyDescription,
    /// Numbers and booleans the engine sends raw are kept as their JSON text.
    pub value: String,
    /// False when `value` did not arrive as a JSON string.
    pub quoted: bool,
    /// Listener count reported by the streaming service.
    pub listeners: u32,
}

#[derive(Serialize, Deserialize)]
struct WireProperty {
    #[serde(rename = "Description")]
    description: PropertyDescription,
    #[serde(rename = "Value", default)]
    value: serde_json::Value,
    #[serde(default)]
    listeners: u32,
}

impl From<WireProperty> for Property {
    fn from(wire: WireProperty) -> Self {
        let (value, quoted) = match wire.value {
            serde_json::Value::String(s) => (s, true),
            serde_json::Value::Null => (String::new(), false),
            other => (other.to_string(), false),
        };
        Self {
            description: wire.description,
            value,
            quoted,
            listeners: wire.listeners,
        }
    }
}

impl From<Property> for WireProperty {
    fn from(property: Property) -> Self {
        let value = if property.quoted {
            serde_json::Value::String(property.value)
        } else if property.value.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_str(&property.value).unwrap_or(serde_json::Value::String(property.value))
        };
        Self {
            description: property.description,
            value,
            listeners: property.listeners,
        }
    }
}

impl Property {
    pub fn new(uri: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            description: PropertyDescription {
                identifier: uri.into(),
                name: None,
            },
            value: value.into(),
            quoted: true,
            listeners: 0,
        }
    }

    /// Strict string comparison: a raw JSON `true` never equals `"true"`.
    pub fn is_string(&self, expected: &str) -> bool {
        self.quoted && self.value == expected
    }

    pub fn with_listeners(mut self, listeners: u32) -> Self {
        self.listeners = listeners;
        self
    }

    /// Full dotted URI of this property.
    pub fn uri(&self) -> &str {
        &self.description.identifier
    }

    fn matches_segment(&self, uri: &str, segment: &str) -> bool {
        self.uri() == uri || self.uri().rsplit('.').next() == Some(segment)
    }
}

impl PropertyOwner {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tag = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_subowner(mut self, owner: PropertyOwner) -> Self {
        self.subowners.push(owner);
        self
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// True when any tag contains `needle` as a substring.
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.tag.iter().any(|tag| tag.contains(needle))
    }
}

impl PropertyTree {
    pub fn new(subowners: Vec<PropertyOwner>) -> Self {
        Self {
            subowners,
            properties: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.subowners.is_empty() && self.properties.is_empty()
    }

    /// Root owners with the given identifier, in tree order.
    pub fn roots_named<'a>(&'a self, identifier: &'a str) -> impl Iterator<Item = &'a PropertyOwner> {
        self.subowners
            .iter()
            .filter(move |owner| owner.identifier == identifier)
    }

    /// Walk `subowners` segment by segment. Sibling owners may share an
    /// identifier; the first branch that resolves the whole path wins.
    pub fn find_owner(&self, uri: &str) -> Option<&PropertyOwner> {
        let path = self.owner_path(uri)?;
        Some(self.owner_at(&path))
    }

    /// Resolve a property by its dotted URI.
    pub fn find_property(&self, uri: &str) -> Option<&Property> {
        let (path, index) = self.property_path(uri)?;
        if path.is_empty() {
            return self.properties.get(index);
        }
        self.owner_at(&path).properties.get(index)
    }

    pub fn find_property_mut(&mut self, uri: &str) -> Option<&mut Property> {
        let (path, index) = self.property_path(uri)?;
        let properties = match path.split_first() {
            None => &mut self.properties,
            Some((first, rest)) => {
                let mut owner = &mut self.subowners[*first];
                for i in rest {
                    owner = &mut owner.subowners[*i];
                }
                &mut owner.properties
            }
        };
        properties.get_mut(index)
    }

    /// `path` must be non-empty and produced by [`descend`].
    fn owner_at(&self, path: &[usize]) -> &PropertyOwner {
        let mut owner = &self.subowners[path[0]];
        for index in &path[1..] {
            owner = &owner.subowners[*index];
        }
        owner
    }

    fn owner_path(&self, uri: &str) -> Option<Vec<usize>> {
        let segments: Vec<&str> = uri.split('.').collect();
        let mut path = Vec::with_capacity(segments.len());
        descend(&self.subowners, &segments, &mut path, &|_: &PropertyOwner| true).then_some(path)
    }

    /// Child indices leading to the owning owner, plus the property index.
    fn property_path(&self, uri: &str) -> Option<(Vec<usize>, usize)> {
        let Some((owner_uri, name)) = uri.rsplit_once('.') else {
            let index = self.properties.iter().position(|p| p.matches_segment(uri, uri))?;
            return Some((Vec::new(), index));
        };
        let segments: Vec<&str> = owner_uri.split('.').collect();
        let mut path = Vec::with_capacity(segments.len());
        let has_property =
            |owner: &PropertyOwner| owner.properties.iter().any(|p| p.matches_segment(uri, name));
        if !descend(&self.subowners, &segments, &mut path, &has_property) {
            return None;
        }
        let index = self
            .owner_at(&path)
            .properties
            .iter()
            .position(|p| p.matches_segment(uri, name))?;
        Some((path, index))
    }

    /// Every property in the tree, depth first.
    pub fn properties(&self) -> Vec<&Property> {
        fn collect<'a>(owner: &'a PropertyOwner, out: &mut Vec<&'a Property>) {
            out.extend(owner.properties.iter());
            for child in &owner.subowners {
                collect(child, out);
            }
        }

        let mut out: Vec<&Property> = self.properties.iter().collect();
        for owner in &self.subowners {
            collect(owner, &mut out);
        }
        out
    }
}

fn descend(
    owners: &[PropertyOwner],
    segments: &[&str],
    path: &mut Vec<usize>,
    accept: &dyn Fn(&PropertyOwner) -> bool,
) -> bool {
    let Some((segment, rest)) = segments.split_first() else {
        return false;
    };
    for (index, owner) in owners.iter().enumerate() {
        if owner.identifier != *segment {
            continue;
        }
        path.push(index);
        let found = if rest.is_empty() {
            accept(owner)
        } else {
            descend(&owner.subowners, rest, path, accept)
        };
        if found {
            return true;
        }
        path.pop();
    }
    false
}
