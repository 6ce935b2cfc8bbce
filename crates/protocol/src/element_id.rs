use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The `id` attribute of a DOM element the page tracks: a section, a
/// reveal target or a skill bar.
///
/// Ids are shared between the layout snapshot, nav links, watcher
/// subscriptions and emitted commands, so the string lives behind an `Arc`.
/// Lookups in maps keyed by `ElementId` take a plain `&str`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ElementId(Arc<str>);

impl ElementId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `href` of a link pointing at this element (`#id`).
    pub fn anchor(&self) -> String {
        format!("#{}", self.0)
    }

    /// Resolve an in-page link target. External links and a bare `#` have
    /// no element.
    pub fn from_anchor(href: &str) -> Option<Self> {
        match href.strip_prefix('#') {
            Some(id) if !id.is_empty() => Some(Self::from(id)),
            _ => None,
        }
    }
}

impl Deref for ElementId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ElementId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ElementId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for ElementId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self(Arc::from(id))
    }
}

impl From<String> for ElementId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl From<ElementId> for String {
    fn from(id: ElementId) -> Self {
        id.0.as_ref().to_owned()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nav_href_resolves_to_its_section() {
        let id = ElementId::from("projects");
        assert_eq!(id.anchor(), "#projects");
        assert_eq!(ElementId::from_anchor("#projects"), Some(id));
    }

    #[test]
    fn external_and_empty_links_have_no_target() {
        assert_eq!(ElementId::from_anchor("#"), None);
        assert_eq!(ElementId::from_anchor("https://example.com/#a"), None);
        assert_eq!(ElementId::from_anchor("about"), None);
    }

    #[test]
    fn layout_maps_are_queried_by_plain_id() {
        let mut map = std::collections::HashMap::new();
        map.insert(ElementId::from("skills"), 3);
        assert_eq!(map.get("skills"), Some(&3));
    }

    #[test]
    fn ids_travel_as_plain_json_strings() {
        let id: ElementId =
            serde_json::from_str("\"a\\u0062c\"").unwrap_or_else(|_| ElementId::from(""));
        assert_eq!(id, "abc");
        assert_eq!(serde_json::to_string(&id).unwrap_or_default(), "\"abc\"");
    }
}
