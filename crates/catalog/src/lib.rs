use serde::{Deserialize, Serialize};

pub mod selection;

pub use selection::CategorySelection;

/// A point-of-interest category tag understood by the local-search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppleTag(pub String);

impl AppleTag {
    pub fn new(tag: impl Into<String>) -> Self {
        AppleTag(tag.into())
    }
}

/// An OSM tag filter: a key with an optional value (`key` alone matches any
/// value, e.g. `sport`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsmTag {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl OsmTag {
    pub fn new(key: impl Into<String>) -> Self {
        OsmTag {
            key: key.into(),
            value: None,
        }
    }

    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        OsmTag {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// A POI category as the core consumes it: display metadata plus the two
/// optional provider tag sets.
///
/// Equality contract: categories are equal iff their titles are equal. The
/// title doubles as the category's key in selection state and annotations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    /// Icon name, passed through to the rendering layer untouched.
    pub icon: String,
    /// Pin color, passed through to the rendering layer untouched.
    pub color: String,
    #[serde(default)]
    pub apple_tags: Vec<AppleTag>,
    #[serde(default)]
    pub osm_tags: Vec<OsmTag>,
}

impl PartialEq for Category {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
    }
}

impl Eq for Category {}

impl Category {
    fn new(
        title: &str,
        icon: &str,
        color: &str,
        apple_tags: &[&str],
        osm_tags: Vec<OsmTag>,
    ) -> Self {
        Category {
            title: title.to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            apple_tags: apple_tags.iter().map(|t| AppleTag::new(*t)).collect(),
            osm_tags,
        }
    }
}

/// The standard category table.
///
/// This is effectively configuration the core consumes verbatim; icon and
/// color names are opaque to everything below the rendering layer.
pub fn standard() -> Vec<Category> {
    vec![
        Category::new(
            "Movies",
            "movieclapper",
            "systemPink",
            &["movieTheater"],
            vec![OsmTag::with_value("amenity", "cinema")],
        ),
        Category::new(
            "Park",
            "tree",
            "systemGreen",
            &["park", "nationalPark"],
            vec![OsmTag::with_value("leisure", "park")],
        ),
        Category::new(
            "Eat",
            "fork.knife",
            "systemOrange",
            &["cafe", "restaurant", "bakery"],
            vec![
                OsmTag::with_value("amenity", "restaurant"),
                OsmTag::with_value("amenity", "fast_food"),
                OsmTag::with_value("amenity", "cafe"),
                OsmTag::with_value("shop", "bakery"),
                OsmTag::with_value("shop", "pastry"),
            ],
        ),
        Category::new(
            "Sport",
            "volleyball",
            "systemBlue",
            &["fitnessCenter", "stadium"],
            vec![OsmTag::new("sport"), OsmTag::with_value("leisure", "pitch")],
        ),
        Category::new(
            "Museum",
            "building.columns",
            "systemPurple",
            &["museum"],
            vec![OsmTag::with_value("tourism", "museum"), OsmTag::new("museum")],
        ),
        Category::new(
            "Zoo",
            "bird",
            "systemBrown",
            &["zoo"],
            vec![OsmTag::with_value("tourism", "zoo"), OsmTag::new("zoo")],
        ),
        Category::new(
            "Amusement",
            "laser.burst",
            "systemCyan",
            &["amusementPark"],
            vec![
                OsmTag::with_value("attraction", "amusement_ride"),
                OsmTag::with_value("leisure", "amusement_arcade"),
                OsmTag::with_value("leisure", "water_park"),
                OsmTag::with_value("tourism", "theme_park"),
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::{Category, standard};
    use pretty_assertions::assert_eq;

    #[test]
    fn standard_catalog_has_seven_entries() {
        let catalog = standard();
        let titles: Vec<&str> = catalog.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(
            titles,
            vec!["Movies", "Park", "Eat", "Sport", "Museum", "Zoo", "Amusement"]
        );
    }

    #[test]
    fn equality_is_by_title_only() {
        let a = standard().remove(0);
        let b = Category {
            icon: "different".to_string(),
            color: "different".to_string(),
            apple_tags: Vec::new(),
            osm_tags: Vec::new(),
            ..a.clone()
        };
        assert_eq!(a, b);
    }

    #[test]
    fn category_round_trips_through_json() {
        let catalog = standard();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Vec<Category> = serde_json::from_str(&json).unwrap();
        assert_eq!(catalog, back);
        // Equality is title-only, so also check a tag survived.
        assert_eq!(back[0].osm_tags, catalog[0].osm_tags);
    }
}
