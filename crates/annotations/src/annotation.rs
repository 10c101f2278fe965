use catalog::Category;
use foundation::Coordinate;
use providers::RawPlace;

/// Stable identity of a merged POI pin.
///
/// Identity contract:
/// - A provider-assigned external id is used verbatim when present.
/// - Otherwise the id is synthesized deterministically from
///   (name, coordinate, category title), so repeated fetches of the same
///   place collapse to one annotation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnnotationId(String);

impl AnnotationId {
    pub fn external(id: impl Into<String>) -> Self {
        AnnotationId(id.into())
    }

    pub fn synthesized(name: &str, coordinate: Coordinate, category: &Category) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(name.as_bytes());
        hasher.update(&coordinate.canonical_bytes());
        hasher.update(category.title.as_bytes());
        AnnotationId(hasher.finalize().to_hex().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A merged, deduplicated POI record backing one map pin.
///
/// Annotations are immutable value records owned by the store; components
/// downstream receive copies that cannot drift because nothing mutates an
/// annotation after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub identifier: AnnotationId,
    pub title: String,
    pub coordinate: Coordinate,
    pub category: Category,
    /// Pin color, copied from the category at merge time.
    pub color: String,
    /// Which provider this record came from.
    pub source: &'static str,
}

impl Annotation {
    pub fn from_raw(raw: &RawPlace, category: &Category, source: &'static str) -> Self {
        let identifier = match &raw.external_id {
            Some(id) => AnnotationId::external(id.clone()),
            None => AnnotationId::synthesized(&raw.name, raw.coordinate, category),
        };

        Annotation {
            identifier,
            title: raw.name.clone(),
            coordinate: raw.coordinate,
            color: category.color.clone(),
            category: category.clone(),
            source,
        }
    }
}
