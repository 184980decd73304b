//! Flattening of source metadata into a persistable record.

use tracing::debug;

use crate::value::{FlatMeta, MetaField, MetaValue};

/// A source field that did not make it into the flat record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedField {
    /// Dotted path of the field, e.g. `meta.screens`.
    pub path: String,
    /// Type name of the rejected value.
    pub type_name: &'static str,
}

/// Result of [`extract`]: the flat record plus everything that was lost
/// on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Flat record of primitive values.
    pub meta: FlatMeta,
    /// Fields whose value type cannot be persisted.
    pub dropped: Vec<DroppedField>,
    /// Keys written more than once with differing values. The last write
    /// is the one kept in `meta`.
    pub collisions: Vec<String>,
}

impl Extraction {
    /// Consumes the extraction, keeping only the record.
    pub fn into_meta(self) -> FlatMeta {
        self.meta
    }

    fn insert(&mut self, key: &str, value: &MetaValue, path: &str) {
        if let MetaValue::Float(v) = value
            && !v.is_finite()
        {
            self.drop_field(path, "non-finite float");
            return;
        }
        if let Some(previous) = self.meta.insert(key.to_string(), value.clone())
            && previous != *value
            && !self.collisions.iter().any(|k| k == key)
        {
            debug!(key, "metadata key overwritten by a later field");
            self.collisions.push(key.to_string());
        }
    }

    fn drop_field(&mut self, path: &str, type_name: &'static str) {
        debug!(
            field = path,
            datatype = type_name,
            "did not add field to metadata"
        );
        self.dropped.push(DroppedField {
            path: path.to_string(),
            type_name,
        });
    }
}

/// Flattens declared metadata fields into a record of primitives.
///
/// Primitive fields are copied under their own name. A mapping field has its
/// primitive entries hoisted to the top level under the entry key (not
/// prefixed by the parent name). Everything else is dropped and reported in
/// [`Extraction::dropped`]. Extraction never fails and does not touch its
/// input.
pub fn extract<'a, I>(fields: I) -> Extraction
where
    I: IntoIterator<Item = (&'a str, &'a MetaField)>,
{
    let mut out = Extraction::default();

    for (name, field) in fields {
        match field {
            MetaField::Value(v) => out.insert(name, v, name),
            MetaField::Map(map) => {
                for (key, entry) in map {
                    let path = format!("{name}.{key}");
                    match entry {
                        MetaField::Value(v) => out.insert(key, v, &path),
                        other => out.drop_field(&path, other.type_name()),
                    }
                }
            }
            other => out.drop_field(name, other.type_name()),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn nested() -> BTreeMap<String, MetaField> {
        let mut inner = BTreeMap::new();
        inner.insert("maaiveld".to_string(), MetaField::from(1.25));
        inner.insert("screens".to_string(), MetaField::List(vec![1i64.into()]));
        inner.insert("source".to_string(), MetaField::from("dino"));
        inner
    }

    #[test]
    fn primitives_are_copied() {
        let name = MetaField::from("B33F0133-1");
        let x = MetaField::from(115534.0);
        let ex = extract([("name", &name), ("x", &x)]);

        assert_eq!(ex.meta.len(), 2);
        assert_eq!(ex.meta["name"], MetaValue::Text("B33F0133-1".into()));
        assert_eq!(ex.meta["x"], MetaValue::Float(115534.0));
        assert!(ex.dropped.is_empty());
        assert!(ex.collisions.is_empty());
    }

    #[test]
    fn mapping_is_hoisted_without_prefix() {
        let meta = MetaField::Map(nested());
        let ex = extract([("meta", &meta)]);

        assert_eq!(ex.meta["maaiveld"], MetaValue::Float(1.25));
        assert_eq!(ex.meta["source"], MetaValue::Text("dino".into()));
        assert!(!ex.meta.contains_key("meta"));
        assert!(!ex.meta.contains_key("screens"));
        assert_eq!(
            ex.dropped,
            vec![DroppedField {
                path: "meta.screens".into(),
                type_name: "list",
            }]
        );
    }

    #[test]
    fn deeper_maps_and_null_are_dropped() {
        let mut inner = BTreeMap::new();
        inner.insert("deep".to_string(), MetaField::Map(nested()));
        let meta = MetaField::Map(inner);
        let filename = MetaField::Null;

        let ex = extract([("meta", &meta), ("filename", &filename)]);
        assert!(ex.meta.is_empty());
        let paths: Vec<_> = ex.dropped.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, vec!["meta.deep", "filename"]);
    }

    #[test]
    fn non_finite_floats_are_dropped() {
        let x = MetaField::from(f64::NAN);
        let y = MetaField::from(f64::INFINITY);
        let ex = extract([("x", &x), ("y", &y)]);
        assert!(ex.meta.is_empty());
        assert_eq!(ex.dropped.len(), 2);
        assert_eq!(ex.dropped[0].type_name, "non-finite float");
    }

    #[test]
    fn colliding_keys_last_write_wins() {
        let mut a = BTreeMap::new();
        a.insert("source".to_string(), MetaField::from("dino"));
        let mut b = BTreeMap::new();
        b.insert("source".to_string(), MetaField::from("fews"));
        let (a, b) = (MetaField::Map(a), MetaField::Map(b));

        let ex = extract([("first", &a), ("second", &b)]);
        assert_eq!(ex.meta["source"], MetaValue::Text("fews".into()));
        assert_eq!(ex.collisions, vec!["source".to_string()]);
    }

    #[test]
    fn equal_rewrites_are_not_collisions() {
        let name = MetaField::from("obs");
        let mut inner = BTreeMap::new();
        inner.insert("name".to_string(), MetaField::from("obs"));
        let meta = MetaField::Map(inner);

        let ex = extract([("name", &name), ("meta", &meta)]);
        assert!(ex.collisions.is_empty());
    }

    #[test]
    fn extraction_is_idempotent() {
        let name = MetaField::from("obs");
        let meta = MetaField::Map(nested());
        let fields = [("name", &name), ("meta", &meta)];

        let first = extract(fields);
        let second = extract(fields);
        assert_eq!(first, second);
    }
}
