//! Collections of observations and their summary table.

use hydrostore_meta::FlatMeta;
use serde::Serialize;

use crate::error::ObsError;
use crate::kind::ObsKind;
use crate::observation::Observation;

/// Rectangular spatial extent, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Extent {
    xmin: f64,
    xmax: f64,
    ymin: f64,
    ymax: f64,
}

impl Extent {
    /// Creates an extent from `[xmin, xmax, ymin, ymax]`.
    ///
    /// # Errors
    ///
    /// Returns [`ObsError::InvalidExtent`] if a bound is not finite or a
    /// minimum exceeds its maximum.
    pub fn new(bounds: [f64; 4]) -> Result<Self, ObsError> {
        let [xmin, xmax, ymin, ymax] = bounds;
        if bounds.iter().any(|b| !b.is_finite()) {
            return Err(ObsError::InvalidExtent {
                details: format!("bounds must be finite, got {bounds:?}"),
            });
        }
        if xmin > xmax {
            return Err(ObsError::InvalidExtent {
                details: format!("xmin {xmin} > xmax {xmax}"),
            });
        }
        if ymin > ymax {
            return Err(ObsError::InvalidExtent {
                details: format!("ymin {ymin} > ymax {ymax}"),
            });
        }
        Ok(Self {
            xmin,
            xmax,
            ymin,
            ymax,
        })
    }

    /// Whether a point lies inside. Unknown coordinates never do.
    pub fn contains(&self, x: Option<f64>, y: Option<f64>) -> bool {
        match (x, y) {
            (Some(x), Some(y)) => {
                (self.xmin..=self.xmax).contains(&x) && (self.ymin..=self.ymax).contains(&y)
            }
            _ => false,
        }
    }
}

/// Collection-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionMeta {
    /// Where the observations came from (a store path or file), if known.
    pub source: Option<String>,
    /// Kind of the observations.
    pub kind: ObsKind,
    /// Whether the collection stays associated with its source store.
    pub associated: bool,
}

/// One row of the summary table of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    /// Observation name, the row key.
    pub name: String,
    /// X coordinate, `None` if unknown.
    pub x: Option<f64>,
    /// Y coordinate, `None` if unknown.
    pub y: Option<f64>,
    /// Source filename.
    pub filename: String,
    /// Number of measurements.
    pub n_rows: usize,
    /// Value column names.
    pub columns: Vec<String>,
    /// Flattened metadata.
    pub meta: FlatMeta,
}

impl SummaryRow {
    /// Builds the row for one observation.
    pub fn from_observation(obs: &Observation) -> Self {
        Self {
            name: obs.name().to_string(),
            x: obs.x(),
            y: obs.y(),
            filename: obs.filename().to_string(),
            n_rows: obs.data().len(),
            columns: obs
                .data()
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
            meta: obs.extract_metadata().into_meta(),
        }
    }
}

/// A named set of observations.
///
/// Observations keep their insertion order; lookups by name return the
/// first match.
#[derive(Debug, Clone, PartialEq)]
pub struct ObsCollection {
    name: String,
    observations: Vec<Observation>,
    meta: CollectionMeta,
}

impl ObsCollection {
    /// Creates a collection.
    pub fn new(name: impl Into<String>, observations: Vec<Observation>, meta: CollectionMeta) -> Self {
        Self {
            name: name.into(),
            observations,
            meta,
        }
    }

    /// Collection name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Collection-level metadata.
    pub fn meta(&self) -> &CollectionMeta {
        &self.meta
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` if the collection holds no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Iterates observations in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    /// Observation names in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.observations.iter().map(Observation::name).collect()
    }

    /// Looks up an observation by name.
    pub fn get(&self, name: &str) -> Option<&Observation> {
        self.observations.iter().find(|o| o.name() == name)
    }

    /// Observations whose coordinates fall inside `extent`.
    pub fn within<'a>(&'a self, extent: &'a Extent) -> impl Iterator<Item = &'a Observation> + 'a {
        self.observations
            .iter()
            .filter(move |o| extent.contains(o.x(), o.y()))
    }

    /// Summary table: one row per observation.
    pub fn summary(&self) -> Vec<SummaryRow> {
        self.observations
            .iter()
            .map(SummaryRow::from_observation)
            .collect()
    }

    /// Consumes the collection, returning its observations.
    pub fn into_observations(self) -> Vec<Observation> {
        self.observations
    }
}

impl<'a> IntoIterator for &'a ObsCollection {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::DataTable;

    fn obs(name: &str, x: Option<f64>, y: Option<f64>) -> Observation {
        Observation::new(name, DataTable::empty(["value"]).unwrap()).with_xy(x, y)
    }

    #[test]
    fn extent_validation() {
        assert!(Extent::new([0.0, 1.0, 0.0, 1.0]).is_ok());
        assert!(matches!(
            Extent::new([2.0, 1.0, 0.0, 1.0]),
            Err(ObsError::InvalidExtent { .. })
        ));
        assert!(matches!(
            Extent::new([0.0, 1.0, 3.0, 1.0]),
            Err(ObsError::InvalidExtent { .. })
        ));
        assert!(matches!(
            Extent::new([0.0, f64::NAN, 0.0, 1.0]),
            Err(ObsError::InvalidExtent { .. })
        ));
    }

    #[test]
    fn extent_contains_is_inclusive() {
        let e = Extent::new([115534.0, 115539.0, 0.0, 1e7]).unwrap();
        assert!(e.contains(Some(115534.0), Some(0.0)));
        assert!(e.contains(Some(115539.0), Some(1e7)));
        assert!(!e.contains(Some(115540.0), Some(5.0)));
        assert!(!e.contains(None, Some(5.0)));
    }

    #[test]
    fn within_filters_unknown_coordinates() {
        let oc = ObsCollection::new(
            "oc",
            vec![
                obs("in", Some(1.0), Some(1.0)),
                obs("out", Some(9.0), Some(1.0)),
                obs("unknown", None, None),
            ],
            CollectionMeta::default(),
        );
        let e = Extent::new([0.0, 2.0, 0.0, 2.0]).unwrap();
        let names: Vec<_> = oc.within(&e).map(Observation::name).collect();
        assert_eq!(names, vec!["in"]);
    }

    #[test]
    fn summary_rows_follow_observations() {
        let oc = ObsCollection::new(
            "oc",
            vec![obs("a", Some(1.0), None), obs("b", None, None)],
            CollectionMeta::default(),
        );
        let rows = oc.summary();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "a");
        assert_eq!(rows[0].x, Some(1.0));
        assert_eq!(rows[0].y, None);
        assert_eq!(rows[0].columns, vec!["value".to_string()]);
        assert_eq!(rows[1].n_rows, 0);
    }

    #[test]
    fn summary_row_serializes() {
        let row = SummaryRow::from_observation(&obs("a", Some(1.5), None));
        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"name\":\"a\""));
        assert!(json.contains("\"x\":1.5"));
        assert!(json.contains("\"y\":null"));
    }

    #[test]
    fn lookup_by_name() {
        let oc = ObsCollection::new("oc", vec![obs("a", None, None)], CollectionMeta::default());
        assert!(oc.get("a").is_some());
        assert!(oc.get("b").is_none());
        assert_eq!(oc.names(), vec!["a"]);
        assert_eq!(oc.name(), "oc");
    }
}
