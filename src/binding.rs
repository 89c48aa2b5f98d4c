//! Decoding of the host data binding.
//!
//! The host delivers its binding as JSON:
//!
//! ```json
//! {
//!   "metadata": {
//!     "dimensions": {
//!       "dimensions_0": { "id": "Year", "description": "Year" },
//!       "dimensions_1": { "id": "Country", "description": "Country" }
//!     },
//!     "mainStructureMembers": {
//!       "measures_0": { "id": "Population", "label": "Population" }
//!     }
//!   },
//!   "data": [
//!     {
//!       "dimensions_0": { "id": "2022", "label": "2022" },
//!       "dimensions_1": { "id": "FR", "label": "France" },
//!       "measures_0": { "raw": 68000000, "formatted": "68 M" }
//!     }
//!   ]
//! }
//! ```
//!
//! Map keys are the descriptor keys used to address the cells of each row.
//! Document order of the maps is the host order of dimensions and measures.
use core::fmt;

use indexmap::IndexMap;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::data::Row;
use crate::meta::{Descriptor, Metadata, ShapeError};
use crate::pivot::Race;

/// Error returned when decoding a data binding
#[derive(Debug)]
pub enum BindingError {
    /// The input is not valid JSON, or not shaped as a binding
    Json(serde_json::Error),
    /// The metadata does not describe a race
    Shape(ShapeError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::Json(err) => write!(f, "invalid data binding: {err}"),
            BindingError::Shape(err) => write!(f, "unusable data binding: {err}"),
        }
    }
}

impl std::error::Error for BindingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindingError::Json(err) => Some(err),
            BindingError::Shape(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for BindingError {
    fn from(err: serde_json::Error) -> Self {
        BindingError::Json(err)
    }
}

impl From<ShapeError> for BindingError {
    fn from(err: ShapeError) -> Self {
        BindingError::Shape(err)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawDescriptor {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    label: Option<String>,
}

impl RawDescriptor {
    fn into_descriptor(self, key: String) -> Descriptor {
        Descriptor {
            id: self.id.unwrap_or_else(|| key.clone()),
            key,
            label: self.description.or(self.label),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    dimensions: IndexMap<String, RawDescriptor>,
    #[serde(default, rename = "mainStructureMembers")]
    measures: IndexMap<String, RawDescriptor>,
}

impl From<RawMetadata> for Metadata {
    fn from(raw: RawMetadata) -> Self {
        let collect = |map: IndexMap<String, RawDescriptor>| {
            map.into_iter()
                .map(|(key, desc)| desc.into_descriptor(key))
                .collect()
        };
        Metadata {
            dimensions: collect(raw.dimensions),
            measures: collect(raw.measures),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDataBinding {
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    data: Vec<Row>,
}

/// A decoded data binding: metadata and rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataBinding {
    /// Dimensions and measures, in host order
    pub metadata: Metadata,
    /// Rows, each keyed by descriptor key
    pub data: Vec<Row>,
}

impl DataBinding {
    /// Resolve the metadata and build the race from the rows
    pub fn race(&self) -> Result<Race, ShapeError> {
        let shape = self.metadata.resolve()?;
        Ok(Race::build(&self.data, &shape))
    }
}

/// Decode the metadata object of a data binding
pub fn parse_metadata(json: &str) -> Result<Metadata, BindingError> {
    let raw: RawMetadata = serde_json::from_str(json)?;
    Ok(raw.into())
}

/// Decode a whole data binding, metadata and rows
pub fn parse_data_binding(json: &str) -> Result<DataBinding, BindingError> {
    let raw: RawDataBinding = serde_json::from_str(json)?;
    log::trace!(
        "decoded data binding: {} dimensions, {} measures, {} rows",
        raw.metadata.dimensions.len(),
        raw.metadata.measures.len(),
        raw.data.len()
    );
    Ok(DataBinding {
        metadata: raw.metadata.into(),
        data: raw.data,
    })
}

/// Decode a binding and build the race in one go
pub fn race_from_json(json: &str) -> Result<Race, BindingError> {
    Ok(parse_data_binding(json)?.race()?)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Raw cell values are numbers, numeric strings, or null.
/// Anything else (text, booleans, arrays, objects) is kept as no value.
pub(crate) fn deserialize_raw<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(match raw {
        None => None,
        Some(RawNumber::Number(n)) => Some(n),
        Some(RawNumber::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(RawNumber::Other(_)) => None,
    })
}
