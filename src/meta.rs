//! Metadata resolution.
//!
//! The host describes a data binding with an ordered list of dimensions and measures.
//! Roles are positional: the first dimension is the time axis, the second one the
//! category axis, and the first measure is the metric that is raced.
//! [`Metadata::resolve`] turns that positional description into a typed [`Shape`],
//! once, so that the pivot never re-derives roles.
use core::fmt;

/// A dimension or measure descriptor, as provided by the host.
///
/// Only `key` is used by the pipeline, to project cells out of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    /// Stable identifier of the dimension or measure in the host model
    pub id: String,
    /// Key of the cells of this descriptor in each row
    pub key: String,
    /// Human readable label
    pub label: Option<String>,
}

impl Descriptor {
    /// Build a new descriptor without label
    pub fn new(id: &str, key: &str) -> Self {
        Descriptor {
            id: id.to_string(),
            key: key.to_string(),
            label: None,
        }
    }

    /// Set the label of this descriptor, returning self for chaining
    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// The label if set, the id otherwise
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Metadata of a data binding: dimensions and measures, in host order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Dimension descriptors
    pub dimensions: Vec<Descriptor>,
    /// Measure descriptors
    pub measures: Vec<Descriptor>,
}

impl Metadata {
    /// Create empty metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a dimension, returning self for chaining
    pub fn with_dimension(mut self, dimension: Descriptor) -> Self {
        self.dimensions.push(dimension);
        self
    }

    /// Append a measure, returning self for chaining
    pub fn with_measure(mut self, measure: Descriptor) -> Self {
        self.measures.push(measure);
        self
    }

    /// Resolve the positional roles.
    ///
    /// Fails if fewer than 2 dimensions or no measure are bound.
    /// Extra dimensions and measures are ignored.
    pub fn resolve(&self) -> Result<Shape, ShapeError> {
        let shape = match (self.dimensions.as_slice(), self.measures.first()) {
            ([time, category, ..], Some(metric)) => Shape {
                time: TimeDimension(time.clone()),
                category: CategoryDimension(category.clone()),
                metric: Metric(metric.clone()),
            },
            ([_, _, ..], None) => return Err(self.insufficient(ShapeError::MissingMeasure)),
            (dims, _) => {
                return Err(self.insufficient(ShapeError::MissingDimensions { found: dims.len() }));
            }
        };
        Ok(shape)
    }

    fn insufficient(&self, err: ShapeError) -> ShapeError {
        log::warn!(
            "insufficient data binding shape ({} dimensions, {} measures): {err}",
            self.dimensions.len(),
            self.measures.len()
        );
        err
    }
}

/// Error signaling that a data binding does not have the shape a race needs.
/// The caller is expected to skip rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Fewer than 2 dimensions are bound
    MissingDimensions {
        /// Number of dimensions actually bound
        found: usize,
    },
    /// No measure is bound
    MissingMeasure,
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ShapeError::MissingDimensions { found } => {
                write!(f, "expected at least 2 dimensions, found {found}")
            }
            ShapeError::MissingMeasure => write!(f, "expected at least 1 measure, found none"),
        }
    }
}

impl std::error::Error for ShapeError {}

macro_rules! role_newtype {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(Descriptor);

        impl $name {
            /// Wrap a descriptor
            pub fn new(descriptor: Descriptor) -> Self {
                $name(descriptor)
            }

            /// Key of the cells of this role in each row
            pub fn key(&self) -> &str {
                &self.0.key
            }

            /// The underlying descriptor
            pub fn descriptor(&self) -> &Descriptor {
                &self.0
            }
        }
    };
}

role_newtype!(
    /// The dimension holding period labels
    TimeDimension
);
role_newtype!(
    /// The dimension holding category names (one bar per category)
    CategoryDimension
);
role_newtype!(
    /// The measure giving the bar lengths
    Metric
);

/// Resolved roles of a data binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    /// The time axis
    pub time: TimeDimension,
    /// The category axis
    pub category: CategoryDimension,
    /// The raced measure
    pub metric: Metric,
}

impl Shape {
    /// Build a shape directly from the row keys of each role
    pub fn from_keys(time: &str, category: &str, metric: &str) -> Self {
        Shape {
            time: TimeDimension(Descriptor::new(time, time)),
            category: CategoryDimension(Descriptor::new(category, category)),
            metric: Metric(Descriptor::new(metric, metric)),
        }
    }
}
