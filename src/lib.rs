#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![warn(missing_copy_implementations)]
/*!
 * # barrace
 * _timeline normalization and ranking for bar chart races_
 *
 * A bar chart race replays a ranked metric over successive periods: years, quarters, months.
 * Barrace is the data side of it. It turns flat rows of `(period, category, value)` into
 * a chronologically ordered timeline and answers, for each period, which categories lead
 * and what the total is. It draws nothing.
 *
 * ## Get started
 *
 * ```
 * use barrace::data::Row;
 * use barrace::meta::{Descriptor, Metadata};
 *
 * // The host describes its binding: first dimension is time,
 * // second is the category, first measure is the raced value.
 * let meta = Metadata::new()
 *     .with_dimension(Descriptor::new("Year", "dimensions_0"))
 *     .with_dimension(Descriptor::new("Country", "dimensions_1"))
 *     .with_measure(Descriptor::new("Population", "measures_0"));
 *
 * // Rows address their cells by descriptor key.
 * // Periods can come in any order and any supported format.
 * let rows = vec![
 *     Row::new()
 *         .with("dimensions_0", "Q1 2023")
 *         .with("dimensions_1", "France")
 *         .with("measures_0", 68.0),
 *     Row::new()
 *         .with("dimensions_0", "1/2023")
 *         .with("dimensions_1", "Spain")
 *         .with("measures_0", 48.0),
 *     Row::new()
 *         .with("dimensions_0", "2022")
 *         .with("dimensions_1", "France")
 *         .with("measures_0", 67.9),
 * ];
 *
 * let race = barrace::build_race(&rows, &meta).unwrap();
 *
 * // "Q1 2023" and "1/2023" are the same period
 * assert_eq!(race.timeline(), &["2022", "Q1 2023"]);
 * assert_eq!(race.top_n("Q1 2023", 1), vec![("France", 68.0)]);
 * assert_eq!(race.aggregate("Q1 2023"), 116.0);
 * ```
 *
 * ## Pipeline
 *
 *  - [`meta`] resolves the roles of the host dimensions and measures into a [`Shape`].
 *  - [`time`] parses period labels into a normalized label and a sortable [`Ordinal`].
 *    Unknown formats never fail: they get a deterministic fallback ordinal and sort last.
 *  - [`pivot`] groups the rows into one series per period and orders the periods.
 *  - [`rank`] derives ranked [`Frame`]s and totals from a series.
 *  - [`scale`] formats values in thousands, millions or billions.
 *
 * Beside the pipeline, [`replay::Player`] holds the play/pause state and the current
 * period index of the rendering layer.
 *
 * Every operation of the pipeline is a pure function of its input. The whole race is
 * rebuilt on each data change.
 *
 * ## Crate features
 *
 *  - `data-csv`: enables CSV row sets (See [`data::CsvParser`])
 *  - `binding-json`: enables decoding of the host data binding with `serde_json` (See `binding`)
 *
 */
// Barrace is released under the MIT License with the following copyright:
// Copyright (c) 2025-2026 Rémi Thebault

pub mod data;
pub mod meta;
pub mod pivot;
pub mod rank;
pub mod replay;
pub mod scale;
pub mod time;

#[cfg(feature = "binding-json")]
pub mod binding;

pub use data::{Row, Source, TableSource};
pub use meta::{Metadata, Shape, ShapeError};
pub use pivot::{Race, TimelineBuilder};
pub use rank::{DEFAULT_TOP_N, Frame, Limit};
pub use replay::{PlayState, Player};
pub use scale::{ScaleUnit, scale_value};
pub use time::{Ordinal, Period, PeriodKind};

/// Resolve the metadata and build the race from all rows of `source`.
///
/// Fails only if the metadata does not describe at least 2 dimensions and 1 measure,
/// in which case nothing should be rendered.
pub fn build_race<S>(source: &S, metadata: &Metadata) -> Result<Race, ShapeError>
where
    S: Source + ?Sized,
{
    let shape = metadata.resolve()?;
    Ok(Race::build(source, &shape))
}
