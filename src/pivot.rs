//! Timeline building and series pivot.
//!
//! Flat `(time, category, value)` rows are pivoted into one [`Series`]
//! (category to value) per period, and the periods are ordered chronologically
//! into a timeline. See [`Race::build`] and [`TimelineBuilder`].
use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::data::Source;
use crate::meta::Shape;
use crate::rank::{self, Frame, Limit};
use crate::time::{Ordinal, Period};

/// Values of one period, keyed by category name in first-seen order
pub type Series = IndexMap<String, f64>;

/// Pivoted data, keyed by normalized period label in timeline order
pub type SeriesByTime = IndexMap<String, Series>;

#[derive(Debug)]
struct Bucket {
    ordinal: Ordinal,
    series: Series,
}

/// Accumulates observations into per-period buckets, then orders the periods once.
///
/// Buckets are keyed by the normalized period label, so raw labels that normalize
/// the same (e.g. `"q2 2025"` and `"2/2025"`) are merged.
/// Within a bucket, the last value pushed for a category wins: values are not summed.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    buckets: IndexMap<String, Bucket>,
    skipped: usize,
}

impl TimelineBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Push one observation. Non-finite values are stored as `0`.
    pub fn push(&mut self, time: &str, category: &str, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        let period = Period::parse(time);
        let ordinal = period.ordinal();
        let bucket = match self.buckets.entry(period.into_label()) {
            Entry::Occupied(e) => e.into_mut(),
            Entry::Vacant(e) => e.insert(Bucket {
                ordinal,
                series: Series::new(),
            }),
        };
        // a category already present keeps its position
        bucket.series.insert(category.to_string(), value);
    }

    /// Push one row of a source.
    ///
    /// Rows without time or category cell are skipped and counted.
    /// A missing or non-numeric measure contributes `0`.
    pub fn push_row<S>(&mut self, source: &S, row: usize, shape: &Shape)
    where
        S: Source + ?Sized,
    {
        let time = source.cell(row, shape.time.key()).and_then(|c| c.text());
        let category = source.cell(row, shape.category.key()).and_then(|c| c.text());
        let (Some(time), Some(category)) = (time, category) else {
            log::debug!("skipping row {row}: missing time or category cell");
            self.skipped += 1;
            return;
        };
        let value = source
            .cell(row, shape.metric.key())
            .map_or(0.0, |c| c.number());
        self.push(&time, &category, value);
    }

    /// Number of rows skipped so far
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    /// Order the periods chronologically and build the [`Race`].
    ///
    /// The sort is stable: periods with equal ordinals keep their first-seen order.
    pub fn finish(self) -> Race {
        let mut buckets = self.buckets;
        buckets.sort_by(|_, a, _, b| a.ordinal.cmp(&b.ordinal));

        let timeline: Vec<String> = buckets.keys().cloned().collect();
        let series_by_time: SeriesByTime = buckets
            .into_iter()
            .map(|(label, bucket)| (label, bucket.series))
            .collect();

        log::trace!(
            "built timeline of {} periods ({} rows skipped)",
            timeline.len(),
            self.skipped
        );

        Race {
            timeline,
            series_by_time,
            skipped: self.skipped,
        }
    }
}

/// A chronologically ordered timeline with its pivoted series.
///
/// A race is rebuilt from scratch on every data change and is immutable afterwards.
/// Queries by period label return empty results for unknown periods.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Race {
    timeline: Vec<String>,
    series_by_time: SeriesByTime,
    skipped: usize,
}

impl Race {
    /// Build a race from all rows of a source
    pub fn build<S>(source: &S, shape: &Shape) -> Self
    where
        S: Source + ?Sized,
    {
        let mut builder = TimelineBuilder::new();
        for row in 0..source.len() {
            builder.push_row(source, row, shape);
        }
        builder.finish()
    }

    /// Build a race from `(time, category, value)` tuples
    pub fn from_tuples<'a, I>(tuples: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, f64)>,
    {
        let mut builder = TimelineBuilder::new();
        for (time, category, value) in tuples {
            builder.push(time, category, value);
        }
        builder.finish()
    }

    /// The period labels, in ascending chronological order
    pub fn timeline(&self) -> &[String] {
        &self.timeline
    }

    /// The pivoted data
    pub fn series_by_time(&self) -> &SeriesByTime {
        &self.series_by_time
    }

    /// Number of periods
    pub fn len(&self) -> usize {
        self.timeline.len()
    }

    /// Check whether there is nothing to render
    pub fn is_empty(&self) -> bool {
        self.timeline.is_empty()
    }

    /// Number of input rows that were skipped for lack of time or category
    pub fn skipped_rows(&self) -> usize {
        self.skipped
    }

    /// Get the series of a period
    pub fn series(&self, period: &str) -> Option<&Series> {
        self.series_by_time.get(period)
    }

    /// Get the period label at the given timeline index
    pub fn period(&self, index: usize) -> Option<&str> {
        self.timeline.get(index).map(String::as_str)
    }

    /// Get the timeline index of a period label
    pub fn index_of(&self, period: &str) -> Option<usize> {
        self.series_by_time.get_index_of(period)
    }

    /// Clamp an index into the timeline bounds.
    /// Returns None if the timeline is empty.
    pub fn clamp_index(&self, index: usize) -> Option<usize> {
        self.len().checked_sub(1).map(|last| index.min(last))
    }

    /// The ranked categories of a period, value descending, truncated to `limit`
    pub fn top_n(&self, period: &str, limit: impl Into<Limit>) -> Vec<(&str, f64)> {
        self.series(period)
            .map(|s| rank::top_n(s, limit))
            .unwrap_or_default()
    }

    /// The sum of all values of a period
    pub fn aggregate(&self, period: &str) -> f64 {
        self.series(period).map_or(0.0, rank::aggregate)
    }

    /// The ranked frame at the given timeline index
    pub fn frame(&self, index: usize, limit: impl Into<Limit>) -> Option<Frame<'_>> {
        let (period, series) = self.series_by_time.get_index(index)?;
        Some(Frame {
            index,
            period,
            bars: rank::top_n(series, limit),
            total: rank::aggregate(series),
        })
    }

    /// Iterate over all frames, in timeline order
    pub fn frames(&self, limit: impl Into<Limit>) -> impl Iterator<Item = Frame<'_>> + '_ {
        let limit = limit.into();
        (0..self.len()).filter_map(move |i| self.frame(i, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Row;

    fn shape() -> Shape {
        Shape::from_keys("year", "country", "pop")
    }

    fn row(time: &str, category: &str, value: f64) -> Row {
        Row::new()
            .with("year", time)
            .with("country", category)
            .with("pop", value)
    }

    #[test]
    fn test_scenario_basic() {
        let rows = vec![row("2022", "A", 10.0), row("2023", "A", 5.0), row("2022", "B", 7.0)];
        let race = Race::build(&rows, &shape());

        assert_eq!(race.timeline(), &["2022", "2023"]);
        let series = race.series("2022").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series["A"], 10.0);
        assert_eq!(series["B"], 7.0);
        assert_eq!(race.top_n("2022", 1), vec![("A", 10.0)]);
        assert_eq!(race.aggregate("2022"), 17.0);
    }

    #[test]
    fn test_scenario_mixed_formats() {
        let race = Race::from_tuples([
            ("JAN 2024", "A", 1.0),
            ("2023", "A", 1.0),
            ("Q1 2024", "A", 1.0),
        ]);
        assert_eq!(race.timeline(), &["2023", "JAN 2024", "Q1 2024"]);
    }

    #[test]
    fn test_duplicate_rows_last_write_wins() {
        let race = Race::from_tuples([("2022", "A", 10.0), ("2022", "A", 99.0)]);
        let series = race.series("2022").unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series["A"], 99.0);
        assert_eq!(race.aggregate("2022"), 99.0);
    }

    #[test]
    fn test_duplicate_keeps_first_position() {
        let race = Race::from_tuples([("2022", "A", 1.0), ("2022", "B", 1.0), ("2022", "A", 1.0)]);
        let categories: Vec<&str> = race.series("2022").unwrap().keys().map(String::as_str).collect();
        assert_eq!(categories, vec!["A", "B"]);
        // equal values rank in first-seen order
        assert_eq!(race.top_n("2022", Limit::All), vec![("A", 1.0), ("B", 1.0)]);
    }

    #[test]
    fn test_missing_measure_is_zero() {
        let rows = vec![
            Row::new().with("year", "2022").with("country", "A"),
            Row::new()
                .with("year", "2022")
                .with("country", "B")
                .with("pop", f64::NAN),
            Row::new()
                .with("year", "2022")
                .with("country", "C")
                .with("pop", "not a number"),
        ];
        let race = Race::build(&rows, &shape());
        let series = race.series("2022").unwrap();
        assert_eq!(series["A"], 0.0);
        assert_eq!(series["B"], 0.0);
        assert_eq!(series["C"], 0.0);
        assert_eq!(race.aggregate("2022"), 0.0);
    }

    #[test]
    fn test_non_finite_values_are_zero() {
        let race = Race::from_tuples([
            ("2022", "A", f64::NAN),
            ("2022", "B", 3.0),
            ("2022", "C", f64::NEG_INFINITY),
        ]);
        let series = race.series("2022").unwrap();
        assert_eq!(series["A"], 0.0);
        assert_eq!(series["C"], 0.0);
        assert_eq!(
            race.top_n("2022", 10),
            vec![("B", 3.0), ("A", 0.0), ("C", 0.0)]
        );
        assert_eq!(race.aggregate("2022"), 3.0);
    }

    #[test]
    fn test_rows_without_time_or_category_are_skipped() {
        let rows = vec![
            Row::new().with("country", "A").with("pop", 1.0),
            Row::new().with("year", "2022").with("pop", 1.0),
            row("2022", "B", 2.0),
        ];
        let race = Race::build(&rows, &shape());
        assert_eq!(race.timeline(), &["2022"]);
        assert_eq!(race.skipped_rows(), 2);
        assert_eq!(race.top_n("2022", 10), vec![("B", 2.0)]);
    }

    #[test]
    fn test_empty_rows() {
        let race = Race::build(&Vec::<Row>::new(), &shape());
        assert!(race.is_empty());
        assert!(race.series_by_time().is_empty());
        assert_eq!(race.clamp_index(3), None);
        assert!(race.frame(0, 10).is_none());

        let race = Race::build(&(), &shape());
        assert_eq!(race, Race::default());
    }

    #[test]
    fn test_merge_equivalent_labels() {
        let race = Race::from_tuples([
            ("q2 2025", "A", 1.0),
            ("2/2025", "B", 2.0),
            ("2Q 2025", "C", 3.0),
        ]);
        assert_eq!(race.timeline(), &["Q2 2025"]);
        assert_eq!(race.series("Q2 2025").unwrap().len(), 3);
    }

    #[test]
    fn test_ordering_independent_of_input_order() {
        let labels = ["Q3 2021", "2020", "MAR 2021", "2021-01", "12/2020", "2021"];
        let race = Race::from_tuples(labels.iter().map(|l| (*l, "A", 1.0)));
        assert_eq!(
            race.timeline(),
            &["2020", "12/2020", "2021", "2021-01", "MAR 2021", "Q3 2021"]
        );

        let race = Race::from_tuples(labels.iter().rev().map(|l| (*l, "A", 1.0)));
        assert_eq!(
            race.timeline(),
            &["2020", "12/2020", "2021", "2021-01", "MAR 2021", "Q3 2021"]
        );
    }

    #[test]
    fn test_equal_ordinals_keep_first_seen_order() {
        let race = Race::from_tuples([("Q1 2024", "A", 1.0), ("MAR 2024", "A", 1.0)]);
        assert_eq!(race.timeline(), &["Q1 2024", "MAR 2024"]);
        let race = Race::from_tuples([("MAR 2024", "A", 1.0), ("Q1 2024", "A", 1.0)]);
        assert_eq!(race.timeline(), &["MAR 2024", "Q1 2024"]);
    }

    #[test]
    fn test_stable_fallback_position() {
        let race = Race::from_tuples([
            ("n/a", "A", 1.0),
            ("2022", "A", 1.0),
            ("n/a", "B", 1.0),
            ("2021", "A", 1.0),
        ]);
        assert_eq!(race.timeline(), &["2021", "2022", "n/a"]);
        assert_eq!(race.series("n/a").unwrap().len(), 2);
    }

    #[test]
    fn test_idempotent() {
        let rows = vec![
            row("FY 2022", "A", 3.0),
            row("2022", "A", 1.0),
            row("JAN 2022", "B", 2.0),
            row("2022", "C", 2.0),
        ];
        assert_eq!(Race::build(&rows, &shape()), Race::build(&rows, &shape()));
    }

    #[test]
    fn test_index_queries() {
        let race = Race::from_tuples([("2021", "A", 1.0), ("2020", "A", 1.0)]);
        assert_eq!(race.period(0), Some("2020"));
        assert_eq!(race.index_of("2021"), Some(1));
        assert_eq!(race.index_of("2019"), None);
        assert_eq!(race.clamp_index(5), Some(1));
        assert!(race.top_n("2019", 10).is_empty());
        assert_eq!(race.aggregate("2019"), 0.0);
    }

    #[test]
    fn test_frame() {
        let race = Race::from_tuples([
            ("2020", "A", 1.0),
            ("2020", "B", 3.0),
            ("2020", "C", 2.0),
            ("2021", "A", 5.0),
        ]);
        let frame = race.frame(0, 2).unwrap();
        assert_eq!(frame.index, 0);
        assert_eq!(frame.period, "2020");
        assert_eq!(frame.bars, vec![("B", 3.0), ("C", 2.0)]);
        assert_eq!(frame.total, 6.0);

        let periods: Vec<&str> = race.frames(Limit::All).map(|f| f.period).collect();
        assert_eq!(periods, vec!["2020", "2021"]);
    }
}
