use barrace::data::CsvParser;
use barrace::meta::Shape;
use barrace::{Limit, Race, TableSource};

use crate::{assert_dump_eq_ref, assert_race_eq_ref, data_file_str};

mod binding;
mod replay;

fn csv_table(file: &str) -> TableSource {
    CsvParser::new().parse(&data_file_str(file)).unwrap()
}

fn population() -> Race {
    let table = csv_table("population.csv");
    Race::build(&table, &Shape::from_keys("Year", "Country", "Population"))
}

fn quarters() -> Race {
    let table = csv_table("quarters.csv");
    Race::build(&table, &Shape::from_keys("Period", "Brand", "Sales"))
}

#[test]
fn population_table() {
    let table = csv_table("population.csv");
    assert_dump_eq_ref!(format!("{table:?}"), "population-table");
}

#[test]
fn population_top3() {
    let race = population();
    assert_race_eq_ref!(&race, 3, "population-top3");
}

#[test]
fn population_limit_all() {
    let race = population();
    let frame = race.frame(0, Limit::All).unwrap();
    assert_eq!(frame.period, "2019");
    assert_eq!(frame.bars.len(), 4);
    assert_eq!(frame.bars[3], ("Spain", 47134.0));
    // lenient limits all mean no truncation
    for limit in ["0", "-3", "many", ""] {
        assert_eq!(race.frame(0, limit), Some(frame.clone()));
    }
}

#[test]
fn population_row_order_does_not_matter() {
    let data = data_file_str("population.csv");
    let mut lines: Vec<&str> = data.lines().collect();
    lines[1..].reverse();
    let table = CsvParser::new().parse(&lines.join("\n")).unwrap();
    let reversed = Race::build(&table, &Shape::from_keys("Year", "Country", "Population"));

    let race = population();
    assert_eq!(reversed.timeline(), race.timeline());
    for period in race.timeline() {
        assert_eq!(reversed.top_n(period, 4), race.top_n(period, 4));
        assert_eq!(reversed.aggregate(period), race.aggregate(period));
    }
}

#[test]
fn quarters_all() {
    let race = quarters();
    assert_race_eq_ref!(&race, Limit::All, "quarters-all");
}

#[test]
fn quarters_rebuild_is_idempotent() {
    assert_eq!(quarters(), quarters());
}

#[test]
fn quarters_fallback_is_last() {
    let race = quarters();
    assert_eq!(race.period(race.len() - 1), Some("Someday"));
    assert_eq!(race.index_of("Q1 2023"), Some(1));
    assert_eq!(race.index_of("q1 2023"), None);
    assert!(race.top_n("Q3 2023", 10).is_empty());
    assert_eq!(race.aggregate("Q3 2023"), 0.0);
}
