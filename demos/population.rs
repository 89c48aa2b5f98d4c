//! Replays a population race in the terminal.
//!
//! ```text
//! cargo run --example population --features data-csv -- [file.csv] [top] [scale]
//! ```
//!
//! The CSV file must have the period in its first column, the category in its second,
//! and the value in its third. Without a file, a small sample is replayed.
//! Set `RUST_LOG=debug` to see skipped rows and unrecognized periods.
use barrace::data::CsvParser;
use barrace::meta::{Descriptor, Metadata};
use barrace::{Limit, Player, ScaleUnit, scale_value};
use miette::IntoDiagnostic;

/// Populations in thousands of inhabitants
const SAMPLE: &str = include_str!("../tests/data/population.csv");

fn main() -> miette::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let data = match args.next() {
        Some(path) => std::fs::read_to_string(&path).into_diagnostic()?,
        None => SAMPLE.to_string(),
    };
    let limit = args.next().map_or(Limit::default(), |s| Limit::from(s.as_str()));
    let unit: ScaleUnit = args
        .next()
        .as_deref()
        .unwrap_or("k")
        .parse()
        .into_diagnostic()?;

    let table = CsvParser::new().parse(&data).into_diagnostic()?;
    let heads = table.heads();
    let mut meta = Metadata::new();
    for head in heads.iter().take(2) {
        meta = meta.with_dimension(Descriptor::new(head, head));
    }
    if let Some(head) = heads.get(2) {
        meta = meta.with_measure(Descriptor::new(head, head));
    }

    let race = barrace::build_race(&table, &meta).into_diagnostic()?;
    if race.skipped_rows() > 0 {
        log::warn!("{} rows skipped", race.skipped_rows());
    }

    let mut player = Player::new(race.len());
    player.play();
    loop {
        if let Some(frame) = race.frame(player.index(), limit) {
            println!(
                "== {} == total {}",
                frame.period,
                scale_value(frame.total, unit, 1)
            );
            for (rank, (category, value)) in frame.bars.iter().enumerate() {
                println!("{:>3}. {:<12} {}", rank + 1, category, scale_value(*value, unit, 1));
            }
            println!();
        }
        std::thread::sleep(player.tick_interval());
        if player.tick().is_none() {
            break;
        }
    }
    player.destroy();
    Ok(())
}
