//! Measures `ProbingMap` probe lengths across load factors and plots them.
//!
//! Keys are random `u64`s. Each load factor is measured twice: right after the
//! keys are inserted, and after half of them were removed and replaced with
//! fresh keys, so tombstones are in play.
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_precision_loss)]

use std::error::Error;

use plotters::prelude::*;
use probing_map::ProbingMap;
use rand::Rng;
use tracing_subscriber::EnvFilter;

/// Keys inserted per run
const NUM_KEYS: usize = 100_000;
/// Every run starts small so growth is part of the measurement
const INITIAL_CAPACITY: usize = 16;
/// Load factors 0.1, 0.2, ..., 1.0
const NUM_LOAD_FACTORS: usize = 10;

/// Measured map states, in run order
const PHASES: [&str; 2] = ["Fresh inserts", "After churn"];
/// One color per phase
const COLORS: [RGBColor; 2] = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];

const FONT_FAMILY: &str = "sans-serif";
const TEXT_SIZE: u32 = 16;
const TITLE_SIZE: u32 = 35;
const LINE_WIDTH: u32 = 2;
const MARKER_SIZE: u32 = 4;

/// Probe statistics for one map state
#[derive(Debug, Clone, Copy)]
struct ProbeStats {
    /// Mean slots examined per lookup
    average: f64,
    /// Longest lookup
    worst: usize,
    /// Slots in the table
    capacity: usize,
    /// Tombstones left in the table
    tombstones: usize,
}

/// Looks up every key and collects probe statistics
fn measure(map: &ProbingMap<u64, u64>, keys: &[u64]) -> ProbeStats {
    let (total, worst) = keys
        .iter()
        .map(|key| map.probe_length(key))
        .fold((0_usize, 0_usize), |(total, worst), len| (total + len, worst.max(len)));

    ProbeStats {
        average: if keys.is_empty() { 0.0 } else { total as f64 / keys.len() as f64 },
        worst,
        capacity: map.capacity(),
        tombstones: map.tombstones(),
    }
}

/// Fills a map at `load_factor`, measures it, churns half the keys and
/// measures again
fn run(load_factor: f64, keys: &[u64], replacements: &[u64]) -> [ProbeStats; 2] {
    let mut map = ProbingMap::new(INITIAL_CAPACITY, load_factor);
    for &key in keys {
        map.put(key, key);
    }
    let fresh = measure(&map, keys);

    let (removed, kept) = keys.split_at(keys.len() / 2);
    for key in removed {
        map.remove(key);
    }
    for &key in replacements {
        map.put(key, key);
    }
    let live: Vec<u64> = kept.iter().chain(replacements).copied().collect();
    let churned = measure(&map, &live);

    [fresh, churned]
}

/// One series per phase, one point per load factor
fn series(results: &[[ProbeStats; 2]], metric: impl Fn(&ProbeStats) -> f64) -> Vec<Vec<f64>> {
    (0..PHASES.len())
        .map(|phase| results.iter().filter_map(|stats| stats.get(phase)).map(&metric).collect())
        .collect()
}

/// Draws one line chart with a series per phase
fn plot(
    path: &str,
    title: &str,
    y_desc: &str,
    load_factors: &[f64],
    series: &[Vec<f64>],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_y = series.iter().flatten().fold(1.0_f64, |max, &y| max.max(y)) * 1.1; // 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT_FAMILY, TITLE_SIZE))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .right_y_label_area_size(10)
        .build_cartesian_2d(0.0..1.05, 0.0..max_y)?;

    chart
        .configure_mesh()
        .x_desc("Load factor")
        .y_desc(y_desc)
        .axis_desc_style((FONT_FAMILY, TEXT_SIZE))
        .draw()?;

    for ((phase, values), color) in PHASES.iter().zip(series).zip(COLORS) {
        let line_style = ShapeStyle::from(&color).stroke_width(LINE_WIDTH);
        let points = || load_factors.iter().copied().zip(values.iter().copied());

        chart
            .draw_series(LineSeries::new(points(), line_style))?
            .label(*phase)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        chart.draw_series(points().map(|point| Circle::new(point, MARKER_SIZE, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let load_factors: Vec<f64> =
        (1..=NUM_LOAD_FACTORS).map(|i| i as f64 / NUM_LOAD_FACTORS as f64).collect();

    let mut rng = rand::rng();
    let keys: Vec<u64> = (0..NUM_KEYS).map(|_| rng.random()).collect();
    let replacements: Vec<u64> = (0..NUM_KEYS / 2).map(|_| rng.random()).collect();

    let mut results = Vec::with_capacity(load_factors.len());
    for &load_factor in &load_factors {
        let stats = run(load_factor, &keys, &replacements);
        for (phase, stats) in PHASES.iter().zip(&stats) {
            tracing::info!(
                load_factor,
                phase,
                average = stats.average,
                worst = stats.worst,
                capacity = stats.capacity,
                tombstones = stats.tombstones,
                "measured probe lengths"
            );
        }
        results.push(stats);
    }

    plot(
        "average_probe_length.png",
        "Average Lookup Probe Length",
        "Slots examined",
        &load_factors,
        &series(&results, |stats| stats.average),
    )?;
    plot(
        "worst_probe_length.png",
        "Worst-Case Lookup Probe Length",
        "Slots examined",
        &load_factors,
        &series(&results, |stats| stats.worst as f64),
    )?;
    plot(
        "final_capacity.png",
        "Table Capacity After Growth",
        "Slots",
        &load_factors,
        &series(&results, |stats| stats.capacity as f64),
    )?;

    tracing::info!(
        "Generated plot images: average_probe_length.png, worst_probe_length.png, final_capacity.png"
    );

    Ok(())
}
