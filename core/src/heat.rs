//! Temporal heat scores for a single dish.
//!
//! For each season a 7 × 6 grid (weekday × lunch/dinner time bucket) of
//! units sold is built from historical orders, then rescaled to integer
//! scores in [1, 10]. Orders that cannot be placed on the grid (bad
//! timestamp, unknown weekday or season, hour outside every bucket) are
//! skipped.

use crate::orders::Order;
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Fall   => "Fall",
        }
    }

    /// Case-insensitive; "autumn" is accepted for Fall.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "winter"          => Some(Self::Winter),
            "spring"          => Some(Self::Spring),
            "summer"          => Some(Self::Summer),
            "fall" | "autumn" => Some(Self::Fall),
            _ => None,
        }
    }
}

pub const WEEKDAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBucket {
    /// Inclusive.
    pub start_hour: u32,
    /// Exclusive.
    pub end_hour: u32,
    pub label: &'static str,
}

pub const TIME_BUCKETS: [TimeBucket; 6] = [
    TimeBucket { start_hour: 11, end_hour: 13, label: "11-1" },
    TimeBucket { start_hour: 13, end_hour: 15, label: "1-3" },
    TimeBucket { start_hour: 15, end_hour: 17, label: "3-5" },
    TimeBucket { start_hour: 17, end_hour: 19, label: "5-7" },
    TimeBucket { start_hour: 19, end_hour: 21, label: "7-9" },
    TimeBucket { start_hour: 21, end_hour: 23, label: "9-11" },
];

/// Raw units sold, indexed [weekday][bucket].
pub type RawGrid = [[u64; 6]; 7];

/// Scores in [1, 10], indexed [weekday][bucket].
pub type ScoreGrid = [[u8; 6]; 7];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatCell {
    /// Weekday name.
    pub x: String,
    /// Time bucket label.
    pub y: String,
    pub value: u8,
}

pub type HeatScores = BTreeMap<Season, Vec<HeatCell>>;

pub fn time_bucket(hour: u32) -> Option<usize> {
    TIME_BUCKETS
        .iter()
        .position(|b| (b.start_hour..b.end_hour).contains(&hour))
}

/// Monday = 0. Accepts full or three-letter names, any case.
pub fn weekday_index(name: &str) -> Option<usize> {
    let name = name.trim().to_ascii_lowercase();
    if name.len() < 3 {
        return None;
    }
    WEEKDAYS.iter().position(|d| {
        let d = d.to_ascii_lowercase();
        d == name || d[..3] == name
    })
}

/// Parse an ISO-8601 timestamp. Offsets are honoured as written: the
/// local wall-clock time of the order is what gets bucketed.
pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    let ts = ts.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(ts) {
        return Some(dt.naive_local());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(ts, fmt).ok())
}

/// Rescale a grid to integer scores in [1, 10].
///
/// All-zero grids score 1 everywhere, flat non-zero grids 5 everywhere;
/// otherwise 1 + floor((c - min) / (max - min) × 9).
pub fn scale_grid(grid: &RawGrid) -> ScoreGrid {
    let cells = grid.iter().flatten();
    let min = cells.clone().copied().min().unwrap_or(0);
    let max = cells.copied().max().unwrap_or(0);

    let mut scores = [[1u8; 6]; 7];
    if max == min {
        let flat = if max == 0 { 1 } else { 5 };
        for row in scores.iter_mut() {
            row.fill(flat);
        }
        return scores;
    }

    let span = (max - min) as f64;
    for (score_row, raw_row) in scores.iter_mut().zip(grid) {
        for (score, &count) in score_row.iter_mut().zip(raw_row) {
            let scaled = 1.0 + (((count - min) as f64 / span) * 9.0).floor();
            *score = scaled.clamp(1.0, 10.0) as u8;
        }
    }
    scores
}

/// Units of `dish_id` sold per season and grid cell. Every season is
/// present, zero-filled when nothing matched.
pub fn raw_counts(dish_id: &str, orders: &[Order]) -> BTreeMap<Season, RawGrid> {
    let mut grids: BTreeMap<Season, RawGrid> =
        Season::ALL.iter().map(|s| (*s, [[0u64; 6]; 7])).collect();
    let mut skipped = 0usize;

    for order in orders {
        let quantity = order.item_quantity(dish_id);
        if quantity == 0 {
            continue;
        }
        let Some(season) = order.season.as_deref().and_then(Season::parse) else {
            skipped += 1;
            continue;
        };
        let Some((weekday, bucket)) = locate(order) else {
            skipped += 1;
            continue;
        };
        if let Some(grid) = grids.get_mut(&season) {
            grid[weekday][bucket] += quantity;
        }
    }

    if skipped > 0 {
        log::debug!("heat: {dish_id}: skipped {skipped} orders that could not be placed");
    }
    grids
}

/// Per season, one record per weekday × bucket cell, weekday-major.
pub fn heat_scores(dish_id: &str, orders: &[Order]) -> HeatScores {
    raw_counts(dish_id, orders)
        .into_iter()
        .map(|(season, grid)| {
            let scores = scale_grid(&grid);
            let mut cells = Vec::with_capacity(WEEKDAYS.len() * TIME_BUCKETS.len());
            for (day, row) in WEEKDAYS.iter().zip(scores.iter()) {
                for (bucket, &value) in TIME_BUCKETS.iter().zip(row.iter()) {
                    cells.push(HeatCell {
                        x: day.to_string(),
                        y: bucket.label.to_string(),
                        value,
                    });
                }
            }
            (season, cells)
        })
        .collect()
}

fn locate(order: &Order) -> Option<(usize, usize)> {
    let ts = order.order_timestamp.as_deref()?;
    let Some(at) = parse_timestamp(ts) else {
        log::debug!("heat: order {}: unparseable timestamp '{ts}'", order.order_id);
        return None;
    };
    let weekday = match order.day.as_deref() {
        Some(day) => weekday_index(day)?,
        None => at.weekday().num_days_from_monday() as usize,
    };
    let bucket = time_bucket(at.hour())?;
    Some((weekday, bucket))
}
