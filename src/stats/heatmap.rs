use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike};

use crate::storage::entities::{Classification, SessionRecord};

pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const HEATMAP_WINDOW: Duration = Duration::seconds(7 * 24 * 60 * 60);

/// Productive time over the last seven days, bucketed by day-of-week (Sunday
/// first) and hour-of-day in the caller's timezone.
#[derive(Debug, PartialEq, Eq)]
pub struct ProductivityHeatmap {
    cells: [[Duration; 24]; 7],
}

impl ProductivityHeatmap {
    /// Accumulates productive records that started within the window ending
    /// at `now`. Pure over its inputs.
    pub fn build<Tz: TimeZone>(records: &[SessionRecord], now: DateTime<Tz>) -> Self {
        let window_start = now.clone() - HEATMAP_WINDOW;
        let mut cells = [[Duration::zero(); 24]; 7];

        for record in records {
            if record.classification != Classification::Productive {
                continue;
            }
            let start = record.start_time.with_timezone(&now.timezone());
            if start < window_start {
                continue;
            }
            let day = start.weekday().num_days_from_sunday() as usize;
            let hour = start.hour() as usize;
            cells[day][hour] += record.duration;
        }

        Self { cells }
    }

    pub fn cell(&self, day: usize, hour: usize) -> Duration {
        self.cells[day][hour]
    }

    pub fn max(&self) -> Duration {
        self.cells
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or_else(Duration::zero)
    }

    /// Intensity of one cell relative to the hottest cell, 0 to 4.
    pub fn level(&self, day: usize, hour: usize) -> u8 {
        intensity_level(self.cell(day, hour), self.max())
    }
}

pub fn intensity_level(cell: Duration, max: Duration) -> u8 {
    if max.is_zero() {
        return 0;
    }
    let ratio = cell.num_seconds() as f64 / max.num_seconds() as f64;
    if ratio > 0.75 {
        4
    } else if ratio > 0.5 {
        3
    } else if ratio > 0.25 {
        2
    } else if ratio > 0.0 {
        1
    } else {
        0
    }
}
