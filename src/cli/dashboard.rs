use std::{fmt::Display, path::PathBuf};

use ansi_term::{Colour, Style};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Local};
use chrono_english::parse_date_string;
use clap::{Parser, ValueEnum};

use crate::{
    cli::load_records,
    stats::{
        daily::{summarize_day, DailySummary},
        heatmap::{ProductivityHeatmap, DAY_LABELS},
    },
    utils::time::format_duration,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DateStyle {
    Uk,
    Us,
}

impl From<DateStyle> for chrono_english::Dialect {
    fn from(value: DateStyle) -> Self {
        match value {
            DateStyle::Uk => Self::Uk,
            DateStyle::Us => Self::Us,
        }
    }
}

impl Display for DateStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateStyle::Uk => write!(f, "uk"),
            DateStyle::Us => write!(f, "us"),
        }
    }
}

#[derive(Debug, Parser)]
pub struct DashboardCommand {
    #[arg(
        long = "date",
        short,
        help = "Day to summarize. Examples are \"yesterday\", \"15/03/2025\". Defaults to today"
    )]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Parser)]
pub struct HeatmapCommand {
    #[arg(
        short,
        long,
        help = "Also print one \"{day}, {hour}:00\" line per cell with productive time"
    )]
    verbose: bool,
}

/// Renders the daily summary view: score out of ten, classified totals and
/// the top five sites by total time.
pub async fn process_dashboard_command(command: DashboardCommand, dir: PathBuf) -> Result<()> {
    let records = load_records(&dir).await;
    let day = parse_day(command.date, command.date_style)?;
    let summary = summarize_day(&records, day);

    print_summary(&summary);
    Ok(())
}

fn parse_day(date: Option<String>, date_style: DateStyle) -> Result<DateTime<Local>> {
    let now = Local::now();
    match date {
        None => Ok(now),
        Some(s) => parse_date_string(&s, now, date_style.into())
            .map(|v| v.with_timezone(&Local))
            .map_err(|e| anyhow!("Failed to parse date {s}: {e}")),
    }
}

fn print_summary(summary: &DailySummary) {
    let score_style = if summary.score >= 7.0 {
        Colour::Green.bold()
    } else if summary.score >= 4.0 {
        Colour::Yellow.bold()
    } else {
        Colour::Red.bold()
    };

    println!(
        "Productivity score: {}",
        score_style.paint(format!("{:.1} / 10", summary.score))
    );
    println!(
        "Productive:  {}",
        Colour::Green.paint(format_duration(summary.productive_time))
    );
    println!(
        "Distracting: {}",
        Colour::Red.paint(format_duration(summary.distracting_time))
    );
    println!();

    if summary.top_sites.is_empty() {
        println!("No activity tracked yet today.");
        return;
    }
    println!("Top sites:");
    for usage in &summary.top_sites {
        println!(
            "{:>8}  {}",
            format_duration(usage.duration),
            usage.domain
        );
    }
}

/// Renders the 7x24 productive-time heatmap for the last week.
pub async fn process_heatmap_command(command: HeatmapCommand, dir: PathBuf) -> Result<()> {
    let records = load_records(&dir).await;
    let heatmap = ProductivityHeatmap::build(&records, Local::now());

    print_heatmap(&heatmap);

    if command.verbose {
        println!();
        print_cell_breakdown(&heatmap);
    }
    Ok(())
}

fn print_heatmap(heatmap: &ProductivityHeatmap) {
    // Hour ruler, labeled every third hour like the grid is wide.
    print!("    ");
    for hour in 0..24 {
        if hour % 3 == 0 {
            print!("{hour:<3}");
        } else {
            print!("   ");
        }
    }
    println!();

    for (day, label) in DAY_LABELS.iter().enumerate() {
        print!("{label} ");
        for hour in 0..24 {
            let style = level_style(heatmap.level(day, hour));
            print!("{}", style.paint("██ "));
        }
        println!();
    }
}

fn level_style(level: u8) -> Style {
    match level {
        0 => Colour::Fixed(238).normal(),
        1 => Colour::Fixed(22).normal(),
        2 => Colour::Fixed(28).normal(),
        3 => Colour::Fixed(34).normal(),
        _ => Colour::Fixed(40).normal(),
    }
}

fn print_cell_breakdown(heatmap: &ProductivityHeatmap) {
    for (day, label) in DAY_LABELS.iter().enumerate() {
        for hour in 0..24 {
            let cell = heatmap.cell(day, hour);
            if !cell.is_zero() {
                println!("{label}, {hour}:00 - {} productive", format_duration(cell));
            }
        }
    }
}
