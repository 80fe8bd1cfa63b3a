use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;

use eventscore_game::{
    ActiveEvent, Comparison, EventDay, HuntingReport, Period, ScoreSheet, TierOutcome,
    WeekSummary,
};

/// A saved week after a submission.
#[derive(Debug, Clone, Serialize)]
pub struct SavedWeek {
    pub key: String,
    pub weekly_total: u64,
}

/// One scored calculator board.
#[derive(Debug, Serialize)]
pub struct SheetReport<'a> {
    pub board: String,
    pub sheet: &'a ScoreSheet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved: Option<SavedWeek>,
}

#[derive(Debug, Serialize)]
pub struct HuntingSummary<'a> {
    pub board: &'static str,
    pub report: &'a HuntingReport,
}

#[derive(Debug, Serialize)]
pub struct WeekReport<'a> {
    pub period: &'a Period,
    pub label: String,
    pub summary: &'a WeekSummary,
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<EventDay>,
    pub comparison: Comparison,
}

#[derive(Debug, Serialize)]
pub struct ScheduleStatus {
    pub local_time: String,
    pub active_event: ActiveEvent,
    pub rollover_in: String,
    pub period: Period,
    pub label: String,
}

pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Group digits in threes: `43500` becomes `43,500`.
pub fn thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

fn heading(out: &mut dyn Write, title: &str) -> Result<()> {
    writeln!(out, "{}", title.bright_cyan().bold())?;
    writeln!(out, "{}", "-".repeat(30).cyan())?;
    Ok(())
}

pub fn console_sheet(out: &mut dyn Write, report: &SheetReport<'_>, verbose: bool) -> Result<()> {
    let sheet = report.sheet;
    heading(out, &format!("📋 {}", report.board))?;
    writeln!(out, "Starting score: {}", thousands(sheet.starting_score))?;

    for line in sheet
        .lines
        .iter()
        .filter(|line| verbose || line.amount > 0)
    {
        writeln!(
            out,
            "  {:<24} {:>10} → {:>12}",
            line.id,
            thousands(line.amount),
            thousands(line.points)
        )?;
    }

    if let Some(dragons) = &sheet.dragons {
        writeln!(out, "{}", "Dragon tracks".bold())?;
        for outcome in &dragons.tiers {
            write_tier(out, outcome)?;
        }
    }

    writeln!(out, "Earned: {}", thousands(sheet.earned()))?;
    writeln!(
        out,
        "Total:  {}",
        thousands(sheet.total).bright_green().bold()
    )?;

    if let Some(saved) = &report.saved {
        writeln!(
            out,
            "💾 Saved under {} (weekly total {})",
            saved.key.green(),
            thousands(saved.weekly_total)
        )?;
    }
    Ok(())
}

fn write_tier(out: &mut dyn Write, outcome: &TierOutcome) -> Result<()> {
    let result = &outcome.result;
    let status = if let Some(reason) = &result.blocked_reason {
        reason.to_string().yellow().to_string()
    } else if result.levels_gained > 0 {
        format!(
            "L{} → L{}",
            result.new_level - result.levels_gained,
            result.new_level
        )
        .green()
        .to_string()
    } else if result.next_level_cost > 0 {
        format!(
            "{} more for level {}",
            thousands(result.shortfall()),
            result.new_level.saturating_add(1)
        )
    } else {
        "flat rate".to_string()
    };
    writeln!(
        out,
        "  {:<10} {:<28} used {:>8}  left {:>8}  {:>12} pts",
        outcome.tier.to_string(),
        status,
        thousands(result.total_resources_consumed),
        thousands(result.remaining_resources),
        thousands(result.points_earned)
    )?;
    Ok(())
}

pub fn console_hunting(out: &mut dyn Write, summary: &HuntingSummary<'_>) -> Result<()> {
    let report = summary.report;
    heading(out, &format!("🏹 {}", summary.board))?;
    writeln!(out, "Action point items: {}", thousands(report.action_points))?;
    writeln!(out, "Daily video:        {}", thousands(report.daily_video_ap))?;
    writeln!(
        out,
        "VIP generation:     {} (+{}% heroes → {})",
        thousands(report.ap_generation),
        report.hero_bonus_pct,
        thousands(report.generated)
    )?;
    writeln!(out, "Hunting points:     {}", thousands(report.hunting_total))?;
    writeln!(
        out,
        "Total:              {}",
        thousands(report.total).bright_green().bold()
    )?;
    Ok(())
}

pub fn console_week(out: &mut dyn Write, report: &WeekReport<'_>) -> Result<()> {
    let summary = report.summary;
    heading(
        out,
        &format!("📅 Week {} ({})", report.period.week, report.label),
    )?;
    for status in &summary.days {
        let marker = if status.completed { "✅" } else { "⬜" };
        let score = status
            .score
            .map_or_else(|| "-".to_string(), thousands);
        writeln!(out, "  {marker} {:<12} {score:>14}", status.day.to_string())?;
    }
    writeln!(
        out,
        "Completed: {}/{}",
        summary.completed_days,
        summary.days.len()
    )?;
    writeln!(
        out,
        "Weekly total: {}",
        thousands(summary.total).bright_green().bold()
    )?;
    if let Some(updated) = summary.last_updated {
        writeln!(out, "Last updated: {}", updated.to_rfc3339())?;
    }
    Ok(())
}

pub fn console_comparison(out: &mut dyn Write, report: &ComparisonReport) -> Result<()> {
    let scope = report
        .day
        .map_or_else(|| "Weekly total".to_string(), |day| day.to_string());
    let comparison = &report.comparison;
    heading(out, &format!("🎯 {scope} vs target"))?;
    writeln!(out, "Current: {}", thousands(comparison.current))?;
    writeln!(out, "Target:  {}", thousands(comparison.target))?;
    if comparison.reached() {
        writeln!(
            out,
            "{} (ahead by {})",
            "Target reached".green().bold(),
            thousands(comparison.current - comparison.target)
        )?;
    } else {
        writeln!(
            out,
            "Need {} more points",
            thousands(comparison.points_needed).yellow().bold()
        )?;
    }
    Ok(())
}

pub fn console_schedule(out: &mut dyn Write, status: &ScheduleStatus) -> Result<()> {
    heading(out, &format!("⏰ {}", status.active_event))?;
    writeln!(out, "Local time:    {}", status.local_time)?;
    writeln!(out, "Next rollover: {}", status.rollover_in)?;
    writeln!(
        out,
        "Week {} ({}), saved under {}",
        status.period.week, status.label, status.period.key
    )?;
    Ok(())
}
