//! Argument parsers that accept form-style text.
//!
//! Numbers go through the same normalization as the in-app forms, so
//! `--starting-score 1,250` is read as 1250.
use std::collections::BTreeMap;

use eventscore_game::{EventDay, TierInput, normalize_count, normalize_level};

pub fn parse_count(raw: &str) -> Result<u64, String> {
    Ok(normalize_count(raw))
}

pub fn parse_level(raw: &str) -> Result<u32, String> {
    Ok(normalize_level(raw))
}

pub fn parse_day(raw: &str) -> Result<EventDay, String> {
    raw.parse()
}

/// `LEVEL:RUNES`, e.g. `12:340`.
pub fn parse_track(raw: &str) -> Result<TierInput, String> {
    let (level, runes) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected LEVEL:RUNES, got {raw:?}"))?;
    Ok(TierInput::from_raw(level, runes))
}

/// `ID=AMOUNT`, e.g. `crowns=24`.
pub fn parse_resource(raw: &str) -> Result<(String, u64), String> {
    let (id, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=AMOUNT, got {raw:?}"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing resource id in {raw:?}"));
    }
    Ok((id.to_string(), normalize_count(amount)))
}

/// Action point items may be given by size alone: `50=3` means `ap_50=3`.
pub fn parse_action_points(raw: &str) -> Result<(String, u64), String> {
    let (id, amount) = parse_resource(raw)?;
    if id.chars().all(|c| c.is_ascii_digit()) {
        Ok((format!("ap_{id}"), amount))
    } else {
        Ok((id, amount))
    }
}

/// Collect repeated `ID=AMOUNT` pairs; later values for the same id win.
pub fn amounts(pairs: &[(String, u64)]) -> BTreeMap<String, u64> {
    pairs.iter().cloned().collect()
}
