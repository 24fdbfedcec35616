//! Player tracking: `MM:SS.ss` video timestamps and CSV export.
//!
//! This time format (centiseconds) is unrelated to the `M:SS` match clock.

use crate::logic::validation::FieldErrors;
use crate::models::{Player, PlayerId, TeamId, TrackingForm, TrackingRecord};
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Column order of the CSV export. Consumers rely on it.
pub const CSV_HEADER: [&str; 9] = [
    "Time",
    "Player",
    "Jersey Number",
    "Action",
    "Description",
    "Field Position",
    "Points H",
    "Points V",
    "Created At",
];

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TrackingError {
    #[error("Time format should be MM:SS.ss")]
    BadTimeFormat,
    #[error("No tracking data records found for the selected team")]
    NoData,
    #[error("Failed to export tracking data: {0}")]
    Export(String),
}

/// Parse `M:SS`, `MM:SS`, `M:SS.ss` or `MM:SS.ss` into seconds.
pub fn parse_tracking_time(input: &str) -> Result<f64, TrackingError> {
    let (mins, rest) = input.split_once(':').ok_or(TrackingError::BadTimeFormat)?;
    let (secs, centis) = match rest.split_once('.') {
        Some((s, c)) => (s, Some(c)),
        None => (rest, None),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(1..=2).contains(&mins.len()) || !all_digits(mins) || secs.len() != 2 || !all_digits(secs) {
        return Err(TrackingError::BadTimeFormat);
    }
    if let Some(c) = centis {
        if c.len() != 2 || !all_digits(c) {
            return Err(TrackingError::BadTimeFormat);
        }
    }
    let mins: u32 = mins.parse().map_err(|_| TrackingError::BadTimeFormat)?;
    let secs: u32 = secs.parse().map_err(|_| TrackingError::BadTimeFormat)?;
    let centis: u32 = match centis {
        Some(c) => c.parse().map_err(|_| TrackingError::BadTimeFormat)?,
        None => 0,
    };
    Ok(f64::from(mins * 60 + secs) + f64::from(centis) / 100.0)
}

/// Render seconds as `M:SS.ss`, seconds zero-padded to five characters (`1:05.25`).
pub fn format_tracking_time(seconds: f64) -> String {
    let centis = (seconds.max(0.0) * 100.0).round() as u64;
    let mins = centis / 6000;
    let rem = centis % 6000;
    format!("{}:{:02}.{:02}", mins, rem / 100, rem % 100)
}

/// Validate a tracking form against the team's roster and build the record.
pub fn build_record(form: &TrackingForm, roster: &[Player]) -> Result<TrackingRecord, FieldErrors> {
    let mut errors = FieldErrors::from_form(form);
    if form.time.is_empty() {
        errors.add("time", "Time is required");
    }
    if form.action.is_empty() {
        errors.add("action", "Action is required");
    }
    let time = match parse_tracking_time(&form.time) {
        Ok(t) => Some(t),
        Err(e) => {
            errors.add("time", e.to_string());
            None
        }
    };
    if let Some(pid) = form.player_id {
        if !roster.iter().any(|p| p.id == pid && p.team_id == form.team_id) {
            errors.add("player_id", "Player is not on this team");
        }
    }

    let (Some(tracking_time), Some(player_id)) = (time, form.player_id) else {
        return Err(errors);
    };
    errors.into_result()?;

    Ok(TrackingRecord {
        id: Uuid::new_v4(),
        team_id: form.team_id,
        player_id,
        tracking_time,
        action: form.action.clone(),
        description: form.description.clone(),
        field_position: form.field_position.clone(),
        points_h: form.points_h,
        points_v: form.points_v,
        created_at: Utc::now(),
    })
}

/// Records of one team, ordered by video time.
pub fn records_for_team(records: &[TrackingRecord], team_id: TeamId) -> Vec<&TrackingRecord> {
    let mut out: Vec<&TrackingRecord> = records.iter().filter(|r| r.team_id == team_id).collect();
    out.sort_by(|a, b| a.tracking_time.total_cmp(&b.tracking_time));
    out
}

/// Export one team's tracking records as CSV with [`CSV_HEADER`] columns.
pub fn export_csv(
    records: &[TrackingRecord],
    players: &[Player],
    team_id: TeamId,
) -> Result<String, TrackingError> {
    let rows = records_for_team(records, team_id);
    if rows.is_empty() {
        return Err(TrackingError::NoData);
    }
    let by_id: HashMap<PlayerId, &Player> = players.iter().map(|p| (p.id, p)).collect();

    let export_err = |e: csv::Error| TrackingError::Export(e.to_string());
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER).map_err(export_err)?;
    for r in rows {
        let player = by_id.get(&r.player_id);
        let optional = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            format_tracking_time(r.tracking_time),
            player.map(|p| p.name.clone()).unwrap_or_default(),
            player.map(|p| p.jersey_number.to_string()).unwrap_or_default(),
            r.action.clone(),
            r.description.clone().unwrap_or_default(),
            r.field_position.clone().unwrap_or_default(),
            optional(r.points_h),
            optional(r.points_v),
            r.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        ])
        .map_err(export_err)?;
    }
    let bytes = wtr
        .into_inner()
        .map_err(|e| TrackingError::Export(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| TrackingError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_accepted_shapes() {
        assert_eq!(parse_tracking_time("1:05"), Ok(65.0));
        assert_eq!(parse_tracking_time("12:30.50"), Ok(750.5));
        assert_eq!(parse_tracking_time("0:00.07"), Ok(0.07));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "5", "1:5", "123:00", "1:05.5", "a:05", "1:05.", "1:05.123", "-1:05"] {
            assert_eq!(parse_tracking_time(bad), Err(TrackingError::BadTimeFormat), "{bad}");
        }
    }

    #[test]
    fn formats_with_centiseconds() {
        assert_eq!(format_tracking_time(65.25), "1:05.25");
        assert_eq!(format_tracking_time(0.0), "0:00.00");
        assert_eq!(format_tracking_time(59.999), "1:00.00");
        assert_eq!(format_tracking_time(750.5), "12:30.50");
    }
}
