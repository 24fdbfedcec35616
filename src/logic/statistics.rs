//! Season statistics, rebuilt from the scoring event log across all matches.

use crate::models::{
    Match, MatchStatus, Player, PlayerId, PlayerStats, ScoreType, ScoringEvent, Team, TeamId,
};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlayerTotals {
    pub player_id: PlayerId,
    pub name: String,
    pub jersey_number: u8,
    pub team_id: TeamId,
    pub team_name: String,
    pub team_logo: String,
    #[serde(flatten)]
    pub stats: PlayerStats,
    pub total_points: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamTotals {
    pub team_id: TeamId,
    pub name: String,
    pub logo: String,
    pub matches_played: u32,
    pub points: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct StatisticsReport {
    pub total_matches: usize,
    pub total_tries: u32,
    pub total_points: u32,
    pub players: Vec<PlayerTotals>,
    pub teams: Vec<TeamTotals>,
}

/// Aggregate every event into per-player and per-team totals.
///
/// Players are ordered by points (highest first), then jersey number; teams by points, then name.
/// Events for players or teams no longer on file are still counted in the overall totals.
pub fn compile<'a>(
    teams: &[Team],
    players: &[Player],
    matches: impl IntoIterator<Item = &'a Match>,
    events: &[ScoringEvent],
) -> StatisticsReport {
    let mut per_player: HashMap<PlayerId, PlayerStats> = HashMap::new();
    let mut per_team: HashMap<TeamId, u32> = HashMap::new();
    let mut report = StatisticsReport::default();

    for e in events {
        per_player.entry(e.player_id).or_default().record(e.score_type);
        *per_team.entry(e.team_id).or_default() += e.points;
        report.total_points += e.points;
        if e.score_type == ScoreType::Try {
            report.total_tries += 1;
        }
    }

    let mut played: HashMap<TeamId, u32> = HashMap::new();
    // Only kicked-off matches count as played.
    for m in matches.into_iter().filter(|m| m.status != MatchStatus::Upcoming) {
        report.total_matches += 1;
        for id in m.team_ids() {
            *played.entry(id).or_default() += 1;
        }
    }

    let team_by_id: HashMap<TeamId, &Team> = teams.iter().map(|t| (t.id, t)).collect();

    report.players = players
        .iter()
        .map(|p| {
            let stats = per_player.get(&p.id).copied().unwrap_or_default();
            let team = team_by_id.get(&p.team_id);
            PlayerTotals {
                player_id: p.id,
                name: p.name.clone(),
                jersey_number: p.jersey_number,
                team_id: p.team_id,
                team_name: team.map(|t| t.name.clone()).unwrap_or_default(),
                team_logo: team.map(|t| t.logo.clone()).unwrap_or_default(),
                total_points: stats.total_points(),
                stats,
            }
        })
        .collect();
    report
        .players
        .sort_by(|a, b| b.total_points.cmp(&a.total_points).then(a.jersey_number.cmp(&b.jersey_number)));

    report.teams = teams
        .iter()
        .map(|t| TeamTotals {
            team_id: t.id,
            name: t.name.clone(),
            logo: t.logo.clone(),
            matches_played: played.get(&t.id).copied().unwrap_or(0),
            points: per_team.get(&t.id).copied().unwrap_or(0),
        })
        .collect();
    report
        .teams
        .sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.name.cmp(&b.name)));

    report
}
