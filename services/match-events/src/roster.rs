//! Roster correlation
//!
//! Builds the `Game` metadata the engine runs on. Teams, sides and
//! recordings come from the event details feed; the patch and the
//! participants come from the first live stats window, matched to the teams
//! by esports team id.
//!
//! Every failure here is a configuration error and is never retried.

use tracing::{debug, warn};

use match_types::errors::RosterError;
use match_types::feed::{EventDetails, GameDetails, ParticipantMetadata, WindowResponse};
use match_types::game::{Game, Metadata, Participant, Role, Team, Vod};
use match_types::ids::{GameId, MatchId, PlayerId, TeamId, VodId};
use match_types::side::Side;

use crate::config::EngineConfig;

fn parse_id<T>(
    parse: impl Fn(&str) -> Option<T>,
    field: &'static str,
    value: &str,
) -> Result<T, RosterError> {
    parse(value).ok_or_else(|| RosterError::InvalidId {
        field,
        value: value.to_string(),
    })
}

/// Indices of the games of a match that have completed.
pub fn completed_games(details: &EventDetails) -> Vec<usize> {
    details
        .match_details
        .games
        .iter()
        .enumerate()
        .filter(|(_, game)| game.is_completed())
        .map(|(index, _)| index)
        .collect()
}

fn side_of(game: &GameDetails, team_id: &str) -> Result<Side, RosterError> {
    let entry = game
        .teams
        .iter()
        .find(|t| t.id == team_id)
        .ok_or_else(|| RosterError::MissingSide {
            team_id: team_id.to_string(),
        })?;
    Side::parse(&entry.side).ok_or_else(|| RosterError::UnknownSide(entry.side.clone()))
}

/// Game metadata for game `index` of a match, without participants.
///
/// Recordings with an unknown (zero) offset are skipped.
pub fn build_game(
    details: &EventDetails,
    index: usize,
    config: &EngineConfig,
) -> Result<Game, RosterError> {
    let games = &details.match_details.games;
    let game = games.get(index).ok_or(RosterError::GameIndexOutOfRange {
        index,
        games: games.len(),
    })?;

    let teams = details
        .match_details
        .teams
        .iter()
        .map(|team| {
            Ok(Team {
                id: parse_id(TeamId::parse, "team id", &team.id)?,
                name: team.name.clone(),
                code: team.code.clone(),
                side: side_of(game, &team.id)?,
                participants: Vec::new(),
            })
        })
        .collect::<Result<Vec<_>, RosterError>>()?;

    let vods = game
        .vods
        .iter()
        .filter(|vod| vod.offset != 0)
        .map(|vod| {
            Ok(Vod {
                id: parse_id(VodId::parse, "vod id", &vod.id)?,
                platform: vod.provider.clone(),
                parameter: vod.parameter.clone(),
                locale: vod.locale.clone(),
                start_time_ms: vod.offset.abs(),
                end_time_ms: None,
            })
        })
        .collect::<Result<Vec<_>, RosterError>>()?;

    Ok(Game {
        metadata: Metadata {
            match_id: parse_id(MatchId::parse, "match id", &details.id)?,
            game_id: parse_id(GameId::parse, "game id", &game.id)?,
            patch: String::new(),
            teams,
        },
        bucket_interval_secs: config.bucket_interval_secs,
        vods,
    })
}

fn participant(meta: &ParticipantMetadata) -> Result<Participant, RosterError> {
    Ok(Participant {
        id: meta.participant_id,
        player_id: parse_id(PlayerId::parse, "player id", &meta.esports_player_id)?,
        champion: meta.champion_id.clone(),
        summoner_name: meta.summoner_name.clone(),
        role: meta.role.parse::<Role>()?,
    })
}

/// Fill in the patch and the participants from the first window.
pub fn attach_participants(game: &mut Game, window: &WindowResponse) -> Result<(), RosterError> {
    game.metadata.patch = window.game_metadata.patch_version.clone();

    for side in Side::BOTH {
        let meta = window.game_metadata.team(side);
        let team_id = parse_id(TeamId::parse, "team id", &meta.esports_team_id)?;
        let participants = meta
            .participant_metadata
            .iter()
            .map(participant)
            .collect::<Result<Vec<_>, RosterError>>()?;

        let team = game
            .team_by_id_mut(team_id)
            .ok_or_else(|| RosterError::UnknownTeam {
                team_id: meta.esports_team_id.clone(),
            })?;

        // The live feed is authoritative on sides
        if team.side != side {
            warn!(
                team_id = %team_id,
                scheduled = %team.side,
                live = %side,
                "Team side differs from schedule"
            );
            team.side = side;
        }
        team.participants = participants;
    }

    debug!(
        game_id = %game.game_id(),
        patch = %game.metadata.patch,
        "Participants attached"
    );
    Ok(())
}

/// A complete `Game` from a captured window alone. Team names are not part
/// of the window, so the team id stands in for both name and code.
pub fn game_from_window(window: &WindowResponse, config: &EngineConfig) -> Result<Game, RosterError> {
    let teams = Side::BOTH
        .iter()
        .map(|&side| {
            let meta = window.game_metadata.team(side);
            Ok(Team {
                id: parse_id(TeamId::parse, "team id", &meta.esports_team_id)?,
                name: meta.esports_team_id.clone(),
                code: meta.esports_team_id.clone(),
                side,
                participants: Vec::new(),
            })
        })
        .collect::<Result<Vec<_>, RosterError>>()?;

    let mut game = Game {
        metadata: Metadata {
            match_id: parse_id(MatchId::parse, "match id", &window.esports_match_id)?,
            game_id: parse_id(GameId::parse, "game id", &window.esports_game_id)?,
            patch: String::new(),
            teams,
        },
        bucket_interval_secs: config.bucket_interval_secs,
        vods: Vec::new(),
    };
    attach_participants(&mut game, window)?;
    Ok(game)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use match_types::feed::{
        GameMetadata, GameTeamDetails, MatchDetails, TeamDetails, TeamMetadata, VodDetails,
    };
    use match_types::ids::ParticipantId;

    const ROLES: [&str; 5] = ["top", "jungle", "mid", "bottom", "support"];

    pub(crate) fn event_details() -> EventDetails {
        EventDetails {
            id: "1".to_string(),
            match_details: MatchDetails {
                teams: vec![
                    TeamDetails {
                        id: "100".to_string(),
                        name: "Blue Squad".to_string(),
                        code: "BLU".to_string(),
                    },
                    TeamDetails {
                        id: "600".to_string(),
                        name: "Red Squad".to_string(),
                        code: "RED".to_string(),
                    },
                ],
                games: vec![
                    GameDetails {
                        id: "2".to_string(),
                        state: "completed".to_string(),
                        teams: vec![
                            GameTeamDetails {
                                id: "100".to_string(),
                                side: "blue".to_string(),
                            },
                            GameTeamDetails {
                                id: "600".to_string(),
                                side: "red".to_string(),
                            },
                        ],
                        vods: vec![
                            VodDetails {
                                id: "7".to_string(),
                                parameter: "abc".to_string(),
                                locale: "en-US".to_string(),
                                provider: "youtube".to_string(),
                                offset: -123_000,
                            },
                            VodDetails {
                                id: "8".to_string(),
                                parameter: "def".to_string(),
                                locale: "ko-KR".to_string(),
                                provider: "twitch".to_string(),
                                offset: 0,
                            },
                        ],
                    },
                    GameDetails {
                        id: "3".to_string(),
                        state: "unneeded".to_string(),
                        teams: Vec::new(),
                        vods: Vec::new(),
                    },
                ],
            },
        }
    }

    fn team_metadata(team_id: &str, first: u8) -> TeamMetadata {
        TeamMetadata {
            esports_team_id: team_id.to_string(),
            participant_metadata: (0..5)
                .map(|i| ParticipantMetadata {
                    participant_id: ParticipantId::new(first + i),
                    esports_player_id: format!("{}", 1000 + u64::from(first + i)),
                    summoner_name: format!("player{}", first + i),
                    champion_id: "Ahri".to_string(),
                    role: ROLES[i as usize].to_string(),
                })
                .collect(),
        }
    }

    pub(crate) fn window() -> WindowResponse {
        WindowResponse {
            esports_game_id: "2".to_string(),
            esports_match_id: "1".to_string(),
            game_metadata: GameMetadata {
                patch_version: "11.17.394.4489".to_string(),
                blue_team_metadata: team_metadata("100", 1),
                red_team_metadata: team_metadata("600", 6),
            },
            frames: Vec::new(),
        }
    }

    #[test]
    fn test_completed_games() {
        assert_eq!(completed_games(&event_details()), vec![0]);
    }

    #[test]
    fn test_build_game() {
        let game = build_game(&event_details(), 0, &EngineConfig::default()).unwrap();
        assert_eq!(game.match_id(), MatchId::new(1));
        assert_eq!(game.game_id(), GameId::new(2));
        assert_eq!(game.team(Side::Red).unwrap().code, "RED");
        assert_eq!(game.bucket_interval_secs, 30);

        // The zero-offset recording is skipped
        assert_eq!(game.vods.len(), 1);
        assert_eq!(game.vods[0].start_time_ms, 123_000);
        assert_eq!(game.vods[0].platform, "youtube");
    }

    #[test]
    fn test_build_game_index_out_of_range() {
        let err = build_game(&event_details(), 5, &EngineConfig::default()).unwrap_err();
        assert_eq!(err, RosterError::GameIndexOutOfRange { index: 5, games: 2 });
    }

    #[test]
    fn test_build_game_missing_side() {
        let mut details = event_details();
        details.match_details.games[0].teams.pop();
        let err = build_game(&details, 0, &EngineConfig::default()).unwrap_err();
        assert_eq!(
            err,
            RosterError::MissingSide {
                team_id: "600".to_string()
            }
        );
    }

    #[test]
    fn test_attach_participants() {
        let mut game = build_game(&event_details(), 0, &EngineConfig::default()).unwrap();
        attach_participants(&mut game, &window()).unwrap();

        assert_eq!(game.metadata.patch, "11.17.394.4489");
        let red = game.team(Side::Red).unwrap();
        assert_eq!(red.participants.len(), 5);
        assert_eq!(red.participants[0].id, ParticipantId::new(6));
        assert_eq!(red.participants[4].role, Role::Support);
        assert_eq!(red.participants[0].player_id, PlayerId::new(1006));
    }

    #[test]
    fn test_attach_unknown_team() {
        let mut game = build_game(&event_details(), 0, &EngineConfig::default()).unwrap();
        let mut window = window();
        window.game_metadata.red_team_metadata.esports_team_id = "999".to_string();

        let err = attach_participants(&mut game, &window).unwrap_err();
        assert_eq!(
            err,
            RosterError::UnknownTeam {
                team_id: "999".to_string()
            }
        );
    }

    #[test]
    fn test_attach_unknown_role() {
        let mut game = build_game(&event_details(), 0, &EngineConfig::default()).unwrap();
        let mut window = window();
        window.game_metadata.blue_team_metadata.participant_metadata[2].role = "roamer".to_string();

        assert_eq!(
            attach_participants(&mut game, &window).unwrap_err(),
            RosterError::UnknownRole("roamer".to_string())
        );
    }

    #[test]
    fn test_game_from_window() {
        let game = game_from_window(&window(), &EngineConfig::default()).unwrap();
        assert_eq!(game.game_id(), GameId::new(2));
        assert_eq!(game.team(Side::Blue).unwrap().id, TeamId::new(100));
        assert_eq!(game.team(Side::Blue).unwrap().participants.len(), 5);
        assert!(game.vods.is_empty());
    }

    #[test]
    fn test_game_from_window_invalid_id() {
        let mut window = window();
        window.esports_game_id = "abc".to_string();
        assert_eq!(
            game_from_window(&window, &EngineConfig::default()).unwrap_err(),
            RosterError::InvalidId {
                field: "game id",
                value: "abc".to_string()
            }
        );
    }
}
