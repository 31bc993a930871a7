//! Weighted scoring and leaderboard ranking

use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{Bracket, GameResult, User};
use crate::team::Team;
use crate::topology::{
    global_index, locate, path_game, round_weight, NUM_ROUNDS, ROUND_WEIGHTS, TOTAL_GAMES,
};

/// Weighted score of one bracket
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Points earned in rounds 1..=6
    pub per_round: [u32; NUM_ROUNDS],
    pub total: u32,
}

/// One leaderboard line
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    pub user_id: String,
    /// Display name, empty when the user is not registered
    pub name: String,
    pub bracket_id: String,
    pub per_round: [u32; NUM_ROUNDS],
    pub total: u32,
    /// Best total still reachable
    pub max_possible: u32,
    pub submitted_at: DateTime<Utc>,
}

/// Correctness of a single pick
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PickStatus {
    Correct,
    Incorrect,
    /// No official result yet
    Pending,
    /// Result recorded but no pick was made
    Missing,
}

/// A pick set against the official result for the same game
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameReview {
    pub round: u8,
    pub index_in_round: usize,
    pub global_index: usize,
    pub pick: Option<Team>,
    pub official: Option<Team>,
    pub status: PickStatus,
}

/// Score picks against the recorded results
///
/// Each game whose recorded winner matches the pick at its global index
/// earns the weight of the game's round. A game counts once however many
/// records it has (the last one wins). Unresolved games and wrong picks earn
/// nothing.
pub fn score(picks: &[Option<Team>], results: &[GameResult]) -> Score {
    let mut score = Score::default();
    for (&game, &winner) in &winners_by_game(results) {
        let Some((round, _)) = locate(game) else {
            continue;
        };
        let Some(weight) = round_weight(round) else {
            continue;
        };
        if picks.get(game).copied().flatten() == Some(winner) {
            score.per_round[round as usize - 1] += weight;
            score.total += weight;
        }
    }
    score
}

/// Best total a bracket can still reach
///
/// Adds to the current score every unresolved game whose picked team has
/// not been knocked out by a recorded result on its path.
pub fn max_possible_score(picks: &[Option<Team>], results: &[GameResult]) -> u32 {
    let winners = winners_by_game(results);
    let current = score(picks, results).total;

    let alive = |team: Team, round: u8| {
        (1..round).all(|earlier| {
            let game = global_index(earlier, path_game(team, earlier));
            winners.get(&game).map_or(true, |&w| w == team)
        })
    };

    let potential: u32 = picks
        .iter()
        .take(TOTAL_GAMES)
        .enumerate()
        .filter(|(game, _)| !winners.contains_key(game))
        .filter_map(|(game, pick)| {
            let team = (*pick)?;
            let (round, index) = locate(game)?;
            (path_game(team, round) == index && alive(team, round))
                .then(|| ROUND_WEIGHTS[round as usize - 1])
        })
        .sum();

    current + potential
}

/// Pick-by-pick comparison with the official results
pub fn review(picks: &[Option<Team>], results: &[GameResult]) -> Vec<GameReview> {
    let winners = winners_by_game(results);
    (0..TOTAL_GAMES)
        .filter_map(|game| {
            let (round, index_in_round) = locate(game)?;
            let pick = picks.get(game).copied().flatten();
            let official = winners.get(&game).copied();
            let status = match (pick, official) {
                (_, None) => PickStatus::Pending,
                (None, Some(_)) => PickStatus::Missing,
                (Some(p), Some(w)) if p == w => PickStatus::Correct,
                (Some(_), Some(_)) => PickStatus::Incorrect,
            };
            Some(GameReview {
                round,
                index_in_round,
                global_index: game,
                pick,
                official,
                status,
            })
        })
        .collect()
}

/// Score every bracket and order them for display
///
/// Sorted by total descending; ties go to the case-insensitive display
/// name ascending, then user id, so the order never depends on input order.
pub fn rank_brackets(
    brackets: &[Bracket],
    results: &[GameResult],
    users: &[User],
) -> Vec<LeaderboardRow> {
    let names: FxHashMap<&str, &str> = users
        .iter()
        .map(|u| (u.id.as_str(), u.name.as_str()))
        .collect();

    let mut rows: Vec<LeaderboardRow> = brackets
        .iter()
        .map(|bracket| {
            let Score { per_round, total } = score(&bracket.picks, results);
            LeaderboardRow {
                user_id: bracket.user_id.clone(),
                name: names
                    .get(bracket.user_id.as_str())
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                bracket_id: bracket.id.clone(),
                per_round,
                total,
                max_possible: max_possible_score(&bracket.picks, results),
                submitted_at: bracket.submitted_at,
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    rows
}

fn winners_by_game(results: &[GameResult]) -> FxHashMap<usize, Team> {
    results.iter().map(|r| (r.global_index, r.winner)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::SelectionSet;
    use crate::topology::game_count;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn random_picks(seed: u64) -> Vec<Option<Team>> {
        let mut selection = SelectionSet::new();
        selection.random_fill(&mut ChaCha8Rng::seed_from_u64(seed));
        selection.to_flat_picks()
    }

    /// Official results that agree with `picks` for the given rounds
    fn results_from(
        picks: &[Option<Team>],
        rounds: std::ops::RangeInclusive<u8>,
    ) -> Vec<GameResult> {
        let mut results = Vec::new();
        for round in rounds {
            for index in 0..game_count(round) {
                let winner = picks[global_index(round, index)].unwrap();
                results.push(GameResult::new(round, index, winner).unwrap());
            }
        }
        results
    }

    fn bracket(id: &str, user_id: &str, picks: Vec<Option<Team>>) -> Bracket {
        Bracket {
            id: id.to_string(),
            user_id: user_id.to_string(),
            picks,
            submitted_at: Utc::now(),
        }
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_perfect_bracket_scores_192() {
        let picks = random_picks(1);
        let results = results_from(&picks, 1..=6);
        let score = score(&picks, &results);
        assert_eq!(score.total, 192);
        assert_eq!(score.per_round, [32; 6]);
    }

    #[test]
    fn test_round_one_only() {
        let picks = random_picks(2);
        let official = random_picks(3);
        let mut results = results_from(&picks, 1..=1);
        // Later rounds decided differently from the picks
        for round in 2..=6 {
            for index in 0..game_count(round) {
                let g = global_index(round, index);
                if official[g] != picks[g] {
                    results.push(GameResult::new(round, index, official[g].unwrap()).unwrap());
                }
            }
        }
        let score = score(&picks, &results);
        assert_eq!(score.per_round, [32, 0, 0, 0, 0, 0]);
        assert_eq!(score.total, 32);
    }

    #[test]
    fn test_duplicate_results_count_once() {
        let mut picks = vec![None; TOTAL_GAMES];
        picks[0] = Some("E1".parse().unwrap());
        let result = GameResult::new(1, 0, "E1".parse().unwrap()).unwrap();
        let results = vec![result.clone(), result];

        let score = score(&picks, &results);
        assert_eq!(score.per_round, [1, 0, 0, 0, 0, 0]);
        assert_eq!(score.total, 1);
    }

    #[test]
    fn test_last_duplicate_result_wins() {
        let mut picks = vec![None; TOTAL_GAMES];
        picks[0] = Some("E1".parse().unwrap());
        let results = vec![
            GameResult::new(1, 0, "E1".parse().unwrap()).unwrap(),
            GameResult::new(1, 0, "E16".parse().unwrap()).unwrap(),
        ];

        assert_eq!(score(&picks, &results).total, 0);
        assert_eq!(review(&picks, &results)[0].status, PickStatus::Incorrect);
    }

    #[test]
    fn test_weight_follows_global_index() {
        let mut picks = vec![None; TOTAL_GAMES];
        picks[62] = Some("E1".parse().unwrap());
        // Record claims round 1 but sits at the final's index
        let mut result = GameResult::new(6, 0, "E1".parse().unwrap()).unwrap();
        result.round = 1;
        let stray = GameResult {
            round: 9,
            index_in_round: 0,
            global_index: 200,
            winner: "E1".parse().unwrap(),
        };

        let score = score(&picks, &[result, stray]);
        assert_eq!(score.per_round, [0, 0, 0, 0, 0, 32]);
        assert_eq!(score.total, 32);
    }

    #[test]
    fn test_unresolved_and_empty_contribute_nothing() {
        let picks = random_picks(4);
        assert_eq!(score(&picks, &[]), Score::default());
        assert_eq!(score(&vec![None; 63], &results_from(&picks, 1..=6)).total, 0);
    }

    #[test]
    fn test_short_picks_do_not_panic() {
        let picks = random_picks(5);
        let results = results_from(&picks, 1..=6);
        assert_eq!(score(&picks[..10], &results).total, 10);
    }

    #[test]
    fn test_rank_orders_by_total() {
        let picks = random_picks(6);
        let results = results_from(&picks, 1..=1);
        let brackets = vec![
            bracket("1", "1", vec![None; 63]),
            bracket("2", "2", picks.clone()),
        ];
        let users = vec![user("1", "alice"), user("2", "bob")];
        let rows = rank_brackets(&brackets, &results, &users);
        assert_eq!(rows[0].user_id, "2");
        assert_eq!(rows[0].total, 32);
        assert_eq!(rows[0].name, "bob");
        assert_eq!(rows[1].total, 0);
    }

    #[test]
    fn test_rank_ties_by_name_case_insensitive() {
        let picks = random_picks(7);
        // Ten round-1 wins each
        let results: Vec<GameResult> = results_from(&picks, 1..=1).into_iter().take(10).collect();
        let brackets = vec![
            bracket("1", "1", picks.clone()),
            bracket("2", "2", picks.clone()),
            bracket("3", "3", picks.clone()),
        ];
        let users = vec![user("1", "zed"), user("2", "Bob"), user("3", "alice")];
        let rows = rank_brackets(&brackets, &results, &users);
        assert!(rows.iter().all(|r| r.total == 10));
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["alice", "Bob", "zed"]);

        // Input order does not matter
        let reversed: Vec<Bracket> = brackets.into_iter().rev().collect();
        assert_eq!(rank_brackets(&reversed, &results, &users), rows);
    }

    #[test]
    fn test_max_possible() {
        let picks = random_picks(8);
        assert_eq!(max_possible_score(&picks, &[]), 192);

        let results = results_from(&picks, 1..=6);
        assert_eq!(max_possible_score(&picks, &results), 192);

        // Champion knocked out in round 1: every pick of that team is dead
        let champion = picks[62].unwrap();
        let first_game = champion.round_one_index();
        let pair = crate::team::seeding_pair(first_game).unwrap();
        let upset = if pair[0] == champion { pair[1] } else { pair[0] };
        let results = vec![GameResult::new(1, first_game, upset).unwrap()];
        // Champion appears in rounds 1..=6: 1 + 2 + 4 + 8 + 16 + 32 lost
        assert_eq!(max_possible_score(&picks, &results), 192 - 63);
    }

    #[test]
    fn test_review_statuses() {
        let picks = random_picks(9);
        let wrong = crate::team::seeding_pair(0)
            .unwrap()
            .into_iter()
            .find(|t| Some(*t) != picks[0])
            .unwrap();
        let results = vec![
            GameResult::new(1, 0, wrong).unwrap(),
            GameResult::new(1, 1, picks[1].unwrap()).unwrap(),
        ];
        let review = review(&picks, &results);
        assert_eq!(review.len(), 63);
        assert_eq!(review[0].status, PickStatus::Incorrect);
        assert_eq!(review[1].status, PickStatus::Correct);
        assert_eq!(review[2].status, PickStatus::Pending);

        let empty = super::review(&vec![None; 63], &results);
        assert_eq!(empty[0].status, PickStatus::Missing);
    }
}
