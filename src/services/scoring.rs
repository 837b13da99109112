//! Scoring, ranking, and fuzzy answer-similarity helpers.

use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};
use uuid::Uuid;

use crate::state::game::Player;

/// Similarity threshold above which two answers count as the same.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Combine a base score with a (possibly negative) bonus, clamped so a
/// score can never go below zero.
pub fn calculate_score(base: i64, bonus: i64) -> u32 {
    (base + bonus).clamp(0, i64::from(u32::MAX)) as u32
}

/// 1-based rank of a player by total score, descending. The sort is
/// stable, so ties keep their roster order. `None` when the player is not
/// part of `players`.
pub fn player_rank(player_id: Uuid, players: &[Player]) -> Option<usize> {
    let mut sorted: Vec<&Player> = players.iter().collect();
    sorted.sort_by(|a, b| b.total_score.cmp(&a.total_score));
    sorted
        .iter()
        .position(|p| p.id == player_id)
        .map(|index| index + 1)
}

/// True iff the player ranks first and actually scored: a 0-score game
/// has no winner.
pub fn is_winner(player: &Player, players: &[Player]) -> bool {
    player_rank(player.id, players) == Some(1) && player.total_score > 0
}

/// Normalize an answer for fuzzy comparison: trim, lowercase, collapse
/// internal whitespace, and strip diacritics (NFD decomposition, drop
/// combining marks).
pub fn normalize_answer(answer: &str) -> String {
    let lowered = answer.trim().to_lowercase();
    let collapsed = lowered.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Whether two answers are the same up to typos, using the default
/// threshold.
pub fn are_similar_answers(answer1: &str, answer2: &str) -> bool {
    are_similar_answers_with_threshold(answer1, answer2, DEFAULT_SIMILARITY_THRESHOLD)
}

/// Whether the normalized answers are within the given similarity
/// threshold, where similarity is `1 - distance / max_len`.
pub fn are_similar_answers_with_threshold(answer1: &str, answer2: &str, threshold: f64) -> bool {
    let norm1 = normalize_answer(answer1);
    let norm2 = normalize_answer(answer2);

    if norm1 == norm2 {
        return true;
    }

    let distance = levenshtein_distance(&norm1, &norm2);
    let max_length = norm1.chars().count().max(norm2.chars().count());
    let similarity = 1.0 - distance as f64 / max_length as f64;

    similarity >= threshold
}

/// Levenshtein edit distance over Unicode scalar values, full DP matrix.
fn levenshtein_distance(str1: &str, str2: &str) -> usize {
    let a: Vec<char> = str1.chars().collect();
    let b: Vec<char> = str2.chars().collect();

    let mut matrix = vec![vec![0usize; a.len() + 1]; b.len() + 1];

    for (i, row) in matrix.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=a.len() {
        matrix[0][j] = j;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            if b[i - 1] == a[j - 1] {
                matrix[i][j] = matrix[i - 1][j - 1];
            } else {
                matrix[i][j] = matrix[i - 1][j - 1]
                    .min(matrix[i][j - 1])
                    .min(matrix[i - 1][j])
                    + 1;
            }
        }
    }

    matrix[b.len()][a.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str, total_score: u32) -> Player {
        let mut player = Player::new(name.into(), None);
        player.total_score = total_score;
        player
    }

    #[test]
    fn score_never_goes_negative() {
        assert_eq!(calculate_score(10, -20), 0);
        assert_eq!(calculate_score(10, 0), 10);
        assert_eq!(calculate_score(10, 5), 15);
    }

    #[test]
    fn rank_orders_by_total_score_descending() {
        let players = vec![player("Ada", 10), player("Bert", 30), player("Cleo", 20)];
        assert_eq!(player_rank(players[1].id, &players), Some(1));
        assert_eq!(player_rank(players[2].id, &players), Some(2));
        assert_eq!(player_rank(players[0].id, &players), Some(3));
    }

    #[test]
    fn ties_keep_original_relative_order() {
        let players = vec![player("Ada", 20), player("Bert", 20), player("Cleo", 10)];
        assert_eq!(player_rank(players[0].id, &players), Some(1));
        assert_eq!(player_rank(players[1].id, &players), Some(2));
    }

    #[test]
    fn rank_of_unknown_player_is_none() {
        let players = vec![player("Ada", 10)];
        assert_eq!(player_rank(Uuid::new_v4(), &players), None);
    }

    #[test]
    fn zero_score_game_has_no_winner() {
        let players = vec![player("Ada", 0), player("Bert", 0)];
        assert!(!is_winner(&players[0], &players));
        assert!(!is_winner(&players[1], &players));
    }

    #[test]
    fn highest_scorer_with_points_wins() {
        let players = vec![player("Ada", 10), player("Bert", 30)];
        assert!(is_winner(&players[1], &players));
        assert!(!is_winner(&players[0], &players));
    }

    #[test]
    fn normalization_strips_diacritics_and_collapses_whitespace() {
        assert_eq!(normalize_answer("  Café  au   Lait "), "cafe au lait");
        assert_eq!(normalize_answer("Müller"), "muller");
    }

    #[test]
    fn diacritic_variants_are_similar() {
        assert!(are_similar_answers("café", "cafe"));
    }

    #[test]
    fn single_typo_in_a_long_word_is_similar() {
        assert!(are_similar_answers("Krokodil", "Krokodol"));
    }

    #[test]
    fn unrelated_words_are_not_similar() {
        assert!(!are_similar_answers("Katze", "Hund"));
    }

    #[test]
    fn threshold_is_configurable() {
        // "abcd" vs "abcf": distance 1, similarity 0.75.
        assert!(!are_similar_answers_with_threshold("abcd", "abcf", 0.8));
        assert!(are_similar_answers_with_threshold("abcd", "abcf", 0.7));
    }

    #[test]
    fn levenshtein_matches_known_distances() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
    }
}
