//! Aggregate statistics folded in whenever a game completes.

use std::time::SystemTime;

use crate::{dao::models::StatisticsEntity, state::game::GameSession};

/// Fold one completed session into the aggregate statistics.
///
/// Abandoned games are not folded; only `end_game` calls this.
pub fn fold_session(stats: &mut StatisticsEntity, session: &GameSession) {
    let attempts = session.attempts.len() as u32;
    let correct = session.attempts.iter().filter(|a| a.found).count() as u32;
    let top_score = session
        .players
        .values()
        .map(|p| p.total_score)
        .max()
        .unwrap_or(0);

    stats.total_games += 1;
    stats.total_attempts += attempts;
    stats.correct_attempts += correct;
    stats.total_score += top_score;
    stats.best_score = stats.best_score.max(top_score);
    stats.average_score = f64::from(stats.total_score) / f64::from(stats.total_games);
    stats.total_play_time_ms += play_time_ms(session);

    *stats
        .categories_played
        .entry(session.category.key.clone())
        .or_insert(0) += 1;

    if correct > 0 {
        stats.streak_current += 1;
        stats.streak_best = stats.streak_best.max(stats.streak_current);
    } else {
        stats.streak_current = 0;
    }

    stats.last_played = Some(session.ended_at.unwrap_or_else(SystemTime::now));
}

fn play_time_ms(session: &GameSession) -> u64 {
    let end = session.ended_at.unwrap_or_else(SystemTime::now);
    end.duration_since(session.started_at)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::{Category, Player, SearchProvider};
    use uuid::Uuid;

    fn completed_session(correct: bool) -> GameSession {
        let category = Category {
            id: 1,
            name: "Tier".into(),
            search_word: "Tiere".into(),
            key: "animals".into(),
            search_provider: SearchProvider::Offline,
            additional_data: None,
            letter: None,
        };
        let mut session = GameSession::new(
            category,
            'k',
            vec![Player::new("Ada".into(), None), Player::new("Bert".into(), None)],
            None,
        );
        let ids: Vec<Uuid> = session.players.keys().copied().collect();
        let score = if correct { 10 } else { 0 };
        session.submit_answer(ids[0], "Katze".into(), score).unwrap();
        session.record_attempt("Katze".into(), correct);
        session.advance_round(session.category.clone(), 'b').unwrap();
        session.complete().unwrap();
        session
    }

    #[test]
    fn folding_a_won_game_updates_counters_and_streak() {
        let mut stats = StatisticsEntity::default();
        fold_session(&mut stats, &completed_session(true));

        assert_eq!(stats.total_games, 1);
        assert_eq!(stats.total_attempts, 1);
        assert_eq!(stats.correct_attempts, 1);
        assert_eq!(stats.total_score, 10);
        assert_eq!(stats.best_score, 10);
        assert_eq!(stats.average_score, 10.0);
        assert_eq!(stats.categories_played.get("animals"), Some(&1));
        assert_eq!(stats.streak_current, 1);
        assert_eq!(stats.streak_best, 1);
        assert!(stats.last_played.is_some());
    }

    #[test]
    fn a_game_without_correct_answers_resets_the_streak() {
        let mut stats = StatisticsEntity::default();
        fold_session(&mut stats, &completed_session(true));
        fold_session(&mut stats, &completed_session(true));
        assert_eq!(stats.streak_current, 2);

        fold_session(&mut stats, &completed_session(false));
        assert_eq!(stats.streak_current, 0);
        assert_eq!(stats.streak_best, 2);
        assert_eq!(stats.total_games, 3);
    }

    #[test]
    fn average_tracks_total_over_games() {
        let mut stats = StatisticsEntity::default();
        fold_session(&mut stats, &completed_session(true));
        fold_session(&mut stats, &completed_session(false));

        assert_eq!(stats.total_score, 10);
        assert_eq!(stats.average_score, 5.0);
    }
}
