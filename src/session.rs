//! A playing session: one engine plus everything that reacts to it
//!
//! The session owns the engine and the collaborators that must see its
//! events: the high score store, the feedback sink, the leaderboard and the
//! HUD metrics. Front ends talk to the session only.

use crate::feedback::Feedback;
use crate::game::{Direction, Snapshot, SnakeEngine, TickEvent};
use crate::leaderboard::{LeaderboardHandle, ScoreEntry};
use crate::metrics::GameMetrics;
use crate::storage::HighScoreStore;
use tracing::{info, warn};

pub struct Session {
    engine: SnakeEngine,
    store: Box<dyn HighScoreStore>,
    feedback: Box<dyn Feedback>,
    leaderboard: Option<LeaderboardHandle>,
    player: String,
    high_score: u32,
    metrics: GameMetrics,
    round_finished: bool,
}

impl Session {
    pub fn new(
        engine: SnakeEngine,
        store: Box<dyn HighScoreStore>,
        feedback: Box<dyn Feedback>,
        leaderboard: Option<LeaderboardHandle>,
    ) -> Self {
        let high_score = store.load().unwrap_or_else(|err| {
            warn!(error = %err, "could not load high score, starting from 0");
            0
        });

        Self {
            engine,
            store,
            feedback,
            leaderboard,
            player: "player".to_string(),
            high_score,
            metrics: GameMetrics::new(),
            round_finished: false,
        }
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = player.into();
        self
    }

    /// Forward a direction request; accepted turns trigger a feedback tap
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        let accepted = self.engine.set_direction(direction);
        if accepted {
            self.feedback.direction_changed();
        }
        accepted
    }

    pub fn tick(&mut self) -> TickEvent {
        let event = self.engine.tick();
        match event {
            TickEvent::Moved => {}
            TickEvent::AteFood => {
                self.feedback.food_eaten();
                self.metrics.on_food_eaten();
            }
            TickEvent::GameOver if !self.round_finished => self.finish_round(),
            TickEvent::GameOver => {}
        }
        event
    }

    pub fn restart(&mut self) {
        self.engine.reset();
        self.metrics.on_game_start();
        self.round_finished = false;
    }

    fn finish_round(&mut self) {
        self.round_finished = true;
        let score = self.engine.score();
        self.metrics.on_game_over(self.engine.snake().len());
        info!(score, high_score = self.high_score, "game over");

        if score > self.high_score {
            self.high_score = score;
            if let Err(err) = self.store.save(score) {
                warn!(error = %err, score, "could not persist high score");
            }
        }

        if let Some(leaderboard) = &self.leaderboard {
            leaderboard.submit(ScoreEntry::new(self.player.clone(), score));
        }
    }

    /// Text offered to the share sheet after a round
    pub fn share_message(&self) -> String {
        share_message(self.engine.score())
    }

    pub fn snapshot(&self) -> Snapshot {
        self.engine.snapshot()
    }

    pub fn engine(&self) -> &SnakeEngine {
        &self.engine
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn metrics(&self) -> &GameMetrics {
        &self.metrics
    }

    pub fn metrics_mut(&mut self) -> &mut GameMetrics {
        &mut self.metrics
    }
}

pub fn share_message(score: u32) -> String {
    format!("I scored {} points in Classic Snake! #ClassicSnakeGame", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{GameConfig, Position};
    use crate::storage::{JsonScoreStore, MemoryScoreStore};
    use anyhow::{Result, bail};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct Cues(Arc<Mutex<Vec<&'static str>>>);

    impl Feedback for Cues {
        fn food_eaten(&mut self) {
            self.0.lock().unwrap().push("food");
        }

        fn direction_changed(&mut self) {
            self.0.lock().unwrap().push("turn");
        }
    }

    struct BrokenStore;

    impl HighScoreStore for BrokenStore {
        fn load(&self) -> Result<u32> {
            bail!("disk on fire")
        }

        fn save(&mut self, _score: u32) -> Result<()> {
            bail!("disk on fire")
        }
    }

    fn engine() -> SnakeEngine {
        SnakeEngine::with_seed(&GameConfig::small(), 7)
    }

    fn session(store: Box<dyn HighScoreStore>, cues: &Cues) -> Session {
        Session::new(engine(), store, Box::new(cues.clone()), None)
    }

    /// Eat `n` foods heading right, then fold into the body
    fn play_round(session: &mut Session, n: i32) {
        for x in 0..n {
            assert!(session.engine.place_food(Position::new(6 + x, 5)));
            assert_eq!(session.tick(), TickEvent::AteFood);
        }
        session.engine.place_food(Position::new(0, 0));
        for dir in [Direction::Down, Direction::Left, Direction::Up] {
            session.set_direction(dir);
            session.tick();
        }
        assert!(!session.engine().is_running());
    }

    #[test]
    fn test_loads_high_score() {
        let cues = Cues::default();
        let session = session(Box::new(MemoryScoreStore::new(12)), &cues);
        assert_eq!(session.high_score(), 12);
    }

    #[test]
    fn test_load_failure_falls_back_to_zero() {
        let cues = Cues::default();
        let session = session(Box::new(BrokenStore), &cues);
        assert_eq!(session.high_score(), 0);
    }

    #[test]
    fn test_feedback_cues() {
        let cues = Cues::default();
        let mut session = session(Box::new(MemoryScoreStore::default()), &cues);

        assert!(!session.set_direction(Direction::Left));
        assert!(session.set_direction(Direction::Up));
        session.engine.place_food(Position::new(5, 4));
        assert_eq!(session.tick(), TickEvent::AteFood);

        assert_eq!(*cues.0.lock().unwrap(), vec!["turn", "food"]);
        assert_eq!(session.metrics().food_eaten, 1);
    }

    #[test]
    fn test_game_over_updates_and_persists_high_score() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores.json");
        let cues = Cues::default();
        let mut session = session(Box::new(JsonScoreStore::new(&path)), &cues);

        play_round(&mut session, 4);

        assert_eq!(session.high_score(), 4);
        assert_eq!(JsonScoreStore::new(&path).load().unwrap(), 4);
        assert_eq!(session.metrics().games_played, 1);
        assert_eq!(session.metrics().longest_snake, 5);
    }

    #[test]
    fn test_lower_score_keeps_high_score() {
        let cues = Cues::default();
        let mut session = session(Box::new(MemoryScoreStore::new(50)), &cues);
        play_round(&mut session, 4);
        assert_eq!(session.high_score(), 50);
    }

    #[test]
    fn test_save_failure_keeps_in_memory_high_score() {
        let cues = Cues::default();
        let mut session = session(Box::new(BrokenStore), &cues);
        play_round(&mut session, 4);
        assert_eq!(session.high_score(), 4);
    }

    #[test]
    fn test_game_over_recorded_once() {
        let cues = Cues::default();
        let mut session = session(Box::new(MemoryScoreStore::default()), &cues);
        play_round(&mut session, 4);
        assert_eq!(session.tick(), TickEvent::GameOver);
        assert_eq!(session.tick(), TickEvent::GameOver);
        assert_eq!(session.metrics().games_played, 1);

        session.restart();
        assert!(session.engine().is_running());
        assert_eq!(session.snapshot().score, 0);
        assert_eq!(session.high_score(), 4);
    }

    #[test]
    fn test_share_message() {
        assert_eq!(
            share_message(7),
            "I scored 7 points in Classic Snake! #ClassicSnakeGame"
        );
    }

    #[tokio::test]
    async fn test_game_over_submits_to_leaderboard() {
        use crate::leaderboard::{Leaderboard, LocalLeaderboard};

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("leaderboard.json");
        let (handle, worker) = LeaderboardHandle::spawn(LocalLeaderboard::new(&path, "ada"));

        let cues = Cues::default();
        let mut session = Session::new(
            engine(),
            Box::new(MemoryScoreStore::default()),
            Box::new(cues),
            Some(handle),
        )
        .with_player("ada");
        play_round(&mut session, 4);
        drop(session);
        worker.await.unwrap();

        let mut board = LocalLeaderboard::new(&path, "ada");
        board.authenticate().unwrap();
        let entries = board.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 4);
        assert_eq!(entries[0].player, "ada");
    }
}
