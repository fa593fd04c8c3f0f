use super::{Leaderboard, ScoreEntry};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

/// Pending submissions beyond this are dropped
const QUEUE_CAPACITY: usize = 16;

/// Non-blocking front for a [`Leaderboard`] running on a worker thread
///
/// Dropping every handle closes the queue; the worker drains what is left
/// and exits.
#[derive(Debug, Clone)]
pub struct LeaderboardHandle {
    tx: mpsc::Sender<ScoreEntry>,
}

impl LeaderboardHandle {
    /// Start the worker. Must be called from inside a tokio runtime.
    pub fn spawn<L: Leaderboard>(board: L) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        let worker = tokio::task::spawn_blocking(move || run_worker(board, rx));
        (Self { tx }, worker)
    }

    /// Queue a score; never waits. Returns false if it could not be queued.
    pub fn submit(&self, entry: ScoreEntry) -> bool {
        match self.tx.try_send(entry) {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "leaderboard submission dropped");
                false
            }
        }
    }
}

fn run_worker<L: Leaderboard>(mut board: L, mut rx: mpsc::Receiver<ScoreEntry>) {
    let authenticated = match board.authenticate() {
        Ok(()) => {
            info!("leaderboard authenticated");
            true
        }
        Err(err) => {
            warn!(error = %err, "leaderboard authentication failed; scores will not be submitted");
            false
        }
    };

    while let Some(entry) = rx.blocking_recv() {
        if !authenticated {
            debug!(score = entry.score, "skipping submission while signed out");
            continue;
        }
        match board.submit(&entry) {
            Ok(()) => debug!(score = entry.score, player = %entry.player, "score submitted"),
            Err(err) => warn!(error = %err, score = entry.score, "failed to submit score"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, bail};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recording {
        fail_auth: bool,
        submitted: Arc<Mutex<Vec<u32>>>,
    }

    impl Leaderboard for Recording {
        fn authenticate(&mut self) -> Result<()> {
            if self.fail_auth {
                bail!("no account");
            }
            Ok(())
        }

        fn submit(&mut self, entry: &ScoreEntry) -> Result<()> {
            if entry.score == 13 {
                bail!("unlucky");
            }
            self.submitted.lock().unwrap().push(entry.score);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_submissions_reach_board() {
        let board = Recording::default();
        let submitted = board.submitted.clone();
        let (handle, worker) = LeaderboardHandle::spawn(board);

        assert!(handle.submit(ScoreEntry::new("p", 3)));
        assert!(handle.submit(ScoreEntry::new("p", 13)));
        assert!(handle.submit(ScoreEntry::new("p", 5)));
        drop(handle);
        worker.await.unwrap();

        assert_eq!(*submitted.lock().unwrap(), vec![3, 5]);
    }

    #[tokio::test]
    async fn test_failed_auth_skips_everything() {
        let board = Recording {
            fail_auth: true,
            ..Default::default()
        };
        let submitted = board.submitted.clone();
        let (handle, worker) = LeaderboardHandle::spawn(board);

        assert!(handle.submit(ScoreEntry::new("p", 3)));
        drop(handle);
        worker.await.unwrap();

        assert!(submitted.lock().unwrap().is_empty());
    }
}
