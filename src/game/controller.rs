use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info};

use super::board::{Board, Resolution, Reveal};
use super::error::GameError;
use super::events::Notification;
use super::scheduler::{ScheduledTask, Scheduler, TaskId};

/// How long a mismatched pair stays face up.
pub const DEFAULT_MISMATCH_DELAY: Duration = Duration::from_millis(1000);

static NEXT_GAME_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    OneSelected { first: usize },
    /// Two cards up and a hide pending; every click is ignored here.
    Resolving {
        first: usize,
        second: usize,
        task: TaskId,
    },
}

/// Drives one board from the first click to the win.
#[derive(Debug)]
pub struct MatchController {
    board: Board,
    phase: Phase,
    game_id: u64,
    mismatch_delay: Duration,
    attempts: u32,
    mismatches: u32,
    won: bool,
}

impl MatchController {
    pub fn new(board: Board, mismatch_delay: Duration) -> Self {
        MatchController {
            board,
            phase: Phase::Idle,
            game_id: NEXT_GAME_ID.fetch_add(1, Ordering::Relaxed),
            mismatch_delay,
            attempts: 0,
            mismatches: 0,
            won: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_id(&self) -> u64 {
        self.game_id
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn mismatches(&self) -> u32 {
        self.mismatches
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn render(&self) -> Notification {
        Notification::BoardRendered(self.board.cells())
    }

    pub fn click(
        &mut self,
        position: usize,
        scheduler: &mut dyn Scheduler,
    ) -> Result<Vec<Notification>, GameError> {
        if position >= self.board.len() {
            return Err(GameError::InvalidPosition {
                position,
                len: self.board.len(),
            });
        }
        let second_pick = match self.phase {
            Phase::Resolving { .. } => {
                debug!(position, "click ignored while a mismatch is pending");
                return Ok(Vec::new());
            }
            Phase::Idle => false,
            Phase::OneSelected { .. } => true,
        };
        if self.board.reveal(position)? == Reveal::Rejected {
            debug!(position, "click on a face-up card ignored");
            return Ok(Vec::new());
        }

        if !second_pick {
            self.phase = Phase::OneSelected { first: position };
            return Ok(vec![self.render()]);
        }
        self.attempts = self.attempts.saturating_add(1);
        match self.board.resolve_selection_match() {
            Some(Resolution::Matched(first, second)) => Ok(self.settle_match(first, second)),
            Some(Resolution::Mismatched(first, second)) => {
                Ok(self.settle_mismatch(first, second, scheduler))
            }
            None => unreachable!("a second reveal always leaves two cards selected"),
        }
    }

    fn settle_match(&mut self, first: usize, second: usize) -> Vec<Notification> {
        debug!(first, second, "pair matched");
        self.phase = Phase::Idle;
        let mut out = vec![self.render()];
        if self.board.is_complete() && !self.won {
            self.won = true;
            info!(
                game_id = self.game_id,
                attempts = self.attempts,
                mismatches = self.mismatches,
                "board cleared"
            );
            out.push(Notification::GameWon);
        }
        out
    }

    fn settle_mismatch(
        &mut self,
        first: usize,
        second: usize,
        scheduler: &mut dyn Scheduler,
    ) -> Vec<Notification> {
        debug!(first, second, "pair mismatched");
        self.mismatches = self.mismatches.saturating_add(1);
        let task = scheduler.schedule(
            self.mismatch_delay,
            ScheduledTask::HideMismatch {
                game_id: self.game_id,
            },
        );
        self.phase = Phase::Resolving {
            first,
            second,
            task,
        };
        vec![self.render()]
    }

    /// Applies a fired task. Tasks left over from another game are dropped.
    pub fn run_task(&mut self, task: ScheduledTask) -> Vec<Notification> {
        match task {
            ScheduledTask::HideMismatch { game_id } if game_id == self.game_id => {
                if !matches!(self.phase, Phase::Resolving { .. }) {
                    return Vec::new();
                }
                self.board.hide_selection();
                self.phase = Phase::Idle;
                vec![self.render()]
            }
            ScheduledTask::HideMismatch { game_id } => {
                debug!(game_id, current = self.game_id, "stale hide task dropped");
                Vec::new()
            }
        }
    }

    /// Cancels pending work before the controller is thrown away.
    pub fn abandon(&mut self, scheduler: &mut dyn Scheduler) {
        if let Phase::Resolving { task, .. } = self.phase {
            scheduler.cancel(task);
            self.board.hide_selection();
            self.phase = Phase::Idle;
        }
    }
}
