//! Screen flow. Each event consumes the current [`Screen`] and returns the
//! next one, so no game state lives outside these values.

use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, warn};

use super::board::Board;
use super::controller::{DEFAULT_MISMATCH_DELAY, MatchController};
use super::difficulty::Difficulty;
use super::error::GameError;
use super::events::{InputEvent, Notification};
use super::scheduler::{ScheduledTask, Scheduler};
use super::theme::{Theme, ThemeCatalog};

/// One game in progress, plus what is needed to replay it.
#[derive(Debug)]
pub struct GameSession {
    theme: Theme,
    difficulty: Difficulty,
    controller: MatchController,
}

impl GameSession {
    pub fn start<R: Rng>(
        theme: Theme,
        difficulty: Difficulty,
        rng: &mut R,
        mismatch_delay: Duration,
    ) -> Result<Self, GameError> {
        let board = Board::deal(&theme, difficulty, rng)?;
        let controller = MatchController::new(board, mismatch_delay);
        info!(
            theme = theme.name(),
            difficulty = difficulty.name(),
            game_id = controller.game_id(),
            "game started"
        );
        Ok(GameSession {
            theme,
            difficulty,
            controller,
        })
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn controller(&self) -> &MatchController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MatchController {
        &mut self.controller
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenKind {
    ThemeSelection,
    DifficultySelection,
    Playing,
    GameOver,
}

#[derive(Debug, Default)]
pub enum Screen {
    #[default]
    ThemeSelection,
    DifficultySelection {
        theme: Theme,
    },
    Playing(GameSession),
    GameOver {
        theme: Theme,
        difficulty: Difficulty,
    },
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::ThemeSelection => ScreenKind::ThemeSelection,
            Screen::DifficultySelection { .. } => ScreenKind::DifficultySelection,
            Screen::Playing(_) => ScreenKind::Playing,
            Screen::GameOver { .. } => ScreenKind::GameOver,
        }
    }

    pub fn theme(&self) -> Option<&Theme> {
        match self {
            Screen::ThemeSelection => None,
            Screen::DifficultySelection { theme } | Screen::GameOver { theme, .. } => Some(theme),
            Screen::Playing(session) => Some(session.theme()),
        }
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        match self {
            Screen::Playing(session) => Some(session.difficulty()),
            Screen::GameOver { difficulty, .. } => Some(*difficulty),
            _ => None,
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        match self {
            Screen::Playing(session) => Some(session),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub struct Transition {
    pub screen: Screen,
    pub notifications: Vec<Notification>,
}

impl Transition {
    fn to(screen: Screen) -> Self {
        Transition {
            screen,
            notifications: Vec::new(),
        }
    }

    fn rejected(screen: Screen, err: GameError) -> Self {
        warn!(screen = ?screen.kind(), error = %err, "event rejected");
        Transition {
            screen,
            notifications: vec![Notification::Error(err.to_string())],
        }
    }
}

/// Turns input events into screen transitions.
#[derive(Clone, Debug)]
pub struct Flow {
    catalog: ThemeCatalog,
    mismatch_delay: Duration,
}

impl Default for Flow {
    fn default() -> Self {
        Flow::new(ThemeCatalog::builtin(), DEFAULT_MISMATCH_DELAY)
    }
}

impl Flow {
    pub fn new(catalog: ThemeCatalog, mismatch_delay: Duration) -> Self {
        Flow {
            catalog,
            mismatch_delay,
        }
    }

    pub fn catalog(&self) -> &ThemeCatalog {
        &self.catalog
    }

    pub fn mismatch_delay(&self) -> Duration {
        self.mismatch_delay
    }

    pub fn handle<R: Rng>(
        &self,
        screen: Screen,
        event: InputEvent,
        rng: &mut R,
        scheduler: &mut dyn Scheduler,
    ) -> Transition {
        debug!(?event, screen = ?screen.kind(), "input event");
        match event {
            InputEvent::ThemeChosen(name) => match self.catalog.get(&name) {
                Ok(theme) => {
                    let theme = theme.clone();
                    leave(screen, scheduler);
                    Transition::to(Screen::DifficultySelection { theme })
                }
                Err(err) => Transition::rejected(screen, err),
            },
            InputEvent::DifficultyChosen { rows, columns } => {
                let Some(theme) = screen.theme().cloned() else {
                    return ignored(screen);
                };
                match Difficulty::from_dimensions(rows, columns) {
                    Ok(difficulty) => self.start(screen, theme, difficulty, rng, scheduler),
                    Err(err) => Transition::rejected(screen, err),
                }
            }
            InputEvent::CardClicked(position) => match screen {
                Screen::Playing(session) => click(session, position, scheduler),
                other => ignored(other),
            },
            InputEvent::RestartRequested => {
                let (Some(theme), Some(difficulty)) = (screen.theme().cloned(), screen.difficulty())
                else {
                    return ignored(screen);
                };
                self.start(screen, theme, difficulty, rng, scheduler)
            }
            InputEvent::ChangeDifficultyRequested => match screen.theme().cloned() {
                Some(theme) => {
                    leave(screen, scheduler);
                    Transition::to(Screen::DifficultySelection { theme })
                }
                None => ignored(screen),
            },
            InputEvent::ChangeThemeRequested => {
                leave(screen, scheduler);
                Transition::to(Screen::ThemeSelection)
            }
        }
    }

    /// Feeds a fired task to the running game, if there still is one.
    pub fn run_task(&self, screen: Screen, task: ScheduledTask) -> Transition {
        match screen {
            Screen::Playing(mut session) => {
                let notifications = session.controller_mut().run_task(task);
                Transition {
                    screen: Screen::Playing(session),
                    notifications,
                }
            }
            other => {
                debug!(?task, screen = ?other.kind(), "task fired with no game running");
                Transition::to(other)
            }
        }
    }

    fn start<R: Rng>(
        &self,
        screen: Screen,
        theme: Theme,
        difficulty: Difficulty,
        rng: &mut R,
        scheduler: &mut dyn Scheduler,
    ) -> Transition {
        match GameSession::start(theme, difficulty, rng, self.mismatch_delay) {
            Ok(session) => {
                leave(screen, scheduler);
                let render = session.controller().render();
                Transition {
                    screen: Screen::Playing(session),
                    notifications: vec![render],
                }
            }
            Err(err) => Transition::rejected(screen, err),
        }
    }
}

fn click(mut session: GameSession, position: usize, scheduler: &mut dyn Scheduler) -> Transition {
    match session.controller_mut().click(position, scheduler) {
        Ok(notifications) => {
            let screen = if notifications.contains(&Notification::GameWon) {
                Screen::GameOver {
                    theme: session.theme,
                    difficulty: session.difficulty,
                }
            } else {
                Screen::Playing(session)
            };
            Transition {
                screen,
                notifications,
            }
        }
        Err(err) => Transition::rejected(Screen::Playing(session), err),
    }
}

fn leave(screen: Screen, scheduler: &mut dyn Scheduler) {
    if let Screen::Playing(mut session) = screen {
        session.controller_mut().abandon(scheduler);
    }
}

fn ignored(screen: Screen) -> Transition {
    debug!(screen = ?screen.kind(), "event ignored on this screen");
    Transition::to(screen)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::game::scheduler::ManualScheduler;

    struct Harness {
        flow: Flow,
        screen: Screen,
        rng: ChaCha8Rng,
        scheduler: ManualScheduler,
    }

    impl Harness {
        fn new() -> Self {
            Harness {
                flow: Flow::default(),
                screen: Screen::default(),
                rng: ChaCha8Rng::seed_from_u64(5),
                scheduler: ManualScheduler::new(),
            }
        }

        fn send(&mut self, event: InputEvent) -> Vec<Notification> {
            let screen = std::mem::take(&mut self.screen);
            let transition = self.flow.handle(screen, event, &mut self.rng, &mut self.scheduler);
            self.screen = transition.screen;
            transition.notifications
        }
    }

    #[test]
    fn theme_then_difficulty_starts_a_game() {
        let mut h = Harness::new();
        assert!(h.send(InputEvent::ThemeChosen("Colors".into())).is_empty());
        assert_eq!(h.screen.kind(), ScreenKind::DifficultySelection);

        let out = h.send(InputEvent::DifficultyChosen { rows: 3, columns: 4 });
        assert_eq!(h.screen.kind(), ScreenKind::Playing);
        match out.as_slice() {
            [Notification::BoardRendered(cells)] => {
                assert_eq!(cells.len(), 12);
                assert!(cells.iter().all(|cell| cell.face.is_none()));
            }
            other => panic!("unexpected notifications: {other:?}"),
        }
    }

    #[test]
    fn unknown_theme_stays_put() {
        let mut h = Harness::new();
        let out = h.send(InputEvent::ThemeChosen("Planets".into()));
        assert!(matches!(out.as_slice(), [Notification::Error(_)]));
        assert_eq!(h.screen.kind(), ScreenKind::ThemeSelection);
    }

    #[test]
    fn unsupported_difficulty_stays_put() {
        let mut h = Harness::new();
        h.send(InputEvent::ThemeChosen("Food".into()));
        let out = h.send(InputEvent::DifficultyChosen { rows: 2, columns: 2 });
        assert!(matches!(out.as_slice(), [Notification::Error(_)]));
        assert_eq!(h.screen.kind(), ScreenKind::DifficultySelection);
    }

    #[test]
    fn too_small_theme_is_a_configuration_error() {
        let tiny = Theme::new("Tiny", ["A", "B", "C"]).unwrap();
        let mut h = Harness::new();
        h.flow = Flow::new(ThemeCatalog::from_themes(vec![tiny]), DEFAULT_MISMATCH_DELAY);
        h.send(InputEvent::ThemeChosen("Tiny".into()));
        let out = h.send(InputEvent::DifficultyChosen { rows: 3, columns: 4 });
        assert_eq!(
            out,
            vec![Notification::Error(
                GameError::Configuration {
                    theme: "Tiny".into(),
                    pairs: 6,
                    available: 3,
                }
                .to_string()
            )]
        );
        assert_eq!(h.screen.kind(), ScreenKind::DifficultySelection);
    }

    #[test]
    fn clicks_outside_a_game_are_ignored() {
        let mut h = Harness::new();
        assert!(h.send(InputEvent::CardClicked(0)).is_empty());
        assert!(h.send(InputEvent::RestartRequested).is_empty());
        assert!(h.send(InputEvent::ChangeDifficultyRequested).is_empty());
        assert!(h.send(InputEvent::DifficultyChosen { rows: 3, columns: 4 }).is_empty());
        assert_eq!(h.screen.kind(), ScreenKind::ThemeSelection);
    }

    #[test]
    fn invalid_position_reports_and_keeps_the_game() {
        let mut h = Harness::new();
        h.send(InputEvent::ThemeChosen("Animals".into()));
        h.send(InputEvent::DifficultyChosen { rows: 3, columns: 4 });
        let game_id = h.screen.session().unwrap().controller().game_id();

        let out = h.send(InputEvent::CardClicked(99));
        assert!(matches!(out.as_slice(), [Notification::Error(_)]));
        assert_eq!(h.screen.session().unwrap().controller().game_id(), game_id);
    }

    #[test]
    fn restart_deals_a_fresh_board_with_the_same_settings() {
        let mut h = Harness::new();
        h.send(InputEvent::ThemeChosen("Food".into()));
        h.send(InputEvent::DifficultyChosen { rows: 4, columns: 5 });
        let first_id = h.screen.session().unwrap().controller().game_id();

        h.send(InputEvent::RestartRequested);
        let session = h.screen.session().unwrap();
        assert_ne!(session.controller().game_id(), first_id);
        assert_eq!(session.theme().name(), "Food");
        assert_eq!(session.difficulty(), Difficulty::Medium);
    }

    #[test]
    fn leaving_mid_mismatch_cancels_the_hide() {
        let mut h = Harness::new();
        h.send(InputEvent::ThemeChosen("Colors".into()));
        h.send(InputEvent::DifficultyChosen { rows: 3, columns: 4 });

        let (first, second) = {
            let board = h.screen.session().unwrap().controller().board();
            let face = &board.card(0).unwrap().face;
            let other = (1..board.len())
                .find(|&p| &board.card(p).unwrap().face != face)
                .unwrap();
            (0, other)
        };
        h.send(InputEvent::CardClicked(first));
        h.send(InputEvent::CardClicked(second));
        assert_eq!(h.scheduler.pending(), 1);

        h.send(InputEvent::ChangeDifficultyRequested);
        assert_eq!(h.scheduler.pending(), 0);
        assert_eq!(h.screen.kind(), ScreenKind::DifficultySelection);
        assert_eq!(h.screen.theme().unwrap().name(), "Colors");

        h.send(InputEvent::ChangeThemeRequested);
        assert_eq!(h.screen.kind(), ScreenKind::ThemeSelection);
    }

    #[test]
    fn tasks_without_a_game_are_dropped() {
        let flow = Flow::default();
        let transition = flow.run_task(
            Screen::ThemeSelection,
            ScheduledTask::HideMismatch { game_id: 1 },
        );
        assert!(transition.notifications.is_empty());
        assert_eq!(transition.screen.kind(), ScreenKind::ThemeSelection);
    }
}
