use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::app::App;

/// Interval between countdown steps of a pending automatic advance
pub const TICK_RATE_MS: u64 = 100;
/// How long to wait for input when nothing is scheduled
pub const IDLE_WAIT_MS: u64 = 1_000;

/// Terminal input the quiz reacts to
#[derive(Clone, Debug)]
pub enum QuizEvent {
    Key(KeyEvent),
    Resize,
}

/// What the loop should do after one step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Redraw,
    Idle,
    Quit,
}

/// Read crossterm events on a background thread.
///
/// The channel disconnects when the terminal can no longer be read.
pub fn crossterm_events() -> Receiver<QuizEvent> {
    let (tx, rx) = mpsc::channel();

    std::thread::spawn(move || loop {
        let evt = match event::read() {
            // key release events are reported on some platforms; answer on press only
            Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => {
                Some(QuizEvent::Key(key))
            }
            Ok(CtEvent::Resize(_, _)) => Some(QuizEvent::Resize),
            Ok(_) => None,
            Err(_) => break,
        };

        if let Some(evt) = evt {
            if tx.send(evt).is_err() {
                break;
            }
        }
    });

    rx
}

/// Feeds input into an [`App`] and counts down its automatic advance.
///
/// While an answer is waiting to advance the runner wakes every
/// `advance_every`; otherwise it only wakes for input or after `idle_wait`.
pub struct Runner {
    events: Receiver<QuizEvent>,
    advance_every: Duration,
    idle_wait: Duration,
}

impl Runner {
    pub fn new(events: Receiver<QuizEvent>) -> Self {
        Self::with_intervals(
            events,
            Duration::from_millis(TICK_RATE_MS),
            Duration::from_millis(IDLE_WAIT_MS),
        )
    }

    pub fn with_intervals(
        events: Receiver<QuizEvent>,
        advance_every: Duration,
        idle_wait: Duration,
    ) -> Self {
        Self {
            events,
            advance_every,
            idle_wait,
        }
    }

    /// How long the next step may block
    pub fn wait_for(&self, app: &App) -> Duration {
        if app.advance_pending() {
            self.advance_every
        } else {
            self.idle_wait
        }
    }

    /// Block for the next input or advance step and apply it to `app`
    pub fn step(&self, app: &mut App) -> Step {
        match self.events.recv_timeout(self.wait_for(app)) {
            Ok(QuizEvent::Key(key)) => {
                app.on_key(key);
                if app.should_quit {
                    Step::Quit
                } else {
                    Step::Redraw
                }
            }
            Ok(QuizEvent::Resize) => Step::Redraw,
            Err(RecvTimeoutError::Timeout) => {
                if app.on_tick() {
                    Step::Redraw
                } else {
                    Step::Idle
                }
            }
            // no more input will ever arrive
            Err(RecvTimeoutError::Disconnected) => {
                app.should_quit = true;
                Step::Quit
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::WordBank;
    use crate::config::Config;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app() -> App {
        let settings = Config {
            number_of_questions: 3,
            ..Config::default()
        };
        App::new(settings, WordBank::new("swedish").unwrap(), None)
    }

    fn key(c: char) -> QuizEvent {
        QuizEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn fast_runner(rx: Receiver<QuizEvent>) -> Runner {
        Runner::with_intervals(rx, Duration::from_millis(1), Duration::from_millis(1))
    }

    #[test]
    fn wait_is_short_only_while_an_advance_is_pending() {
        let (_tx, rx) = mpsc::channel();
        let runner = Runner::new(rx);
        let mut app = app();
        assert_eq!(runner.wait_for(&app), Duration::from_millis(IDLE_WAIT_MS));

        app.quiz.answer(0);
        assert_eq!(runner.wait_for(&app), Duration::from_millis(TICK_RATE_MS));
    }

    #[test]
    fn answer_then_timeouts_advance_once() {
        let (tx, rx) = mpsc::channel();
        let runner = fast_runner(rx);
        let mut app = app();

        tx.send(key('1')).unwrap();
        assert_eq!(runner.step(&mut app), Step::Redraw);
        assert_eq!(runner.step(&mut app), Step::Idle);
        assert_eq!(runner.step(&mut app), Step::Redraw);
        assert_eq!(app.quiz.position, 1);
        // nothing pending, nothing to redraw
        assert_eq!(runner.step(&mut app), Step::Idle);
    }

    #[test]
    fn idle_timeout_does_not_touch_the_quiz() {
        let (_tx, rx) = mpsc::channel();
        let runner = fast_runner(rx);
        let mut app = app();

        for _ in 0..5 {
            assert_eq!(runner.step(&mut app), Step::Idle);
        }
        assert_eq!(app.quiz.position, 0);
    }

    #[test]
    fn resize_redraws() {
        let (tx, rx) = mpsc::channel();
        tx.send(QuizEvent::Resize).unwrap();
        let mut app = app();
        assert_eq!(fast_runner(rx).step(&mut app), Step::Redraw);
    }

    #[test]
    fn escape_and_disconnect_quit() {
        let (tx, rx) = mpsc::channel();
        let runner = fast_runner(rx);
        let mut app = app();
        tx.send(QuizEvent::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)))
            .unwrap();
        assert_eq!(runner.step(&mut app), Step::Quit);

        let (tx, rx) = mpsc::channel::<QuizEvent>();
        drop(tx);
        let mut app = self::app();
        assert_eq!(fast_runner(rx).step(&mut app), Step::Quit);
        assert!(app.should_quit);
    }
}
