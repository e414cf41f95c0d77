use std::collections::VecDeque;
use std::io::{self, BufRead};
use std::sync::{mpsc, Arc};
use std::thread;

use anyhow::Context;
use chrono::Local;
use extractor_core::{update, AppState, Effect, Msg, Notification, NotificationKind};
use extractor_engine::EngineHandle;
use extractor_logging::{ext_debug, ext_info, ext_warn};

use super::config::ClientConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::{snapshot, Renderer};

/// Everything the controller loop reacts to.
pub(crate) enum AppInput {
    User(Command),
    Engine(Msg),
    Invalid(String),
    InputClosed,
}

pub(crate) trait EffectQueue {
    fn enqueue(&self, effects: Vec<Effect>);
}

impl EffectQueue for EffectRunner {
    fn enqueue(&self, effects: Vec<Effect>) {
        EffectRunner::enqueue(self, effects);
    }
}

pub fn run_app(config: ClientConfig) -> anyhow::Result<()> {
    let settings = config.backend_settings()?;
    ext_info!("Using backend at {}", settings.base_url);
    let engine = Arc::new(EngineHandle::new(settings).context("failed to start the engine")?);

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(engine, input_tx.clone());
    spawn_stdin_reader(input_tx).context("failed to start the input reader")?;

    println!("Video information extractor. Type 'help' for commands.");
    let mut controller = Controller::new(runner);
    for input in input_rx {
        if controller.handle(input) == Flow::Exit {
            break;
        }
    }
    ext_info!("Client exiting");
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<AppInput>) -> io::Result<()> {
    thread::Builder::new()
        .name("extractor-stdin".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        ext_warn!("stdin read failed: {}", err);
                        break;
                    }
                };
                let input = match parse_command(&line) {
                    Ok(Some(command)) => AppInput::User(command),
                    Ok(None) => continue,
                    Err(err) => AppInput::Invalid(err),
                };
                if input_tx.send(input).is_err() {
                    return;
                }
            }
            ext_debug!("stdin closed");
            let _ = input_tx.send(AppInput::InputClosed);
        })?;
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

/// Owns the state and feeds it messages, one at a time.
pub(crate) struct Controller<Q: EffectQueue> {
    state: AppState,
    effects: Q,
    renderer: Renderer,
    deferred: VecDeque<Command>,
    waiting: bool,
    quitting: bool,
    input_closed: bool,
}

impl<Q: EffectQueue> Controller<Q> {
    pub(crate) fn new(effects: Q) -> Self {
        Self {
            state: AppState::new(),
            effects,
            renderer: Renderer::new(),
            deferred: VecDeque::new(),
            waiting: false,
            quitting: false,
            input_closed: false,
        }
    }

    pub(crate) fn handle(&mut self, input: AppInput) -> Flow {
        match input {
            AppInput::User(command) if self.waiting => self.deferred.push_back(command),
            AppInput::User(command) => self.execute(command),
            AppInput::Engine(msg) => self.dispatch(msg),
            AppInput::Invalid(err) => eprintln!("{err}"),
            AppInput::InputClosed => self.input_closed = true,
        }
        self.settle()
    }

    /// Releases held commands once idle and decides whether to exit.
    fn settle(&mut self) -> Flow {
        while self.waiting && self.state.is_idle() {
            self.waiting = false;
            while !self.waiting {
                let Some(command) = self.deferred.pop_front() else {
                    break;
                };
                self.execute(command);
            }
        }

        let drained = !self.waiting && self.deferred.is_empty();
        if (self.quitting || self.input_closed) && drained && self.state.is_idle() {
            Flow::Exit
        } else {
            Flow::Continue
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Dispatch(msg) => self.dispatch(msg),
            Command::Show => {
                for line in snapshot(&self.state.view()) {
                    println!("{line}");
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Wait => self.waiting = true,
            Command::Quit => {
                if !self.state.is_idle() {
                    self.dispatch(Msg::AbortClicked);
                }
                self.quitting = true;
            }
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        ext_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.effects.enqueue(effects);

        if state.consume_dirty() {
            for line in self.renderer.render(&state.view()) {
                println!("{line}");
            }
        }
        for notification in state.drain_notifications() {
            eprintln!("{}", format_notification(&notification));
        }
        self.state = state;
    }

    #[cfg(test)]
    fn state(&self) -> &AppState {
        &self.state
    }
}

fn format_notification(notification: &Notification) -> String {
    let stamp = Local::now().format("%H:%M:%S");
    match notification.kind {
        NotificationKind::Info => format!("!! [{stamp}] {}", notification.message),
        NotificationKind::Error(kind) => {
            format!("!! [{stamp}] {kind}: {}", notification.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use extractor_core::{InputType, Phase, ProgressEvent, RangeType, TerminalKind};

    use super::*;

    #[derive(Default)]
    struct Recorder {
        effects: RefCell<Vec<Effect>>,
    }

    impl EffectQueue for &Recorder {
        fn enqueue(&self, effects: Vec<Effect>) {
            self.effects.borrow_mut().extend(effects);
        }
    }

    fn user(msg: Msg) -> AppInput {
        AppInput::User(Command::Dispatch(msg))
    }

    #[test]
    fn wait_holds_commands_until_list_arrives() {
        let recorder = Recorder::default();
        let mut controller = Controller::new(&recorder);

        controller.handle(user(Msg::UrlChanged("https://example.com/list".into())));
        controller.handle(user(Msg::InputTypeChanged(InputType::Playlist)));
        controller.handle(user(Msg::RangeTypeChanged(RangeType::Specific)));
        assert!(!controller.state().is_idle());

        controller.handle(AppInput::User(Command::Wait));
        controller.handle(user(Msg::RowToggled {
            index: 2,
            checked: true,
        }));
        assert!(!controller.state().playlist().is_selected(2));

        controller.handle(AppInput::Engine(Msg::PlaylistLoaded {
            total_videos: 3,
            videos: (1..=3)
                .map(|index| extractor_core::VideoEntry {
                    index,
                    title: format!("Video {index}"),
                })
                .collect(),
        }));
        assert!(controller.state().playlist().is_selected(2));
        assert_eq!(
            recorder.effects.borrow().as_slice(),
            &[Effect::ListPlaylistVideos {
                url: "https://example.com/list".into()
            }]
        );
    }

    #[test]
    fn closed_input_exits_after_extraction_ends() {
        let recorder = Recorder::default();
        let mut controller = Controller::new(&recorder);

        controller.handle(user(Msg::UrlChanged("https://example.com/v".into())));
        assert_eq!(controller.handle(user(Msg::SubmitClicked)), Flow::Continue);
        assert_eq!(controller.handle(AppInput::InputClosed), Flow::Continue);

        controller.handle(AppInput::Engine(Msg::ExtractionAccepted));
        controller.handle(AppInput::Engine(Msg::ProgressReceived(
            ProgressEvent::Terminal {
                kind: TerminalKind::Completed,
                message: "Video information saved to v.json".into(),
            },
        )));
        assert_eq!(controller.state().phase(), Phase::Streaming);
        assert_eq!(
            controller.handle(AppInput::Engine(Msg::ExtractionFinished(Ok(())))),
            Flow::Exit
        );
    }

    #[test]
    fn quit_while_streaming_requests_abort() {
        let recorder = Recorder::default();
        let mut controller = Controller::new(&recorder);

        controller.handle(user(Msg::UrlChanged("https://example.com/v".into())));
        controller.handle(user(Msg::SubmitClicked));
        assert_eq!(
            controller.handle(AppInput::User(Command::Quit)),
            Flow::Continue
        );
        assert_eq!(
            recorder.effects.borrow().last(),
            Some(&Effect::AbortExtraction)
        );
        assert_eq!(
            controller.handle(AppInput::Engine(Msg::ExtractionAborted)),
            Flow::Exit
        );
    }

    #[test]
    fn quit_when_idle_exits_immediately() {
        let recorder = Recorder::default();
        let mut controller = Controller::new(&recorder);
        assert_eq!(controller.handle(AppInput::User(Command::Quit)), Flow::Exit);
        assert!(recorder.effects.borrow().is_empty());
    }
}
