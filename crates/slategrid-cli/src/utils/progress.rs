use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use slategrid::engine::progress::{Progress, ProgressCallback};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const SPINNER_TICK_MS: u64 = 80;

struct PhaseSpinner {
    pb: ProgressBar,
    current: Option<(&'static str, Instant)>,
}

impl PhaseSpinner {
    fn start(&mut self, name: &'static str) {
        self.pb.reset();
        self.pb.set_style(CliProgressHandler::spinner_style());
        self.pb
            .enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));
        self.pb.set_message(name);
        self.current = Some((name, Instant::now()));
    }

    fn finish(&mut self) {
        self.pb.disable_steady_tick();
        match self.current.take() {
            Some((name, started)) => {
                debug!(phase = name, elapsed = ?started.elapsed(), "Phase finished.");
                self.pb.finish_with_message(format!("✓ {name}"));
            }
            None => self.pb.finish_and_clear(),
        }
    }

    fn note(&self, message: String) {
        if self.current.is_some() {
            self.pb.println(format!("  {message}"));
        } else {
            debug!("{}", message);
        }
    }
}

/// Renders workflow phases as a single stderr spinner.
#[derive(Clone)]
pub struct CliProgressHandler {
    state: Arc<Mutex<PhaseSpinner>>,
}

impl CliProgressHandler {
    pub fn new() -> Self {
        let pb = ProgressBar::new_spinner().with_style(Self::spinner_style());
        pb.set_draw_target(ProgressDrawTarget::stderr());
        pb.finish_and_clear();

        Self {
            state: Arc::new(Mutex::new(PhaseSpinner { pb, current: None })),
        }
    }

    pub fn get_callback(&self) -> ProgressCallback<'static> {
        let state = Arc::clone(&self.state);

        Box::new(move |progress: Progress| {
            let Ok(mut spinner) = state.lock() else {
                warn!("Progress spinner mutex was poisoned. Cannot update progress.");
                return;
            };

            match progress {
                Progress::PhaseStart { name } => spinner.start(name),
                Progress::PhaseFinish => spinner.finish(),
                Progress::Message(message) => spinner.note(message),
            }
        })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl Default for CliProgressHandler {
    fn default() -> Self {
        Self::new()
    }
}
