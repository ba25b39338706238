use crate::output::Output;
use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;
use tokio::sync::watch;

/// Spinner shown while a resource reports `is_loading`.
///
/// Falls back to a debug log line when stdout/stderr are not terminals or the
/// output is machine readable.
struct LoadingSpinner {
    interactive: bool,
    bar: Option<ProgressBar>,
}

impl LoadingSpinner {
    fn new(output: &Output) -> Self {
        Self {
            interactive: output.is_human() && is_interactive(),
            bar: None,
        }
    }

    fn show(&mut self, message: &str) {
        if !self.interactive {
            tracing::debug!(operation = "progress", message = %message, "Loading");
            return;
        }

        let bar = self.bar.get_or_insert_with(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        bar.set_message(message.to_string());
    }

    fn hide(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for LoadingSpinner {
    fn drop(&mut self) {
        self.hide();
    }
}

/// Drive `work` to completion, showing a spinner whenever the published
/// state says a load is in flight.
pub async fn while_loading<S, T>(
    output: &Output,
    mut states: watch::Receiver<S>,
    is_loading: impl Fn(&S) -> bool,
    message: &str,
    work: impl Future<Output = T>,
) -> T {
    let mut spinner = LoadingSpinner::new(output);
    tokio::pin!(work);

    loop {
        tokio::select! {
            result = &mut work => return result,
            changed = states.changed() => {
                if changed.is_err() {
                    return (&mut work).await;
                }
                if is_loading(&*states.borrow_and_update()) {
                    spinner.show(message);
                } else {
                    spinner.hide();
                }
            }
        }
    }
}

pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::io::stderr().is_terminal()
}
