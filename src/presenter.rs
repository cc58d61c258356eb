//! Terminal rendering of companion notices and prompts.

use std::io::{self, BufRead, Write};

use lubelog_core::{NoticeKind, Presenter, SubmissionState, SubmissionTarget};

pub struct TerminalPresenter {
    /// Answer yes to every confirmation (`--yes`).
    assume_yes: bool,
}

impl TerminalPresenter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Presenter for TerminalPresenter {
    fn notify(&self, message: &str, kind: NoticeKind) {
        match kind {
            NoticeKind::Success => println!("✓ {}", message),
            NoticeKind::Info => println!("{}", message),
            NoticeKind::Error => eprintln!("✗ {}", message),
            NoticeKind::Blocking => {
                eprintln!("✗ {}", message);
                eprintln!("  Set the server section in your config file or the LUBELOG_* variables.");
            }
        }
    }

    fn submission_state(&self, target: SubmissionTarget, state: SubmissionState) {
        tracing::debug!("{:?}: {:?}", target, state);
    }

    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        print!("{} [y/N] ", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut input = String::new();
        match io::stdin().lock().read_line(&mut input) {
            Ok(_) => input.trim().eq_ignore_ascii_case("y"),
            Err(e) => {
                tracing::warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }
}
