use std::io::{self, Write};

const WIDTH: usize = 30;

/// Single-line textual progress indicator drawn on stderr
#[derive(Debug, Default)]
pub struct ProgressBar {
    drawn: bool,
}

impl ProgressBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, percent: u8) {
        let mut stderr = io::stderr().lock();
        let _ = write!(stderr, "\r{}", render(percent));
        let _ = stderr.flush();
        self.drawn = true;
    }

    /// Move past the bar so later log lines start on a fresh line.
    pub fn finish(&mut self) {
        if self.drawn {
            eprintln!();
            self.drawn = false;
        }
    }
}

fn render(percent: u8) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * WIDTH / 100;
    format!("[{}{}] {percent:>3}%", "#".repeat(filled), ".".repeat(WIDTH - filled))
}
