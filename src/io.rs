//! The text I/O façade contract and a reference implementation.
//!
//! The interpreter core never talks to a terminal directly — it only ever
//! calls through [`IoFacade`]. A graphical or web front-end implements the
//! same trait; [`TextIo`] is the reference text-only implementation this
//! crate ships for the `gac run` CLI.

use std::io::Write;
use std::time::Duration;

/// Output/input contract the condition VM and turn driver use exclusively.
///
/// Implementations should not assume `print` calls are newline-terminated;
/// wrapping and column tracking is the façade's job.
pub trait IoFacade {
    /// Writes `string`, word-wrapping at the configured width.
    fn print(&mut self, string: &str);

    /// Reads one line of player input, without its trailing newline.
    fn input(&mut self) -> String;

    /// Sets the output line width, in columns.
    fn set_width(&mut self, width: usize);

    /// Sets the characters (each given as a one-character string) that word
    /// wrap may break after, in addition to `"\n"`.
    fn set_separators(&mut self, separators: Vec<String>);

    /// Blocks up to `frames / 50` seconds, returning `true` if a keystroke
    /// arrived before the timeout elapsed.
    ///
    /// Optional in spirit (the source treats it as such): a façade that
    /// cannot poll for input may simply sleep the full duration and return
    /// `false`.
    fn wait_key_or_timeout(&mut self, frames: u16) -> bool;
}

/// Reference text-only [`IoFacade`], printing to stdout and reading from stdin.
///
/// Word wrap replicates the original toolkit's line-buffering behaviour: a
/// run of non-separator characters is only ever flushed as a whole, even if
/// it overflows the remaining width on its own.
#[derive(Debug)]
pub struct TextIo {
    width: usize,
    separators: Vec<String>,
    line_remain: usize,
}

impl TextIo {
    /// Builds a façade with a zero width; call [`TextIo::set_width`] before
    /// printing (as `start_adventure` does).
    #[must_use]
    pub fn new() -> Self {
        TextIo {
            width: 0,
            separators: Vec::new(),
            line_remain: 0,
        }
    }
}

impl Default for TextIo {
    fn default() -> Self {
        Self::new()
    }
}

impl IoFacade for TextIo {
    fn print(&mut self, string: &str) {
        let chars: Vec<char> = string.chars().collect();
        if chars.is_empty() {
            return;
        }
        let mut pos = 0usize;
        while pos < chars.len() {
            let mut pos_w = pos;
            while pos_w < chars.len() - 1 && !self.is_separator(chars[pos_w]) {
                pos_w += 1;
            }
            let substring: String = chars[pos..=pos_w].iter().collect();
            if substring.chars().count() > self.line_remain {
                print!("\n");
                self.line_remain = self.width;
            }
            if chars[pos_w] == '\n' {
                self.line_remain = self.width;
            }
            self.line_remain = self.line_remain.saturating_sub(substring.chars().count());
            pos = pos_w + 1;
            print!("{substring}");
        }
        let _ = std::io::stdout().flush();
    }

    fn input(&mut self) -> String {
        self.line_remain = self.width;
        let mut buf = String::new();
        if std::io::stdin().read_line(&mut buf).is_err() {
            log::warn!("failed to read a line from stdin");
        }
        buf.trim_end_matches(['\n', '\r']).to_string()
    }

    fn set_width(&mut self, width: usize) {
        self.width = width;
        self.line_remain = width;
    }

    fn set_separators(&mut self, separators: Vec<String>) {
        self.separators = separators;
    }

    fn wait_key_or_timeout(&mut self, frames: u16) -> bool {
        let timeout = Duration::from_secs_f64(f64::from(frames) / 50.0);
        if let Err(e) = crossterm::terminal::enable_raw_mode() {
            log::warn!("could not enable raw mode for key wait: {e}");
            std::thread::sleep(timeout);
            return false;
        }
        let got_key = match crossterm::event::poll(timeout) {
            Ok(true) => {
                let _ = crossterm::event::read();
                true
            }
            Ok(false) => false,
            Err(e) => {
                log::warn!("key poll failed: {e}");
                false
            }
        };
        let _ = crossterm::terminal::disable_raw_mode();
        got_key
    }
}

impl TextIo {
    fn is_separator(&self, ch: char) -> bool {
        ch == '\n' || self.separators.iter().any(|s| s.chars().count() == 1 && s.starts_with(ch))
    }
}
