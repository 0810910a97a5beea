use std::io::{IsTerminal, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tokio::time::Instant;

use crate::shutdown::ShutdownSender;

const RENDER_INTERVAL: Duration = Duration::from_millis(250);
const BAR_WIDTH: usize = 30;

/// Completed-request counter shared between workers and the renderer.
#[derive(Debug, Clone)]
pub struct ProgressCounter {
    completed: Arc<AtomicU64>,
    goal: Option<u64>,
}

impl ProgressCounter {
    /// `goal` is `None` for runs without a request ceiling.
    #[must_use]
    pub fn new(goal: Option<u64>) -> Self {
        Self {
            completed: Arc::new(AtomicU64::new(0)),
            goal,
        }
    }

    pub fn advance(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Relaxed)
    }
}

/// Redraws a single stderr line until shutdown. Does nothing when stderr is
/// not a terminal.
pub(crate) fn setup_progress_indicator(
    counter: &ProgressCounter,
    run_start: Instant,
    shutdown_tx: &ShutdownSender,
) -> tokio::task::JoinHandle<()> {
    let mut shutdown_rx = shutdown_tx.subscribe();
    let counter = counter.clone();
    let style = ProgressStyle::new(BAR_WIDTH);
    let no_color = std::env::var_os("NO_COLOR").is_some();

    tokio::spawn(async move {
        if !std::io::stderr().is_terminal() {
            return;
        }

        let mut ticker = tokio::time::interval(RENDER_INTERVAL);

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    let elapsed_ms = run_start.elapsed().as_millis();
                    if render_progress_line(&style, &counter, elapsed_ms, no_color).is_err() {
                        break;
                    }
                    drop(finish_progress_line());
                    break;
                }
                _ = ticker.tick() => {
                    let elapsed_ms = run_start.elapsed().as_millis();
                    if render_progress_line(&style, &counter, elapsed_ms, no_color).is_err() {
                        break;
                    }
                }
            }
        }
    })
}

fn render_progress_line(
    style: &ProgressStyle,
    counter: &ProgressCounter,
    elapsed_ms: u128,
    no_color: bool,
) -> Result<(), std::io::Error> {
    let line = build_progress_line(
        style,
        counter.completed(),
        counter.goal,
        elapsed_ms,
        no_color,
    );

    let mut out = std::io::stderr();
    queue!(out, cursor::MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    for segment in line {
        if let Some(color) = segment.color {
            queue!(
                out,
                SetForegroundColor(color),
                Print(&segment.text),
                ResetColor
            )?;
        } else {
            queue!(out, Print(&segment.text))?;
        }
    }
    out.flush()?;
    Ok(())
}

fn finish_progress_line() -> Result<(), std::io::Error> {
    let mut out = std::io::stderr();
    // \r as well: the key listener may have the terminal in raw mode.
    out.write_all(b"\r\n")?;
    out.flush()?;
    Ok(())
}

fn build_progress_line(
    style: &ProgressStyle,
    current: u64,
    goal: Option<u64>,
    elapsed_ms: u128,
    no_color: bool,
) -> Vec<ProgressSegment> {
    let elapsed_tenths = elapsed_ms.checked_div(100).unwrap_or(0);
    let secs = elapsed_tenths.checked_div(10).unwrap_or(0);
    let tenths = elapsed_tenths.checked_rem(10).unwrap_or(0);

    let Some(goal) = goal else {
        let count_text = format!("Requests: {} req", current);
        let time_text = format!(" | {}.{}s", secs, tenths);
        return finish_segments(
            no_color,
            vec![(count_text, None), (time_text, Some(Color::Yellow))],
        );
    };

    let size = style.size.max(1);
    let goal = goal.max(1);
    let current = current.min(goal);

    let current_u128 = u128::from(current);
    let goal_u128 = u128::from(goal);
    let size_u128 = u128::from(u64::try_from(size).unwrap_or(u64::MAX));

    let scaled = current_u128
        .saturating_mul(size_u128)
        .checked_div(goal_u128)
        .unwrap_or(0);
    let complete_size = usize::try_from(scaled).unwrap_or(size).min(size);
    let incomplete_size = size.saturating_sub(complete_size);

    let percent_x100 = current_u128
        .saturating_mul(10_000)
        .checked_div(goal_u128)
        .unwrap_or(0);
    let percent_whole = percent_x100.checked_div(100).unwrap_or(0);
    let percent_frac = percent_x100.checked_rem(100).unwrap_or(0);
    let percent_text = format!(" {}.{:02}%", percent_whole, percent_frac);
    let count_text = format!(" | {}/{} req | {}.{}s", current, goal, secs, tenths);

    let progress_bar = format!(
        "{}{}{}{}",
        style.begin,
        style.fill.repeat(complete_size),
        style.empty.repeat(incomplete_size),
        style.end
    );

    finish_segments(
        no_color,
        vec![
            (progress_bar, None),
            (percent_text, Some(Color::Cyan)),
            (count_text, Some(Color::Yellow)),
        ],
    )
}

fn finish_segments(no_color: bool, parts: Vec<(String, Option<Color>)>) -> Vec<ProgressSegment> {
    parts
        .into_iter()
        .map(|(text, color)| match color {
            Some(color) if !no_color => ProgressSegment::colored(text, color),
            Some(_) | None => ProgressSegment::plain(text),
        })
        .collect()
}

struct ProgressStyle {
    size: usize,
    begin: String,
    end: String,
    fill: String,
    empty: String,
}

impl ProgressStyle {
    fn new(size: usize) -> Self {
        Self {
            size,
            begin: "[".to_owned(),
            end: "]".to_owned(),
            fill: "#".to_owned(),
            empty: "-".to_owned(),
        }
    }
}

struct ProgressSegment {
    text: String,
    color: Option<Color>,
}

impl ProgressSegment {
    const fn plain(text: String) -> Self {
        Self { text, color: None }
    }

    const fn colored(text: String, color: Color) -> Self {
        Self {
            text,
            color: Some(color),
        }
    }
}
