//! Crossterm rendering of the contact terminal.
//!
//! Lines are written to the underlying writer as they are revealed. The
//! three indicator lights are drawn as a row of dots which is redrawn in
//! place while the cursor still sits on it.
//!
//! When stdin is a TTY the visitor's own keystrokes are echoed by the
//! terminal, including lines the sequencer drops while it is busy. With
//! `clear_echo` on, every line echoed since the last rendered line is wiped
//! before the next one is written, so the scrollback reads like the
//! transcript. Lines typed in the middle of a reveal land inside that line
//! and are left alone.

use std::io::{self, IsTerminal, Stdout, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use contact_core::{INDICATOR_COUNT, IndicatorState, LineKind, TerminalOutput};
use crossterm::{
    cursor::{MoveToPreviousLine, Show},
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use tracing::warn;

use crate::cli::ColorMode;

const AMBER: Color = Color::Rgb {
    r: 0xff,
    g: 0xbd,
    b: 0x2e,
};
const GREEN: Color = Color::Rgb {
    r: 0x27,
    g: 0xc9,
    b: 0x3f,
};

/// Decide whether to emit colors.
///
/// `NO_COLOR` (any non-empty value) disables colors in auto mode, as does a
/// non-terminal stdout.
pub fn color_enabled(mode: ColorMode, is_tty: bool, no_color: Option<&str>) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => is_tty && no_color.is_none_or(str::is_empty),
    }
}

/// Rendering options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
    pub clear_echo: bool,
}

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(mut self, enabled: bool) -> Self {
        self.color = enabled;
        self
    }

    pub fn clear_echo(mut self, enabled: bool) -> Self {
        self.clear_echo = enabled;
        self
    }
}

/// Count of input lines the terminal has echoed since the last rendered
/// line. Shared between the stdin reader and the renderer.
#[derive(Debug, Clone, Default)]
pub struct EchoTracker {
    lines: Arc<AtomicUsize>,
}

impl EchoTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more line was read, and so echoed.
    pub fn record_line(&self) {
        self.lines.fetch_add(1, Ordering::SeqCst);
    }

    pub fn pending(&self) -> usize {
        self.lines.load(Ordering::SeqCst)
    }

    fn take(&self) -> usize {
        self.lines.swap(0, Ordering::SeqCst)
    }

    fn reset(&self) {
        self.lines.store(0, Ordering::SeqCst);
    }
}

/// [`TerminalOutput`] that writes ANSI text to a writer.
pub struct AnsiTerminal<W: Write> {
    out: W,
    options: RenderOptions,
    indicators: [IndicatorState; INDICATOR_COUNT],
    /// The cursor sits at the end of the lights row.
    lights_open: bool,
    /// Kind of the line currently being revealed.
    open_line: Option<LineKind>,
    /// The last finished line was a prompt, so the next response follows a
    /// line the terminal echoed.
    after_prompt: bool,
    /// Exact echo count from the stdin reader, when there is one.
    echo: Option<EchoTracker>,
    input_enabled: bool,
    write_failed: bool,
}

impl AnsiTerminal<Stdout> {
    /// Render to stdout.
    pub fn stdout(options: RenderOptions) -> Self {
        Self::new(io::stdout(), options)
    }

    /// Render to stdout with options detected from the environment.
    pub fn detect(mode: ColorMode) -> Self {
        let no_color = std::env::var("NO_COLOR").ok();
        let options = RenderOptions::new()
            .color(color_enabled(
                mode,
                io::stdout().is_terminal(),
                no_color.as_deref(),
            ))
            .clear_echo(io::stdin().is_terminal() && io::stdout().is_terminal());
        Self::stdout(options)
    }
}

impl<W: Write> AnsiTerminal<W> {
    pub fn new(out: W, options: RenderOptions) -> Self {
        Self {
            out,
            options,
            indicators: [IndicatorState::Idle; INDICATOR_COUNT],
            lights_open: false,
            open_line: None,
            after_prompt: false,
            echo: None,
            input_enabled: false,
            write_failed: false,
        }
    }

    /// Clear exactly the lines counted by `echo` instead of assuming one
    /// echoed line after each prompt.
    pub fn with_echo_tracker(mut self, echo: EchoTracker) -> Self {
        self.echo = Some(echo);
        self
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn indicators(&self) -> [IndicatorState; INDICATOR_COUNT] {
        self.indicators
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Close any open row, reset styling and show the cursor.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.lights_open || self.open_line.is_some() {
            queue!(self.out, Print("\n"))?;
        }
        self.lights_open = false;
        self.open_line = None;
        if self.options.color {
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        queue!(self.out, Show)?;
        self.out.flush()
    }

    fn start_line(&mut self, kind: LineKind) -> io::Result<()> {
        if self.open_line.take().is_some() {
            self.close_style()?;
            queue!(self.out, Print("\n"))?;
        }
        let echoed = match &self.echo {
            Some(echo) => echo.take(),
            None => usize::from(
                self.after_prompt && matches!(kind, LineKind::Response | LineKind::Notice),
            ),
        };
        if self.lights_open {
            queue!(self.out, Print("\n"))?;
            self.lights_open = false;
        } else if self.options.clear_echo && echoed > 0 {
            let rows = u16::try_from(echoed).unwrap_or(u16::MAX);
            queue!(
                self.out,
                MoveToPreviousLine(rows),
                Clear(ClearType::FromCursorDown)
            )?;
        }
        self.after_prompt = false;

        if self.options.color {
            queue!(self.out, SetForegroundColor(line_color(kind)))?;
            if kind == LineKind::Success {
                queue!(self.out, SetAttribute(Attribute::Bold))?;
            }
        }
        self.open_line = Some(kind);
        Ok(())
    }

    fn write_text(&mut self, text: &str) -> io::Result<()> {
        if self.open_line.is_none() {
            return Ok(());
        }
        queue!(self.out, Print(text))?;
        self.out.flush()
    }

    fn finish_line(&mut self) -> io::Result<()> {
        let Some(kind) = self.open_line.take() else {
            return Ok(());
        };
        self.close_style()?;
        queue!(self.out, Print("\n"))?;
        self.after_prompt = kind == LineKind::Prompt;
        if let Some(echo) = &self.echo {
            echo.reset();
        }
        self.out.flush()
    }

    fn draw_lights(&mut self) -> io::Result<()> {
        if self.open_line.is_some() {
            return Ok(());
        }
        if self.lights_open {
            queue!(self.out, Print("\r"), Clear(ClearType::CurrentLine))?;
        }
        for (index, state) in self.indicators.into_iter().enumerate() {
            if index > 0 {
                queue!(self.out, Print(" "))?;
            }
            if self.options.color {
                match state {
                    IndicatorState::Idle => {
                        queue!(self.out, SetForegroundColor(Color::DarkGrey), Print("●"))?
                    }
                    IndicatorState::Pending => queue!(
                        self.out,
                        SetForegroundColor(AMBER),
                        SetAttribute(Attribute::SlowBlink),
                        Print("●"),
                        SetAttribute(Attribute::NoBlink)
                    )?,
                    IndicatorState::Success => {
                        queue!(self.out, SetForegroundColor(GREEN), Print("●"))?
                    }
                }
                queue!(self.out, ResetColor)?;
            } else {
                queue!(self.out, Print(plain_glyph(state)))?;
            }
        }
        self.lights_open = true;
        self.after_prompt = false;
        self.out.flush()
    }

    fn close_style(&mut self) -> io::Result<()> {
        if self.options.color {
            queue!(self.out, SetAttribute(Attribute::Reset), ResetColor)?;
        }
        Ok(())
    }

    /// Log the first write failure; later ones are dropped silently.
    fn check(&mut self, result: io::Result<()>) {
        if let Err(err) = result
            && !self.write_failed
        {
            self.write_failed = true;
            warn!(error = %err, "Failed to write to terminal");
        }
    }
}

impl<W: Write + Send> TerminalOutput for AnsiTerminal<W> {
    fn begin_line(&mut self, kind: LineKind) {
        let result = self.start_line(kind);
        self.check(result);
    }

    fn push_str(&mut self, text: &str) {
        let result = self.write_text(text);
        self.check(result);
    }

    fn end_line(&mut self) {
        let result = self.finish_line();
        self.check(result);
    }

    fn set_indicator(&mut self, index: usize, state: IndicatorState) {
        let Some(slot) = self.indicators.get_mut(index) else {
            return;
        };
        *slot = state;
        let result = self.draw_lights();
        self.check(result);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }
}

impl<W: Write> std::fmt::Debug for AnsiTerminal<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnsiTerminal")
            .field("options", &self.options)
            .field("indicators", &self.indicators)
            .field("open_line", &self.open_line)
            .finish_non_exhaustive()
    }
}

fn line_color(kind: LineKind) -> Color {
    match kind {
        LineKind::Status => Color::Grey,
        LineKind::Prompt => GREEN,
        LineKind::Response => Color::White,
        LineKind::Notice => AMBER,
        LineKind::Success => GREEN,
        LineKind::Failure => Color::Red,
    }
}

fn plain_glyph(state: IndicatorState) -> &'static str {
    match state {
        IndicatorState::Idle => "○",
        IndicatorState::Pending => "◌",
        IndicatorState::Success => "●",
    }
}
