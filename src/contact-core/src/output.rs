//! Rendering surface the sequencer writes to.
//!
//! The sequencer only ever appends whole lines, one at a time, and flips the
//! three indicator lights. Hosts decide what that looks like.

/// Number of indicator lights on the terminal frame.
pub const INDICATOR_COUNT: usize = 3;

/// What a rendered line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Boot and processing status lines.
    Status,
    /// A prompt asking for the current step.
    Prompt,
    /// The visitor's accepted answer echoed back.
    Response,
    /// The invalid-input notice.
    Notice,
    /// Delivery succeeded, and the closing line.
    Success,
    /// Delivery failed.
    Failure,
}

/// State of a single indicator light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IndicatorState {
    /// Not lit.
    #[default]
    Idle,
    /// Blinking amber while the terminal boots and works.
    Pending,
    /// Solid green after a successful delivery.
    Success,
}

/// A host surface the sequencer renders onto.
///
/// Writes are infallible from the sequencer's point of view; a host that
/// can fail to draw is expected to log and carry on.
pub trait TerminalOutput: Send {
    /// Start a new, empty line of the given kind.
    fn begin_line(&mut self, kind: LineKind);

    /// Append text to the line started by the last `begin_line`.
    fn push_str(&mut self, text: &str);

    /// Finish the current line.
    fn end_line(&mut self);

    /// Set one indicator light.
    fn set_indicator(&mut self, index: usize, state: IndicatorState);

    /// Input field enabled or disabled.
    fn set_input_enabled(&mut self, _enabled: bool) {}

    /// Write a complete line at once.
    fn write_line(&mut self, kind: LineKind, text: &str) {
        self.begin_line(kind);
        self.push_str(text);
        self.end_line();
    }
}

impl<T: TerminalOutput + ?Sized> TerminalOutput for Box<T> {
    fn begin_line(&mut self, kind: LineKind) {
        (**self).begin_line(kind);
    }

    fn push_str(&mut self, text: &str) {
        (**self).push_str(text);
    }

    fn end_line(&mut self) {
        (**self).end_line();
    }

    fn set_indicator(&mut self, index: usize, state: IndicatorState) {
        (**self).set_indicator(index, state);
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        (**self).set_input_enabled(enabled);
    }
}

/// One finished line in a [`Transcript`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub kind: LineKind,
    pub text: String,
}

/// In-memory output that keeps every line and the light states.
///
/// Useful for headless hosts and for inspecting a session after the fact.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Vec<TranscriptLine>,
    current: Option<TranscriptLine>,
    indicators: [IndicatorState; INDICATOR_COUNT],
    input_enabled: bool,
    /// Number of fragments pushed, which is one per character when the
    /// reveal is animated.
    fragments: usize,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Finished lines, oldest first.
    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    /// Text of every finished line.
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|l| l.text.as_str()).collect()
    }

    /// Finished lines of one kind.
    pub fn lines_of(&self, kind: LineKind) -> impl Iterator<Item = &TranscriptLine> {
        self.lines.iter().filter(move |l| l.kind == kind)
    }

    /// The most recent finished line.
    pub fn last(&self) -> Option<&TranscriptLine> {
        self.lines.last()
    }

    pub fn indicators(&self) -> [IndicatorState; INDICATOR_COUNT] {
        self.indicators
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn fragments(&self) -> usize {
        self.fragments
    }

    /// Whether a line has been started but not finished.
    pub fn has_open_line(&self) -> bool {
        self.current.is_some()
    }

    /// Text revealed so far on the unfinished line.
    pub fn open_text(&self) -> Option<&str> {
        self.current.as_ref().map(|l| l.text.as_str())
    }
}

impl TerminalOutput for Transcript {
    fn begin_line(&mut self, kind: LineKind) {
        if let Some(open) = self.current.take() {
            self.lines.push(open);
        }
        self.current = Some(TranscriptLine {
            kind,
            text: String::new(),
        });
    }

    fn push_str(&mut self, text: &str) {
        if let Some(current) = self.current.as_mut() {
            current.text.push_str(text);
            self.fragments += 1;
        }
    }

    fn end_line(&mut self) {
        if let Some(line) = self.current.take() {
            self.lines.push(line);
        }
    }

    fn set_indicator(&mut self, index: usize, state: IndicatorState) {
        if let Some(slot) = self.indicators.get_mut(index) {
            *slot = state;
        }
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }
}
