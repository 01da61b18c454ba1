pub const DEFAULT_TYPE_SPEED_MS: u64 = 80;
pub const DEFAULT_DELETE_SPEED_MS: u64 = 50;
pub const DEFAULT_PAUSE_MS: u64 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Typing,
    Pausing,
    Deleting,
}

/// Type / pause / delete cycle over a list of strings.
///
/// Each call to [`tick`](TypingEffect::tick) performs exactly one pending
/// transition: one character typed, the end of a pause, or one character
/// deleted. Once a string is fully deleted the next one starts, wrapping
/// around the list. The effect owns no timer; callers either wait
/// [`delay`](TypingEffect::delay) ms between ticks or feed elapsed time to
/// [`advance`](TypingEffect::advance).
#[derive(Debug, Clone)]
pub struct TypingEffect {
    texts: Vec<Vec<char>>,
    type_speed: u64,
    delete_speed: u64,
    pause_time: u64,
    index: usize,
    shown: usize, // chars of the current text on screen
    phase: TypingPhase,
    carry: u64,   // elapsed ms not yet spent on a transition
}

impl TypingEffect {
    pub fn new<S: AsRef<str>>(texts: &[S]) -> Self {
        Self::with_speeds(texts, DEFAULT_TYPE_SPEED_MS, DEFAULT_DELETE_SPEED_MS, DEFAULT_PAUSE_MS)
    }

    pub fn with_speeds<S: AsRef<str>>(texts: &[S], type_speed: u64, delete_speed: u64, pause_time: u64) -> Self {
        Self {
            texts: texts.iter().map(|t| t.as_ref().chars().collect()).collect(),
            type_speed,
            delete_speed,
            pause_time,
            index: 0,
            shown: 0,
            phase: TypingPhase::Typing,
            carry: 0,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn is_deleting(&self) -> bool {
        self.phase == TypingPhase::Deleting
    }

    pub fn text_index(&self) -> usize {
        self.index
    }

    pub fn displayed_text(&self) -> String {
        match self.texts.get(self.index) {
            Some(text) => text[..self.shown].iter().collect(),
            None => String::new(),
        }
    }

    // ms until the pending transition
    pub fn delay(&self) -> u64 {
        match self.phase {
            TypingPhase::Typing => self.type_speed,
            TypingPhase::Pausing => self.pause_time,
            TypingPhase::Deleting => self.delete_speed,
        }
    }

    /// Apply one transition and return the delay before the next one.
    pub fn tick(&mut self) -> u64 {
        let Some(len) = self.texts.get(self.index).map(Vec::len) else {
            return self.delay();
        };

        match self.phase {
            TypingPhase::Typing => {
                if self.shown < len {
                    self.shown += 1;
                }
                if self.shown == len {
                    self.phase = TypingPhase::Pausing;
                }
            }
            TypingPhase::Pausing => self.phase = TypingPhase::Deleting,
            TypingPhase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.phase = TypingPhase::Typing;
                    self.index = (self.index + 1) % self.texts.len();
                }
            }
        }
        self.delay()
    }

    // Spend `elapsed_ms` of wall time on as many transitions as it covers
    pub fn advance(&mut self, elapsed_ms: u64) {
        if self.texts.is_empty() {
            return;
        }
        self.carry += elapsed_ms;
        loop {
            // zero speeds still cost 1 ms so this terminates
            let delay = self.delay().max(1);
            if self.carry < delay {
                break;
            }
            self.carry -= delay;
            self.tick();
        }
    }
}
