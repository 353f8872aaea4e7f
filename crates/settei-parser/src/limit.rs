use std::fmt;

/// Tracks recursion depth against a configured ceiling.
///
/// Ported from the recursion-limit tracker used to guard a recursive-descent
/// parser against stack exhaustion on pathologically nested input; ported
/// here verbatim since the utility is parser-shape-agnostic.
#[derive(PartialEq, Eq, Clone, Copy)]
pub struct LimitTracker {
    current: usize,
    /// High water mark reached over the tracker's lifetime.
    pub high: usize,
    /// The configured ceiling.
    pub limit: usize,
}

/// Deep nesting must parse without exhausting the stack; 1000 leaves a wide
/// margin above the handful of levels any real configuration document nests.
pub(crate) const DEFAULT_RECURSION_LIMIT: usize = 1_000;

impl Default for LimitTracker {
    fn default() -> Self {
        Self::new(DEFAULT_RECURSION_LIMIT)
    }
}

impl LimitTracker {
    pub fn new(limit: usize) -> Self {
        Self {
            current: 0,
            high: 0,
            limit,
        }
    }

    pub fn limited(&self) -> bool {
        self.current > self.limit
    }

    pub fn consume(&mut self) {
        self.current += 1;
        if self.current > self.high {
            self.high = self.current;
        }
    }

    pub fn release(&mut self) {
        self.current = self.current.saturating_sub(1);
    }
}

impl fmt::Debug for LimitTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "recursion limit: {}, high: {}", self.limit, self.high)
    }
}
