//! Commit policies for values read out of untrusted memory.
//!
//! Both types encode the same business rule: availability over
//! freshness. An unreadable, sentinel, or implausible reading never
//! resets a committed value to zero or a default; it leaves the last
//! good value in place, indefinitely if need be.

/// A value that only changes when a valid reading arrives.
#[derive(Debug, Clone, Copy)]
pub struct Committed<T> {
    value: T,
    ever_committed: bool,
}

impl<T: Copy> Committed<T> {
    pub fn new(initial: T) -> Self {
        Self {
            value: initial,
            ever_committed: false,
        }
    }

    /// Apply one poll's outcome: `Some` commits, `None` retains.
    pub fn apply(&mut self, reading: Option<T>) {
        if let Some(value) = reading {
            self.value = value;
            self.ever_committed = true;
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// False while the value is still the startup default.
    pub fn ever_committed(&self) -> bool {
        self.ever_committed
    }
}

/// A value that additionally requires repeated identical observations
/// before a change commits, to suppress transient noise.
///
/// A new candidate needs `threshold` consecutive confirming samples
/// after its first observation; any differing sample resets the count.
#[derive(Debug, Clone)]
pub struct DebouncedValue<T> {
    committed: T,
    candidate: Option<T>,
    consecutive_matches: u32,
    threshold: u32,
}

impl<T: Copy + PartialEq> DebouncedValue<T> {
    pub fn new(initial: T, threshold: u32) -> Self {
        Self {
            committed: initial,
            candidate: None,
            consecutive_matches: 0,
            threshold,
        }
    }

    /// Feed one valid sample. Returns true if the sample committed a
    /// new value.
    pub fn observe(&mut self, sample: T) -> bool {
        if sample == self.committed {
            self.candidate = None;
            self.consecutive_matches = 0;
            return false;
        }

        match self.candidate {
            Some(candidate) if candidate == sample => {
                self.consecutive_matches += 1;
                if self.consecutive_matches >= self.threshold {
                    self.committed = sample;
                    self.candidate = None;
                    self.consecutive_matches = 0;
                    return true;
                }
                false
            }
            _ => {
                self.candidate = Some(sample);
                self.consecutive_matches = 0;
                if self.threshold == 0 {
                    self.committed = sample;
                    self.candidate = None;
                    return true;
                }
                false
            }
        }
    }

    pub fn get(&self) -> T {
        self.committed
    }
}
