/// Rising-edge detector over a sampled boolean line.
///
/// Stores the level seen on the previous tick so that a level held high
/// across many ticks reports exactly one transition. Components that react
/// to `start` or `done` pulses sample through this instead of the raw
/// level.
#[derive(Debug, Default)]
pub struct Edge {
    last: bool,
}

impl Edge {
    /// Feed the current tick's level; returns true only on a low-to-high
    /// transition.
    pub fn rising(&mut self, level: bool) -> bool {
        let rose = level && !self.last;
        self.last = level;
        rose
    }
}
