use crate::edge::Edge;
use crate::signal::Signal;
use crate::task::{Task, TaskInputs, TaskOutputs};

enum State {
    Idle,
    Finish,
}

/// Raises a shared bit for exactly one tick per start edge.
///
/// The pulse does not persist, so user logic that wants to count firings
/// must sample the output every tick.
pub struct Trigger {
    output: Signal<bool>,
    state: State,
    start_edge: Edge,
    done: bool,
}

impl Trigger {
    pub fn new() -> Self {
        Trigger {
            output: Signal::new(false),
            state: State::Idle,
            start_edge: Edge::default(),
            done: false,
        }
    }

    /// Handle onto the pulsed bit.
    pub fn output(&self) -> Signal<bool> {
        self.output.clone()
    }
}

impl Default for Trigger {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for Trigger {
    fn tick(&mut self, inputs: TaskInputs) {
        let started = self.start_edge.rising(inputs.start);
        match self.state {
            State::Idle => {
                if started {
                    self.output.set(true);
                    self.done = true;
                    self.state = State::Finish;
                }
            }
            State::Finish => {
                self.output.set(false);
                self.done = false;
                self.state = State::Idle;
            }
        }
    }

    fn outputs(&self) -> TaskOutputs {
        TaskOutputs {
            done: self.done,
            ..TaskOutputs::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_is_one_tick_wide() {
        let mut trigger = Trigger::new();
        let out = trigger.output();

        let mut high_ticks = 0;
        for tick in 0..10 {
            trigger.tick(TaskInputs {
                start: tick == 0,
                ..TaskInputs::default()
            });
            if out.get() {
                high_ticks += 1;
            }
        }
        assert_eq!(high_ticks, 1);
        assert!(!out.get());
    }

    #[test]
    fn drives_a_counter_once_per_firing() {
        let mut trigger = Trigger::new();
        let out = trigger.output();
        let mut counter = 0u16;

        for round in 0..3 {
            for tick in 0..6 {
                trigger.tick(TaskInputs {
                    start: tick == 0,
                    ..TaskInputs::default()
                });
                if out.get() {
                    counter += 1;
                }
            }
            assert_eq!(counter, round + 1);
        }
    }
}
