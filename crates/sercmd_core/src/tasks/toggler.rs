use crate::edge::Edge;
use crate::signal::Signal;
use crate::task::{Task, TaskInputs, TaskOutputs};

enum State {
    Idle,
    Finish,
}

/// Flips a shared bit once per start edge. Emits nothing.
pub struct Toggler {
    output: Signal<bool>,
    state: State,
    start_edge: Edge,
    done: bool,
}

impl Toggler {
    pub fn new() -> Self {
        Toggler {
            output: Signal::new(false),
            state: State::Idle,
            start_edge: Edge::default(),
            done: false,
        }
    }

    /// Handle onto the toggled bit.
    pub fn output(&self) -> Signal<bool> {
        self.output.clone()
    }
}

impl Default for Toggler {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for Toggler {
    fn tick(&mut self, inputs: TaskInputs) {
        let started = self.start_edge.rising(inputs.start);
        match self.state {
            State::Idle => {
                if started {
                    self.output.set(!self.output.get());
                    self.done = true;
                    self.state = State::Finish;
                }
            }
            State::Finish => {
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
