/// Input wires a task samples each tick.
///
/// `start` is pulsed by the dispatcher when the task takes ownership of
/// the transmit path; tasks edge-detect it, so a level held high runs the
/// task once. `tx_ack` mirrors the transmitter's acknowledge wire while
/// this task is selected and reads false otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskInputs {
    pub start: bool,
    pub tx_ack: bool,
}

/// Output wires a task drives.
///
/// `tx_data` must hold still while `tx_rdy` is up. `done` is raised for
/// exactly one tick when the task surrenders the transmit path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskOutputs {
    pub tx_data: u8,
    pub tx_rdy: bool,
    pub done: bool,
}

/// A command handler on the shared transmit path.
///
/// Implementations are synchronous state machines: `tick` computes the next
/// state from the current one plus this tick's inputs, and `outputs` is a
/// pure read of current state. To emit a byte a task raises `tx_rdy`,
/// waits for the acknowledge to fall, drops `tx_rdy` while waiting for it
/// to rise again, then moves on.
pub trait Task {
    fn tick(&mut self, inputs: TaskInputs);
    fn outputs(&self) -> TaskOutputs;
}
