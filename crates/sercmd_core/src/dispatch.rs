use crate::edge::Edge;
use crate::task::{Task, TaskInputs, TaskOutputs};

/// Ordered registration of command bytes to handlers.
///
/// Insertion order matters only in that it assigns each handler its slot;
/// lookup is by the command byte. Registering the same byte twice is a
/// configuration bug and panics immediately rather than shadowing the
/// earlier handler.
#[derive(Default)]
pub struct CommandSet {
    entries: Vec<(u8, Box<dyn Task>)>,
}

impl CommandSet {
    pub fn new() -> Self {
        CommandSet::default()
    }

    pub fn insert(&mut self, byte: u8, task: Box<dyn Task>) {
        if self.entries.iter().any(|(existing, _)| *existing == byte) {
            panic!("command byte {:?} registered twice", byte as char);
        }
        self.entries.push((byte, task));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum DispatchState {
    WaitMessage,
    ReadChar,
    RunTaskStart,
    RunTaskWait,
}

/// Routes one received byte to one handler and multiplexes the transmit
/// path to whichever handler is running.
///
/// `active` is a 1-based slot into the command table, with 0 meaning no
/// handler owns the transmit path; while it is 0 the muxed transmit wires
/// are forced low. The selected handler is started with a one-tick pulse
/// and holds the path until the rising edge of its done line.
pub(crate) struct Dispatcher {
    entries: Vec<(u8, Box<dyn Task>)>,
    state: DispatchState,
    active: usize,
    start: bool,
    rx_ack: bool,
    done_edge: Edge,
}

impl Dispatcher {
    pub(crate) fn new(commands: CommandSet) -> Self {
        Dispatcher {
            entries: commands.entries,
            state: DispatchState::WaitMessage,
            active: 0,
            start: false,
            rx_ack: false,
            done_edge: Edge::default(),
        }
    }

    /// Acknowledge wire toward the receiver.
    #[inline]
    pub(crate) fn rx_ack_line(&self) -> bool {
        self.rx_ack
    }

    #[inline]
    pub(crate) fn active(&self) -> usize {
        self.active
    }

    /// Transmit wires of the selected handler, forced low when idle.
    pub(crate) fn tx_mux(&self) -> (u8, bool) {
        let outs = self.muxed_outputs();
        (outs.tx_data, outs.tx_rdy)
    }

    pub(crate) fn idle(&self) -> bool {
        self.state == DispatchState::WaitMessage && self.active == 0 && !self.rx_ack
    }

    fn muxed_outputs(&self) -> TaskOutputs {
        if self.active == 0 {
            TaskOutputs::default()
        } else {
            self.entries[self.active - 1].1.outputs()
        }
    }

    fn lookup(&self, byte: u8) -> Option<usize> {
        self.entries
            .iter()
            .position(|(command, _)| *command == byte)
            .map(|slot| slot + 1)
    }

    /// Advance one tick from a snapshot of the receiver-ready, received
    /// byte and transmit-acknowledge wires.
    pub(crate) fn tick(&mut self, rx_rdy: bool, rx_data: u8, tx_ack: bool) {
        let active = self.active;
        let start_pulse = self.start;
        let ack_draining = self.rx_ack;
        let done_now = self.muxed_outputs().done;
        let done_rise = self.done_edge.rising(done_now);

        match self.state {
            DispatchState::WaitMessage => {
                self.rx_ack = false;
                // The guard on the acknowledge keeps a byte that was just
                // consumed from being read a second time.
                if rx_rdy && !ack_draining {
                    self.state = DispatchState::ReadChar;
                }
            }
            DispatchState::ReadChar => {
                self.rx_ack = true;
                match self.lookup(rx_data) {
                    Some(slot) => {
                        log::debug!("command {:?} dispatched", rx_data as char);
                        self.active = slot;
                        self.state = DispatchState::RunTaskStart;
                    }
                    None => {
                        log::debug!("ignoring unmapped command byte {:#04x}", rx_data);
                        self.state = DispatchState::WaitMessage;
                    }
                }
            }
            DispatchState::RunTaskStart => {
                self.rx_ack = false;
                self.start = true;
                self.state = DispatchState::RunTaskWait;
            }
            DispatchState::RunTaskWait => {
                self.start = false;
                if done_rise {
                    self.active = 0;
                    self.state = DispatchState::WaitMessage;
                }
            }
        }

        // Every handler advances every tick; only the selected one sees
        // live start and acknowledge levels.
        for (slot, (_, task)) in self.entries.iter_mut().enumerate() {
            let selected = active == slot + 1;
            task.tick(TaskInputs {
                start: selected && start_pulse,
                tx_ack: selected && tx_ack,
            });
        }
    }
}
