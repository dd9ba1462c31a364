use std::rc::Rc;

use crate::edge::Edge;
use crate::mem::{Memory, ReadPort};
use crate::task::{Task, TaskInputs, TaskOutputs};

enum State {
    Idle,
    Fetch,
    Send,
    WaitAckDown,
    WaitAckUp,
}

/// Streams a byte memory as text.
///
/// Stops early at the first NUL and sends a newline in its place, so
/// C-style strings print with a line ending; a buffer without a NUL is
/// streamed in full with no newline appended.
pub struct TextMemoryPrinter {
    mem: Rc<dyn Memory>,
    length: usize,
    port: ReadPort,
    index: usize,
    print_newline: bool,
    tx_rdy: bool,
    done: bool,
    state: State,
    start_edge: Edge,
}

impl TextMemoryPrinter {
    pub fn new(mem: Rc<dyn Memory>, length: usize) -> Self {
        assert!(length >= 1, "length must be at least 1");
        assert!(length <= mem.len(), "length exceeds the memory");
        TextMemoryPrinter {
            mem,
            length,
            port: ReadPort::default(),
            index: 0,
            print_newline: false,
            tx_rdy: false,
            done: false,
            state: State::Idle,
            start_edge: Edge::default(),
        }
    }

    fn tx_byte(&self) -> u8 {
        if self.print_newline {
            b'\n'
        } else {
            self.port.data() as u8
        }
    }
}

impl Task for TextMemoryPrinter {
    fn tick(&mut self, inputs: TaskInputs) {
        let started = self.start_edge.rising(inputs.start);
        let addr = self.index;
        let byte = self.tx_byte();

        match self.state {
            State::Idle => {
                self.done = false;
                self.print_newline = false;
                if started {
                    self.state = State::Fetch;
                }
            }
            State::Fetch => {
                // One tick for the read port to catch up with the index.
                self.state = State::Send;
            }
            State::Send => {
                if byte == 0 {
                    // NUL terminator: send a newline in its place.
                    self.print_newline = true;
                } else {
                    self.tx_rdy = true;
                    self.state = State::WaitAckDown;
                }
            }
            State::WaitAckDown => {
                if !inputs.tx_ack {
                    self.state = State::WaitAckUp;
                }
            }
            State::WaitAckUp => {
                self.tx_rdy = false;
                if inputs.tx_ack {
                    if self.print_newline || self.index == self.length - 1 {
                        self.index = 0;
                        self.done = true;
                        self.state = State::Idle;
                    } else {
                        self.index += 1;
                        self.state = State::Fetch;
                    }
                }
            }
        }

        self.port.tick(self.mem.as_ref(), addr);
    }

    fn outputs(&self) -> TaskOutputs {
        TaskOutputs {
            tx_data: self.tx_byte(),
            tx_rdy: self.tx_rdy,
            done: self.done,
        }
    }
}
