use std::rc::Rc;

use crate::edge::Edge;
use crate::mem::{Memory, ReadPort};
use crate::signal::Signal;
use crate::task::{Task, TaskInputs, TaskOutputs};
use crate::tasks::word_mask;

enum State {
    Idle,
    Send,
    WaitAckDown,
    WaitAckUp,
}

/// Prints a signal as ASCII binary, least significant bit first.
///
/// The value is snapshotted on the start edge, so the source may keep
/// changing while the digits shift out. Always emits exactly `width`
/// characters.
pub struct BinarySignalPrinter {
    source: Signal<u16>,
    width: u8,
    snapshot: u16,
    digit: u8,
    char_out: u8,
    tx_rdy: bool,
    done: bool,
    state: State,
    start_edge: Edge,
}

impl BinarySignalPrinter {
    pub fn new(source: Signal<u16>, width: u8) -> Self {
        assert!((1..=16).contains(&width), "width must be between 1 and 16");
        BinarySignalPrinter {
            source,
            width,
            snapshot: 0,
            digit: 0,
            char_out: b'0',
            tx_rdy: false,
            done: false,
            state: State::Idle,
            start_edge: Edge::default(),
        }
    }
}

impl Task for BinarySignalPrinter {
    fn tick(&mut self, inputs: TaskInputs) {
        let started = self.start_edge.rising(inputs.start);
        match self.state {
            State::Idle => {
                self.done = false;
                if started {
                    self.snapshot = self.source.get() & word_mask(self.width);
                    self.digit = 0;
                    self.char_out = b'0';
                    self.state = State::Send;
                }
            }
            State::Send => {
                self.char_out = if self.snapshot & 1 != 0 { b'1' } else { b'0' };
                self.tx_rdy = true;
                self.state = State::WaitAckDown;
            }
            State::WaitAckDown => {
                if !inputs.tx_ack {
                    self.state = State::WaitAckUp;
                }
            }
            State::WaitAckUp => {
                self.tx_rdy = false;
                if inputs.tx_ack {
                    if self.digit < self.width - 1 {
                        self.snapshot >>= 1;
                        self.digit += 1;
                        self.state = State::Send;
                    } else {
                        self.done = true;
                        self.state = State::Idle;
                    }
                }
            }
        }
    }

    fn outputs(&self) -> TaskOutputs {
        TaskOutputs {
            tx_data: self.char_out,
            tx_rdy: self.tx_rdy,
            done: self.done,
        }
    }
}

/// Prints each word of a memory as ASCII binary, least significant bit
/// first within a word, words in address order. One fetch tick separates
/// consecutive words.
pub struct BinaryMemoryPrinter {
    mem: Rc<dyn Memory>,
    width: u8,
    length: usize,
    port: ReadPort,
    word_index: usize,
    bit_index: u8,
    tx_rdy: bool,
    done: bool,
    state: MemState,
    start_edge: Edge,
}

enum MemState {
    Idle,
    Fetch,
    Send,
    WaitAckDown,
    WaitAckUp,
}

impl BinaryMemoryPrinter {
    pub fn new(mem: Rc<dyn Memory>, width: u8, length: usize) -> Self {
        assert!((1..=16).contains(&width), "width must be between 1 and 16");
        assert!(length >= 1, "length must be at least 1");
        assert!(length <= mem.len(), "length exceeds the memory");
        BinaryMemoryPrinter {
            mem,
            width,
            length,
            port: ReadPort::default(),
            word_index: 0,
            bit_index: 0,
            tx_rdy: false,
            done: false,
            state: MemState::Idle,
            start_edge: Edge::default(),
        }
    }

    fn tx_byte(&self) -> u8 {
        if self.port.data() & (1 << self.bit_index) != 0 {
            b'1'
        } else {
            b'0'
        }
    }
}

impl Task for BinaryMemoryPrinter {
    fn tick(&mut self, inputs: TaskInputs) {
        let started = self.start_edge.rising(inputs.start);
        let addr = self.word_index;

        match self.state {
            MemState::Idle => {
                self.done = false;
                if started {
                    self.state = MemState::Fetch;
                }
            }
            MemState::Fetch => {
                self.state = MemState::Send;
            }
            MemState::Send => {
                self.tx_rdy = true;
                self.state = MemState::WaitAckDown;
            }
            MemState::WaitAckDown => {
                if !inputs.tx_ack {
                    self.state = MemState::WaitAckUp;
                }
            }
            MemState::WaitAckUp => {
                self.tx_rdy = false;
                if inputs.tx_ack {
                    let last_bit = self.bit_index == self.width - 1;
                    if last_bit && self.word_index == self.length - 1 {
                        self.word_index = 0;
                        self.bit_index = 0;
                        self.done = true;
                        self.state = MemState::Idle;
                    } else if last_bit {
                        self.word_index += 1;
                        self.bit_index = 0;
                        self.state = MemState::Fetch;
                    } else {
                        self.bit_index += 1;
                        self.state = MemState::Send;
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
