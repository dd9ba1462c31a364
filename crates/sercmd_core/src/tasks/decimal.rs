use crate::edge::Edge;
use crate::signal::Signal;
use crate::task::{Task, TaskInputs, TaskOutputs};
use crate::tasks::word_mask;

enum State {
    Idle,
    MakeBase,
    Countdown,
    Send,
    WaitAckDown,
    WaitAckUp,
}

/// Prints a signal in decimal, most significant digit first, padded with
/// leading zeros to the fixed width a `width`-bit value can need.
///
/// Division is long division by repeated subtraction: for each digit
/// position the base `10^position` is built up one multiply per tick, then
/// subtracted from the remaining snapshot while it fits, bumping an ASCII
/// digit counter each time.
pub struct DecimalSignalPrinter {
    source: Signal<u16>,
    digits: u8,
    width: u8,
    snapshot: u16,
    digit: u8,
    base: u16,
    base_exp: u8,
    char_out: u8,
    tx_rdy: bool,
    done: bool,
    state: State,
    start_edge: Edge,
}

/// Count of decimal digits the widest `width`-bit value occupies.
fn decimal_digits(width: u8) -> u8 {
    let mut value = word_mask(width);
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

impl DecimalSignalPrinter {
    pub fn new(source: Signal<u16>, width: u8) -> Self {
        assert!((1..=16).contains(&width), "width must be between 1 and 16");
        DecimalSignalPrinter {
            source,
            digits: decimal_digits(width),
            width,
            snapshot: 0,
            digit: 0,
            base: 1,
            base_exp: 0,
            char_out: b'0',
            tx_rdy: false,
            done: false,
            state: State::Idle,
            start_edge: Edge::default(),
        }
    }
}

impl Task for DecimalSignalPrinter {
    fn tick(&mut self, inputs: TaskInputs) {
        let started = self.start_edge.rising(inputs.start);
        match self.state {
            State::Idle => {
                self.done = false;
                if started {
                    self.snapshot = self.source.get() & word_mask(self.width);
                    self.digit = self.digits - 1;
                    self.base = 1;
                    self.base_exp = 0;
                    self.char_out = b'0';
                    self.state = State::MakeBase;
                }
            }
            State::MakeBase => {
                if self.base_exp < self.digit {
                    self.base *= 10;
                    self.base_exp += 1;
                } else {
                    self.state = State::Countdown;
                }
            }
            State::Countdown => {
                if self.snapshot < self.base {
                    self.state = State::Send;
                } else {
                    self.snapshot -= self.base;
                    self.char_out += 1;
                }
            }
            State::Send => {
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
                    if self.digit > 0 {
                        self.digit -= 1;
                        self.base = 1;
                        self.base_exp = 0;
                        self.char_out = b'0';
                        self.state = State::MakeBase;
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
