use bitflags::bitflags;

bitflags! {
    /// Receive-side status delivered alongside each byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct RxFlags: u8 {
        /// Start bit sampled high or stop bit sampled low.
        const FRAMING_ERROR = 1 << 0;
        /// A new frame started while the previous byte was still pending.
        const OVERFLOW = 1 << 1;
    }
}

/// One received byte plus the status flags that were live when it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Received {
    pub data: u8,
    pub flags: RxFlags,
}

/// Input sample consumed by [`Uart::tick`].
///
/// `rx_line` is the level on the receive wire during this tick. The
/// remaining fields are the transmit-request and receive-acknowledge wires
/// driven by whoever owns the transceiver this tick.
#[derive(Debug, Clone, Copy)]
pub struct UartInputs {
    pub rx_line: bool,
    pub tx_data: u8,
    pub tx_rdy: bool,
    pub rx_ack: bool,
}

impl Default for UartInputs {
    fn default() -> Self {
        // A serial line rests high.
        UartInputs {
            rx_line: true,
            tx_data: 0,
            tx_rdy: false,
            rx_ack: false,
        }
    }
}

/// Bit-level serial transceiver.
///
/// Both directions run one frame of `1 start + data_bits + 1 stop` bits,
/// least significant data bit first, idle line high. `divisor` is the
/// number of ticks per bit, `round(clock rate / baud rate)`; timing slack
/// shrinks with the divisor, so values below 4 are rejected.
///
/// Transmit loads a frame into a shift register and moves one bit onto the
/// line every `divisor` ticks. Receive arms on the falling start edge,
/// offsets its first sample by half a divisor to land mid-bit, then samples
/// every `divisor` ticks. A completed frame raises `rx_rdy` and stays
/// latched until acknowledged; further start edges while a byte is pending
/// set the overflow flag and the newer frame is lost.
pub struct Uart {
    divisor: u16,
    data_bits: u8,

    tx_phase: u16,
    tx_shreg: u16,
    tx_count: u8,

    rx_phase: u16,
    rx_shreg: u16,
    rx_count: u8,
    rx_rdy: bool,
    rx_ovf: bool,
}

impl Uart {
    /// Transceiver for 8-bit words.
    pub fn new(divisor: u16) -> Self {
        Self::with_data_bits(divisor, 8)
    }

    /// Transceiver for words of `data_bits` bits, 1 through 8.
    pub fn with_data_bits(divisor: u16, data_bits: u8) -> Self {
        assert!(divisor >= 4, "divisor must be at least 4");
        assert!((1..=8).contains(&data_bits), "data bits must be between 1 and 8");
        Uart {
            divisor,
            data_bits,
            tx_phase: 0,
            tx_shreg: u16::MAX,
            tx_count: 0,
            rx_phase: 0,
            rx_shreg: u16::MAX,
            rx_count: 0,
            rx_rdy: false,
            rx_ovf: false,
        }
    }

    #[inline]
    pub fn divisor(&self) -> u16 {
        self.divisor
    }

    #[inline]
    pub fn data_bits(&self) -> u8 {
        self.data_bits
    }

    /// Start + data + stop.
    #[inline]
    fn frame_bits(&self) -> u8 {
        self.data_bits + 2
    }

    #[inline]
    fn data_mask(&self) -> u16 {
        (1u16 << self.data_bits) - 1
    }

    /// Level on the transmit wire this tick.
    #[inline]
    pub fn tx_line(&self) -> bool {
        self.tx_shreg & 1 != 0
    }

    /// High while the transmitter can take a byte.
    #[inline]
    pub fn tx_ack(&self) -> bool {
        self.tx_count == 0
    }

    #[inline]
    pub fn rx_rdy(&self) -> bool {
        self.rx_rdy
    }

    /// Data bits of the most recently completed frame.
    #[inline]
    pub fn rx_data(&self) -> u8 {
        ((self.rx_shreg >> 1) & self.data_mask()) as u8
    }

    /// Framing check over the completed frame: the start sample must be low
    /// and the stop sample high. Only meaningful alongside `rx_rdy`.
    pub fn rx_err(&self) -> bool {
        let start = self.rx_shreg & 1 != 0;
        let stop = (self.rx_shreg >> (self.data_bits + 1)) & 1 != 0;
        self.rx_count == 0 && (start || !stop)
    }

    #[inline]
    pub fn rx_ovf(&self) -> bool {
        self.rx_ovf
    }

    /// True when nothing is shifting in either direction and no received
    /// byte is waiting.
    pub fn idle(&self) -> bool {
        self.tx_count == 0 && self.rx_count == 0 && !self.rx_rdy
    }

    /// Hand the transmitter a byte if it is idle.
    ///
    /// Equivalent to presenting `tx_data`/`tx_rdy` for one tick while the
    /// transmitter acknowledges. Returns false while a frame is still
    /// shifting out, in which case the byte was not taken.
    pub fn try_send(&mut self, byte: u8) -> bool {
        if self.tx_count != 0 {
            return false;
        }
        self.load_tx(byte);
        true
    }

    /// Take the pending received byte, if any, along with its flags.
    ///
    /// Immediate-mode form of the acknowledge wire: the pending byte is
    /// consumed, while the overflow flag stays up until the receiver arms
    /// for the next frame.
    pub fn poll_received(&mut self) -> Option<Received> {
        if !self.rx_rdy {
            return None;
        }
        let mut flags = RxFlags::empty();
        if self.rx_err() {
            flags |= RxFlags::FRAMING_ERROR;
        }
        if self.rx_ovf {
            flags |= RxFlags::OVERFLOW;
        }
        self.rx_rdy = false;
        Some(Received {
            data: self.rx_data(),
            flags,
        })
    }

    fn load_tx(&mut self, byte: u8) {
        // Frame layout, shifted out LSB end first: start low at bit 0,
        // data, stop high on top.
        self.tx_shreg = ((u16::from(byte) & self.data_mask()) << 1) | (1 << (self.data_bits + 1));
        self.tx_count = self.frame_bits();
        self.tx_phase = self.divisor - 1;
    }

    /// Advance one tick from a snapshot of this tick's input wires.
    pub fn tick(&mut self, inputs: UartInputs) {
        let UartInputs {
            rx_line,
            tx_data,
            tx_rdy,
            rx_ack,
        } = inputs;

        // Transmit side.
        if self.tx_count == 0 {
            if tx_rdy {
                self.load_tx(tx_data);
            }
        } else if self.tx_phase != 0 {
            self.tx_phase -= 1;
        } else {
            // Next bit onto the line; ones shift in behind the stop bit so
            // the register drains back to the idle level.
            self.tx_shreg = (self.tx_shreg >> 1) | (1 << (self.data_bits + 1));
            self.tx_count -= 1;
            self.tx_phase = self.divisor - 1;
        }

        // Receive side.
        if self.rx_count == 0 {
            if !rx_line {
                if rx_ack || !self.rx_rdy {
                    // Start edge: arm a full frame, first sample offset to
                    // the middle of the start bit.
                    self.rx_rdy = false;
                    self.rx_ovf = false;
                    self.rx_count = self.frame_bits();
                    self.rx_phase = self.divisor / 2;
                } else {
                    self.rx_ovf = true;
                }
            }
            if rx_ack {
                self.rx_rdy = false;
            }
        } else if self.rx_phase != 0 {
            self.rx_phase -= 1;
        } else {
            let top = u16::from(self.data_bits) + 1;
            self.rx_shreg = (self.rx_shreg >> 1) | (u16::from(rx_line) << top);
            if self.rx_count == 1 {
                self.rx_rdy = true;
            }
            self.rx_count -= 1;
            self.rx_phase = self.divisor - 1;
        }
    }
}
