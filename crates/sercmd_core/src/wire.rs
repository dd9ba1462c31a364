use std::collections::VecDeque;

/// Host-side byte-to-line encoder, the counterpart of the receiver.
///
/// Queued bytes are framed start/data/stop and shifted onto the line one
/// bit per `divisor` ticks. Each frame carries one trailing idle bit so a
/// consumer that acknowledges a couple of ticks late still sees the next
/// start edge from an armed state.
pub struct LineDriver {
    divisor: u16,
    data_bits: u8,
    pending: VecDeque<u8>,
    shreg: u16,
    bits_left: u8,
    phase: u16,
}

impl LineDriver {
    pub fn new(divisor: u16) -> Self {
        Self::with_data_bits(divisor, 8)
    }

    pub fn with_data_bits(divisor: u16, data_bits: u8) -> Self {
        assert!(divisor >= 4, "divisor must be at least 4");
        assert!((1..=8).contains(&data_bits), "data bits must be between 1 and 8");
        LineDriver {
            divisor,
            data_bits,
            pending: VecDeque::new(),
            shreg: 0,
            bits_left: 0,
            phase: 0,
        }
    }

    pub fn push_byte(&mut self, byte: u8) {
        self.pending.push_back(byte);
    }

    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes.iter().copied());
    }

    /// True once every queued byte has fully left the line.
    pub fn idle(&self) -> bool {
        self.bits_left == 0 && self.pending.is_empty()
    }

    fn load(&mut self, byte: u8) {
        let mask = (1u16 << self.data_bits) - 1;
        // Start low at bit 0, data, then stop and idle bits high on top.
        self.shreg = ((u16::from(byte) & mask) << 1) | (0b11 << (self.data_bits + 1));
        self.bits_left = self.data_bits + 3;
        self.phase = self.divisor;
    }

    /// Line level during this tick.
    pub fn tick(&mut self) -> bool {
        if self.bits_left == 0 {
            match self.pending.pop_front() {
                Some(byte) => self.load(byte),
                None => return true,
            }
        }
        let level = self.shreg & 1 != 0;
        self.phase -= 1;
        if self.phase == 0 {
            self.shreg >>= 1;
            self.bits_left -= 1;
            self.phase = self.divisor;
        }
        level
    }
}

enum ProbeState {
    Idle,
    Data { bit: u8 },
    Stop,
}

/// Host-side line-to-byte decoder, the counterpart of the transmitter.
///
/// Waits for a start edge, aligns half a divisor into the bit, then
/// samples each data bit at its center. The stop bit is skipped rather
/// than checked; wire-level framing checks belong to the receiver proper.
pub struct LineProbe {
    divisor: u16,
    data_bits: u8,
    state: ProbeState,
    countdown: u16,
    byte: u8,
}

impl LineProbe {
    pub fn new(divisor: u16) -> Self {
        Self::with_data_bits(divisor, 8)
    }

    pub fn with_data_bits(divisor: u16, data_bits: u8) -> Self {
        assert!(divisor >= 4, "divisor must be at least 4");
        assert!((1..=8).contains(&data_bits), "data bits must be between 1 and 8");
        LineProbe {
            divisor,
            data_bits,
            state: ProbeState::Idle,
            countdown: 0,
            byte: 0,
        }
    }

    pub fn idle(&self) -> bool {
        matches!(self.state, ProbeState::Idle)
    }

    /// Feed the line level for this tick; yields a byte once its stop-bit
    /// center has passed.
    pub fn tick(&mut self, line: bool) -> Option<u8> {
        match self.state {
            ProbeState::Idle => {
                if !line {
                    self.byte = 0;
                    self.state = ProbeState::Data { bit: 0 };
                    // Half a bit to reach the start-bit center, one more
                    // bit to reach the first data sample.
                    self.countdown = self.divisor / 2 + self.divisor;
                }
                None
            }
            ProbeState::Data { bit } => {
                self.countdown -= 1;
                if self.countdown == 0 {
                    if line {
                        self.byte |= 1 << bit;
                    }
                    self.state = if bit + 1 == self.data_bits {
                        ProbeState::Stop
                    } else {
                        ProbeState::Data { bit: bit + 1 }
                    };
                    self.countdown = self.divisor;
                }
                None
            }
            ProbeState::Stop => {
                self.countdown -= 1;
                if self.countdown == 0 {
                    self.state = ProbeState::Idle;
                    Some(self.byte)
                } else {
                    None
                }
            }
        }
    }
}
