use std::collections::VecDeque;
use std::io::{self, Read, Write};

use anyhow::{anyhow, Result};

use sercmd_core::{CommandSet, LineDriver, LineProbe, Machine, MachineConfig};

/// Byte source and sink on the host side of the serial line.
pub trait Console {
    /// Next byte waiting to go out on the line, if any.
    fn poll_input(&mut self) -> Option<u8>;
    /// A byte the machine transmitted.
    fn push_output(&mut self, byte: u8);
}

/// Console fed from a fixed script, collecting output in memory.
pub struct ScriptConsole {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl ScriptConsole {
    pub fn new(script: &[u8]) -> Self {
        ScriptConsole {
            input: script.iter().copied().collect(),
            output: Vec::new(),
        }
    }

    /// Everything the machine has transmitted so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }
}

impl Console for ScriptConsole {
    fn poll_input(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn push_output(&mut self, byte: u8) {
        self.output.push(byte);
    }
}

/// Console wired to the process's standard streams.
///
/// Standard input is read to end of file up front, so this is a pipe-mode
/// console; pacing onto the serial line is the session's job, not the
/// reader's.
pub struct StdioConsole {
    input: VecDeque<u8>,
    stdout: io::Stdout,
}

impl StdioConsole {
    pub fn from_stdin() -> Result<Self> {
        let mut buffer = Vec::new();
        io::stdin().read_to_end(&mut buffer)?;
        Ok(StdioConsole {
            input: buffer.into(),
            stdout: io::stdout(),
        })
    }
}

impl Console for StdioConsole {
    fn poll_input(&mut self) -> Option<u8> {
        self.input.pop_front()
    }

    fn push_output(&mut self, byte: u8) {
        let result = self
            .stdout
            .write_all(&[byte])
            .and_then(|_| self.stdout.flush());
        if let Err(err) = result {
            log::warn!("dropping output byte {:#04x}: {}", byte, err);
        }
    }
}

/// A machine plus the host ends of its serial wires.
///
/// The session feeds console bytes one command at a time: the next byte
/// goes onto the line only once the previous one has fully drained through
/// the machine and its response has been decoded. A console can therefore
/// replay a whole script without ever overflowing the receiver.
pub struct Session {
    machine: Machine,
    driver: LineDriver,
    probe: LineProbe,
}

impl Session {
    pub fn new(config: MachineConfig, commands: CommandSet) -> Self {
        Session {
            machine: Machine::new(config, commands),
            driver: LineDriver::with_data_bits(config.divisor, config.data_bits),
            probe: LineProbe::with_data_bits(config.divisor, config.data_bits),
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Run until the console's input is exhausted and the machine has gone
    /// quiet, or until `budget` ticks have elapsed. Returns the number of
    /// ticks consumed.
    pub fn run(&mut self, console: &mut impl Console, budget: u64) -> Result<u64> {
        self.run_with(console, budget, || {})
    }

    /// Like [`Session::run`], with a callback after every tick. Host-side
    /// logic hanging off shared signals, counters and the like, lives in
    /// the callback.
    pub fn run_with(
        &mut self,
        console: &mut impl Console,
        budget: u64,
        mut on_tick: impl FnMut(),
    ) -> Result<u64> {
        let mut used = 0u64;
        loop {
            if self.driver.idle() && self.probe.idle() && self.machine.quiescent() {
                match console.poll_input() {
                    Some(byte) => self.driver.push_byte(byte),
                    None => return Ok(used),
                }
            }
            if used == budget {
                return Err(anyhow!("machine still busy after {} ticks", budget));
            }
            let line = self.driver.tick();
            let tx = self.machine.step(line);
            if let Some(byte) = self.probe.tick(tx) {
                console.push_output(byte);
            }
            used += 1;
            on_tick();
        }
    }
}
