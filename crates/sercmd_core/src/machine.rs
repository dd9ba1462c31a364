use typed_builder::TypedBuilder;

use crate::dispatch::{CommandSet, Dispatcher};
use crate::uart::{Uart, UartInputs};

#[cfg(test)]
mod tests;

/// Build-time knobs for a [`Machine`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct MachineConfig {
    /// Ticks per serial bit.
    #[builder(default = 16)]
    pub divisor: u16,
    /// Serial word width in bits.
    #[builder(default = 8)]
    pub data_bits: u8,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig::builder().build()
    }
}

/// The composed command machine: one transceiver, one dispatcher and the
/// registered handlers behind it.
///
/// Time advances only through [`Machine::step`]. Within a step every
/// cross-component wire is sampled before any component updates, so the
/// pieces observe each other's previous-tick state no matter the call
/// order, the same way clocked registers would.
pub struct Machine {
    uart: Uart,
    dispatcher: Dispatcher,
}

impl Machine {
    pub fn new(config: MachineConfig, commands: CommandSet) -> Self {
        Machine {
            uart: Uart::with_data_bits(config.divisor, config.data_bits),
            dispatcher: Dispatcher::new(commands),
        }
    }

    /// Advance one tick. `rx_line` is the receive-wire level during this
    /// tick; returns the transmit-wire level during this tick.
    pub fn step(&mut self, rx_line: bool) -> bool {
        let tx_line = self.uart.tx_line();
        let tx_ack = self.uart.tx_ack();
        let rx_rdy = self.uart.rx_rdy();
        let rx_data = self.uart.rx_data();
        let (tx_data, tx_rdy) = self.dispatcher.tx_mux();
        let rx_ack = self.dispatcher.rx_ack_line();

        self.dispatcher.tick(rx_rdy, rx_data, tx_ack);
        self.uart.tick(UartInputs {
            rx_line,
            tx_data,
            tx_rdy,
            rx_ack,
        });

        tx_line
    }

    /// True once both serial directions have drained and no handler is
    /// running.
    pub fn quiescent(&self) -> bool {
        self.uart.idle() && self.dispatcher.idle()
    }

    /// Transceiver state, for inspecting the receive-side flags.
    pub fn uart(&self) -> &Uart {
        &self.uart
    }
}
