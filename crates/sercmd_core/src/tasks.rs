//! The built-in command handlers.

mod binary;
mod decimal;
mod text;
mod toggler;
mod trigger;

pub use binary::{BinaryMemoryPrinter, BinarySignalPrinter};
pub use decimal::DecimalSignalPrinter;
pub use text::TextMemoryPrinter;
pub use toggler::Toggler;
pub use trigger::Trigger;

/// Low `width` bits set; clips sampled words to their declared width.
fn word_mask(width: u8) -> u16 {
    ((1u32 << width) - 1) as u16
}

#[cfg(test)]
pub(crate) mod support {
    use crate::task::{Task, TaskInputs};

    /// Drive `task` against a model of the transmitter handshake until its
    /// done pulse, collecting every byte it hands over.
    ///
    /// The model acknowledges while idle, captures `tx_data` on the tick it
    /// sees `tx_rdy`, then holds the acknowledge low for a few ticks as a
    /// real transmitter would while the frame shifts out.
    pub(crate) fn run_to_done(task: &mut dyn Task, max_ticks: u32) -> Vec<u8> {
        run_to_done_with(task, max_ticks, |_| {})
    }

    pub(crate) fn run_to_done_with(
        task: &mut dyn Task,
        max_ticks: u32,
        mut on_tick: impl FnMut(u32),
    ) -> Vec<u8> {
        let mut sent = Vec::new();
        let mut busy: u8 = 0;
        for tick in 0..max_ticks {
            let outs = task.outputs();
            if outs.done {
                return sent;
            }
            let ack = busy == 0;
            if ack && outs.tx_rdy {
                sent.push(outs.tx_data);
                busy = 6;
            } else if !ack {
                busy -= 1;
            }
            task.tick(TaskInputs {
                start: tick == 0,
                tx_ack: ack,
            });
            on_tick(tick);
        }
        panic!("task never signalled done; sent so far: {:?}", sent);
    }
}
