use std::rc::Rc;

use anyhow::Result;

use sercmd_console::{Session, StdioConsole};
use sercmd_core::tasks::{
    BinaryMemoryPrinter, BinarySignalPrinter, DecimalSignalPrinter, TextMemoryPrinter, Toggler,
    Trigger,
};
use sercmd_core::{from_text, CommandSet, MachineConfig, Memory, Signal};

/// Backstop for a single session, a few hundred thousand commands' worth
/// of ticks. Exhausting it means a handler wedged.
const RUN_BUDGET: u64 = 500_000_000;

const HELP_TEXT: &str = "+/-: count up or down\n\
                         newline: print the counter in decimal\n\
                         b: print the counter in binary\n\
                         t: flip the marker bit\n\
                         m: dump the sample table\n\
                         h: this text\0";

/// The first eight squares, as 12-bit words for the dump command.
fn sample_table() -> Rc<dyn Memory> {
    Rc::new((1..=8u16).map(|n| n * n).collect::<Vec<u16>>())
}

/// Run the playground machine over standard input and output.
///
/// An eight-bit counter hangs off the command set: `+` and `-` step it,
/// newline prints it in decimal, `b` in binary. `t` flips a marker bit,
/// `m` dumps a small word table and `h` prints the help text.
pub fn run(divisor: u16) -> Result<()> {
    let config = MachineConfig::builder().divisor(divisor).build();

    let counter = Signal::new(0u16);
    let increment = Trigger::new();
    let decrement = Trigger::new();
    let toggler = Toggler::new();
    let inc = increment.output();
    let dec = decrement.output();
    let marker = toggler.output();

    let mut commands = CommandSet::new();
    commands.insert(b'+', Box::new(increment));
    commands.insert(b'-', Box::new(decrement));
    commands.insert(b'\n', Box::new(DecimalSignalPrinter::new(counter.clone(), 8)));
    commands.insert(b'b', Box::new(BinarySignalPrinter::new(counter.clone(), 8)));
    commands.insert(b't', Box::new(toggler));
    commands.insert(
        b'h',
        Box::new(TextMemoryPrinter::new(from_text(HELP_TEXT), HELP_TEXT.len())),
    );
    commands.insert(b'm', Box::new(BinaryMemoryPrinter::new(sample_table(), 12, 8)));

    let mut session = Session::new(config, commands);
    let mut console = StdioConsole::from_stdin()?;

    let mut marker_last = false;
    let used = session.run_with(&mut console, RUN_BUDGET, || {
        if inc.get() {
            counter.set(counter.get().wrapping_add(1) & 0xff);
        } else if dec.get() {
            counter.set(counter.get().wrapping_sub(1) & 0xff);
        }
        if marker.get() != marker_last {
            marker_last = marker.get();
            log::info!(
                "marker bit now {}",
                if marker_last { "set" } else { "clear" }
            );
        }
    })?;

    log::info!("session drained after {} ticks", used);
    Ok(())
}
