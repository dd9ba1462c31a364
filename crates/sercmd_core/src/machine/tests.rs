use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Machine, MachineConfig};
use crate::dispatch::CommandSet;
use crate::mem::{from_text, Memory};
use crate::signal::Signal;
use crate::tasks::{
    BinaryMemoryPrinter, BinarySignalPrinter, DecimalSignalPrinter, TextMemoryPrinter, Toggler,
    Trigger,
};
use crate::wire::{LineDriver, LineProbe};

fn config() -> MachineConfig {
    MachineConfig::builder().divisor(8).build()
}

fn wire_for(machine: &Machine) -> (LineDriver, LineProbe) {
    let divisor = machine.uart().divisor();
    let data_bits = machine.uart().data_bits();
    (
        LineDriver::with_data_bits(divisor, data_bits),
        LineProbe::with_data_bits(divisor, data_bits),
    )
}

fn run(
    machine: &mut Machine,
    driver: &mut LineDriver,
    probe: &mut LineProbe,
    ticks: u32,
) -> Vec<u8> {
    let mut output = Vec::new();
    for _ in 0..ticks {
        let line = driver.tick();
        let tx = machine.step(line);
        if let Some(byte) = probe.tick(tx) {
            output.push(byte);
        }
    }
    output
}

#[test]
fn toggler_toggles_over_the_wire() {
    let toggler = Toggler::new();
    let out = toggler.output();
    let mut commands = CommandSet::new();
    commands.insert(b't', Box::new(toggler));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_byte(b't');
    let output = run(&mut machine, &mut driver, &mut probe, 2_000);
    assert!(output.is_empty());
    assert!(out.get());
    assert!(machine.quiescent());

    driver.push_byte(b't');
    run(&mut machine, &mut driver, &mut probe, 2_000);
    assert!(!out.get());
}

#[test]
fn trigger_pulses_feed_a_counter() {
    let trigger = Trigger::new();
    let pulse = trigger.output();
    let mut commands = CommandSet::new();
    commands.insert(b'+', Box::new(trigger));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_bytes(b"+++");
    let mut counter = 0u16;
    for _ in 0..4_000 {
        let line = driver.tick();
        let tx = machine.step(line);
        probe.tick(tx);
        if pulse.get() {
            counter += 1;
        }
    }
    assert_eq!(counter, 3);
    assert!(machine.quiescent());
}

#[test]
fn decimal_print_over_the_wire() {
    let counter = Signal::new(128u16);
    let mut commands = CommandSet::new();
    commands.insert(b'\n', Box::new(DecimalSignalPrinter::new(counter, 8)));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_byte(b'\n');
    let output = run(&mut machine, &mut driver, &mut probe, 10_000);
    assert_eq!(output, b"128");
}

#[test]
fn binary_print_over_the_wire() {
    let value = Signal::new(0b10101u16);
    let mut commands = CommandSet::new();
    commands.insert(b'b', Box::new(BinarySignalPrinter::new(value, 5)));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_byte(b'b');
    let output = run(&mut machine, &mut driver, &mut probe, 10_000);
    assert_eq!(output, b"10101");
}

#[test]
fn help_text_over_the_wire() {
    let mut commands = CommandSet::new();
    commands.insert(b'h', Box::new(TextMemoryPrinter::new(from_text("ok\0"), 3)));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_byte(b'h');
    let output = run(&mut machine, &mut driver, &mut probe, 10_000);
    assert_eq!(output, b"ok\n");
    assert!(machine.quiescent());
}

#[test]
fn memory_dump_over_the_wire() {
    let mem: Rc<dyn Memory> = Rc::new(vec![0b0001u16, 0b0110, 0b1001, 0b1000]);
    let mut commands = CommandSet::new();
    commands.insert(b'm', Box::new(BinaryMemoryPrinter::new(mem, 4, 4)));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_byte(b'm');
    let output = run(&mut machine, &mut driver, &mut probe, 20_000);
    assert_eq!(output, b"1000011010010001");
}

#[test]
fn second_command_queues_behind_the_first() {
    let toggler = Toggler::new();
    let out = toggler.output();
    let mut commands = CommandSet::new();
    commands.insert(b'h', Box::new(TextMemoryPrinter::new(from_text("ok\0"), 3)));
    commands.insert(b't', Box::new(toggler));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_bytes(b"ht");
    let output = run(&mut machine, &mut driver, &mut probe, 20_000);
    assert_eq!(output, b"ok\n");
    assert!(out.get());
    assert!(machine.quiescent());
}

#[test]
fn unknown_bytes_are_dropped() {
    let mut commands = CommandSet::new();
    commands.insert(b'h', Box::new(TextMemoryPrinter::new(from_text("ok\0"), 3)));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    driver.push_bytes(b"qh");
    let output = run(&mut machine, &mut driver, &mut probe, 20_000);
    assert_eq!(output, b"ok\n");
    assert!(machine.quiescent());
}

#[test]
fn third_back_to_back_command_overflows() {
    let mut commands = CommandSet::new();
    commands.insert(b'h', Box::new(TextMemoryPrinter::new(from_text("ok\0"), 3)));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    // The first byte dispatches immediately, the second waits its turn,
    // and the third lands while the second is still unacknowledged.
    driver.push_bytes(b"hhh");
    let output = run(&mut machine, &mut driver, &mut probe, 40_000);
    assert_eq!(output, b"ok\nok\n");
    assert!(machine.uart().rx_ovf());
}

#[test]
fn soak_random_increment_decrement_stream() {
    let increment = Trigger::new();
    let decrement = Trigger::new();
    let inc = increment.output();
    let dec = decrement.output();
    let mut commands = CommandSet::new();
    commands.insert(b'+', Box::new(increment));
    commands.insert(b'-', Box::new(decrement));
    let mut machine = Machine::new(config(), commands);
    let (mut driver, mut probe) = wire_for(&machine);

    let mut rng = StdRng::seed_from_u64(0xc0ffee);
    let mut expected = 0u8;
    for _ in 0..40 {
        if rng.gen::<bool>() {
            driver.push_byte(b'+');
            expected = expected.wrapping_add(1);
        } else {
            driver.push_byte(b'-');
            expected = expected.wrapping_sub(1);
        }
    }

    let mut counter = 0u8;
    for _ in 0..40_000 {
        let line = driver.tick();
        let tx = machine.step(line);
        probe.tick(tx);
        if inc.get() {
            counter = counter.wrapping_add(1);
        } else if dec.get() {
            counter = counter.wrapping_sub(1);
        }
    }
    assert_eq!(counter, expected);
    assert!(machine.quiescent());
}
