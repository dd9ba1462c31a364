mod dispatch;
mod edge;
pub mod machine;
pub mod mem;
mod signal;
pub mod task;
pub mod tasks;
pub mod uart;
pub mod wire;

pub use dispatch::CommandSet;
pub use edge::Edge;
pub use machine::{Machine, MachineConfig};
pub use mem::{from_text, Memory};
pub use signal::Signal;
pub use task::{Task, TaskInputs, TaskOutputs};
pub use uart::{Received, RxFlags, Uart, UartInputs};
pub use wire::{LineDriver, LineProbe};
