use std::rc::Rc;

/// Read-only word array addressed by the memory-printing tasks.
///
/// Words are at most 16 bits wide; narrower contents simply leave the upper
/// bits clear. There is no write path: the simulation treats backing
/// storage as preloaded.
pub trait Memory {
    fn len(&self) -> usize;

    /// Word at `addr`. Callers guarantee `addr < len()`.
    fn word(&self, addr: usize) -> u16;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Memory for Vec<u16> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn word(&self, addr: usize) -> u16 {
        self[addr]
    }
}

impl Memory for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn word(&self, addr: usize) -> u16 {
        u16::from(self[addr])
    }
}

/// Byte memory holding `text`, for wiring a string to a text printer.
pub fn from_text(text: &str) -> Rc<dyn Memory> {
    Rc::new(text.as_bytes().to_vec())
}

/// Registered read port over a [`Memory`].
///
/// `data` holds the word fetched for the address presented on the previous
/// tick, which is the one-tick fetch latency the printing tasks wait out in
/// their fetch states.
#[derive(Debug, Default)]
pub(crate) struct ReadPort {
    data: u16,
}

impl ReadPort {
    #[inline]
    pub(crate) fn data(&self) -> u16 {
        self.data
    }

    pub(crate) fn tick(&mut self, mem: &dyn Memory, addr: usize) {
        self.data = mem.word(addr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_memory_exposes_bytes_as_words() {
        let mem = from_text("Hi\0");
        assert_eq!(mem.len(), 3);
        assert_eq!(mem.word(0), u16::from(b'H'));
        assert_eq!(mem.word(2), 0);
    }

    #[test]
    fn read_port_lags_the_address_by_one_tick() {
        let mem: Vec<u16> = vec![0xaaaa, 0xbbbb, 0xcccc];
        let mut port = ReadPort::default();
        assert_eq!(port.data(), 0);
        port.tick(&mem, 1);
        assert_eq!(port.data(), 0xbbbb);
        port.tick(&mem, 2);
        assert_eq!(port.data(), 0xcccc);
    }

    #[test]
    fn word_vec_reports_len() {
        let mem: Vec<u16> = vec![1, 2, 3, 4];
        assert_eq!(Memory::len(&mem), 4);
        assert!(!Memory::is_empty(&mem));
    }
}
