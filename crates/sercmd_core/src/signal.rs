use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared single-value wire between a task and user-level logic.
///
/// Cloning yields another handle onto the same value, so a `Toggler` can
/// flip a bit that the caller's per-tick logic reads, or a printer can
/// snapshot a counter the caller keeps updating. The simulation is
/// single-threaded, which keeps this a plain `Rc<Cell<T>>`.
pub struct Signal<T: Copy> {
    cell: Rc<Cell<T>>,
}

impl<T: Copy> Signal<T> {
    pub fn new(value: T) -> Self {
        Signal {
            cell: Rc::new(Cell::new(value)),
        }
    }

    #[inline]
    pub fn get(&self) -> T {
        self.cell.get()
    }

    #[inline]
    pub fn set(&self, value: T) {
        self.cell.set(value);
    }
}

impl<T: Copy> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Signal {
            cell: Rc::clone(&self.cell),
        }
    }
}

impl<T: Copy + Default> Default for Signal<T> {
    fn default() -> Self {
        Signal::new(T::default())
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Signal").field(&self.get()).finish()
    }
}
