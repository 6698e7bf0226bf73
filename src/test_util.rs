// Helpers shared by the unit tests and, through `#[path]`, by the
// integration test binaries.

use std::cell::RefCell;
use std::rc::Rc;

pub const WORDS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eigth", "ninth", "tentn",
];

/// Route `log` output through the test harness; safe to call repeatedly.
pub fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

/// A destructor that records every value it receives, in order.
pub fn recording<V: 'static>() -> (Rc<RefCell<Vec<V>>>, impl FnMut(V) + 'static) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = log.clone();
    (log, move |v| sink.borrow_mut().push(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_call_order() {
        let (log, mut sink) = recording();
        sink(3);
        sink(1);
        sink(2);
        assert_eq!(*log.borrow(), [3, 1, 2]);
    }
}
