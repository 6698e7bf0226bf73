// Helpers shared by the integration test binaries. The source lives next to
// the unit tests so both suites use the same copy.
#![allow(dead_code)]

#[path = "../../src/test_util.rs"]
mod test_util;

pub use test_util::{init_test_logger, recording, WORDS};
