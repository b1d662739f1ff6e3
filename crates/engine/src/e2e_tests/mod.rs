//! Scenario tests for the starting equipment flow.
//!
//! These tests drive the complete `App` against the bundled sample library:
//! render a class and a background, act on the controls the way the wizard
//! would, then collect picks and wealth.
//!
//! ```bash
//! cargo test -p outfitter-engine --lib e2e_tests
//! ```

mod e2e_helpers;

pub use e2e_helpers::*;
