//! Crafting-table calculator
//!
//! - `eval`: the flat four-operator expression evaluator
//! - `keypad`: the on-screen keypad state machine that feeds it

mod eval;
mod keypad;

pub use eval::{ERROR_MARKER, EvalError, evaluate, format_number, try_evaluate};
pub use keypad::{Key, Keypad};
