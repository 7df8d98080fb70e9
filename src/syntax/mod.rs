pub use self::parser::{Model, ShiftReduceParser};

pub mod oracle;
mod parser;
pub mod transition;
