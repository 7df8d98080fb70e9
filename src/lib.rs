#[macro_use]
extern crate slog;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_json;
extern crate slog_async;
extern crate slog_term;

pub mod dataset;
pub mod features;
pub mod io;
pub mod logging;
pub mod syntax;
pub mod tree;
