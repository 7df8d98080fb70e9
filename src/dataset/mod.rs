pub use self::conll::*;

mod conll;
