use std::fs::{File, OpenOptions};
use std::io as std_io;
use std::path::Path;

pub use slog::FilterLevel as Level;
use slog::{Discard, Drain, Duplicate, Fuse, Level as LogLevel, LevelFilter, Logger, OwnedKV,
           SendSyncRefUnwindSafeKV};
use slog_async::Async;
use slog_term::{CompactFormat, Decorator, FullFormat, PlainDecorator, TermDecorator};

#[derive(Debug)]
pub enum Stream {
    StdOut,
    StdErr,
    File(File),
    Null,
}

impl Stream {
    pub fn is_null(&self) -> bool {
        match *self {
            Stream::Null => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Full,
    Compact,
}

#[derive(Debug)]
pub struct LoggerBuilder {
    stream: Stream,
    level: Level,
    format: Format,
}

impl LoggerBuilder {
    pub fn new(stream: Stream) -> Self {
        LoggerBuilder {
            stream: stream,
            level: Level::Debug,
            format: Format::Full,
        }
    }

    pub fn level(mut self, l: Level) -> Self {
        self.level = l;
        self
    }

    pub fn format(mut self, f: Format) -> Self {
        self.format = f;
        self
    }

    pub fn build<T>(self, values: OwnedKV<T>) -> Logger
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        match self.build_drain() {
            Some(drain) => Logger::root(drain.fuse(), values),
            None => Logger::root(Discard, values),
        }
    }

    pub fn build_with<T>(self, other: LoggerBuilder, values: OwnedKV<T>) -> Logger
    where
        T: SendSyncRefUnwindSafeKV + 'static,
    {
        match (self.build_drain(), other.build_drain()) {
            (Some(d1), Some(d2)) => Logger::root(Duplicate::new(d1, d2).fuse(), values),
            (Some(d1), None) => Logger::root(d1.fuse(), values),
            (None, Some(d2)) => Logger::root(d2.fuse(), values),
            (None, None) => Logger::root(Discard, values),
        }
    }

    fn build_drain(&self) -> Option<LevelFilter<Fuse<Async>>> {
        match self.level {
            Level::Off => {
                return None;
            }
            _ => {}
        }
        match self.stream {
            Stream::StdOut => {
                Some(self.build_drain_from_decorator(
                    TermDecorator::new().stdout().build(),
                ))
            }
            Stream::StdErr => {
                Some(self.build_drain_from_decorator(
                    TermDecorator::new().stderr().build(),
                ))
            }
            Stream::File(ref f) => {
                Some(self.build_drain_from_decorator(
                    PlainDecorator::new(f.try_clone().unwrap()),
                ))
            }
            Stream::Null => None,
        }
    }

    fn build_drain_from_decorator<D: Decorator + Send + 'static>(
        &self,
        decorator: D,
    ) -> LevelFilter<Fuse<Async>> {
        let drain = match self.format {
            Format::Compact => {
                let drain = CompactFormat::new(decorator).use_local_timestamp().build();
                Async::new(drain.fuse()).build()
            }
            Format::Full => {
                let drain = FullFormat::new(decorator).use_local_timestamp().build();
                Async::new(drain.fuse()).build()
            }
        };
        LevelFilter::new(
            drain.fuse(),
            LogLevel::from_usize(self.level.as_usize()).unwrap(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub level: Level,
    pub verbosity: Level,
    pub file: Option<String>,
    pub format: Format,
    pub use_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            level: Level::Off,
            verbosity: Level::Info,
            file: None,
            format: Format::Full,
            use_stderr: false,
        }
    }
}

/// Creates a logger that writes to the terminal and optionally to a file.
pub fn create_logger<C: Into<Config>>(config: C) -> Result<Logger, std_io::Error> {
    let c = config.into();
    let fstream = match c.level {
        Level::Off => Stream::Null,
        _ => {
            match c.file {
                Some(ref path) => Stream::File(open_log_file(path)?),
                None => Stream::Null,
            }
        }
    };
    let vstream = if c.use_stderr {
        Stream::StdErr
    } else {
        Stream::StdOut
    };
    let logger = LoggerBuilder::new(vstream)
        .level(c.verbosity)
        .format(c.format)
        .build_with(
            LoggerBuilder::new(fstream).level(c.level).format(c.format),
            o!(),
        );
    Ok(logger)
}

/// Creates a logger that discards every record.
pub fn null_logger() -> Logger {
    LoggerBuilder::new(Stream::Null).build(o!())
}

fn open_log_file<P: AsRef<Path>>(path: P) -> Result<File, std_io::Error> {
    OpenOptions::new().create(true).append(true).open(path)
}
