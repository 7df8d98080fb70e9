use std::io as std_io;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json;

#[derive(Debug, Clone, Copy)]
pub enum Format {
    Json,
    JsonPretty,
}

pub fn serialize<T: Serialize>(data: &T, format: Format) -> std_io::Result<Vec<u8>> {
    let result = match format {
        Format::Json => serde_json::to_string(data),
        Format::JsonPretty => serde_json::to_string_pretty(data),
    };
    match result {
        Ok(s) => Ok(s.into_bytes()),
        Err(e) => Err(std_io::Error::new(std_io::ErrorKind::InvalidData, e)),
    }
}

pub fn deserialize<T: DeserializeOwned>(bytes: &[u8], format: Format) -> std_io::Result<T> {
    match format {
        Format::Json | Format::JsonPretty => {
            serde_json::from_slice(bytes).map_err(|e| {
                std_io::Error::new(std_io::ErrorKind::InvalidData, e)
            })
        }
    }
}

/// Writes/reads one serialized item per line.
pub struct Serializer<IO, T> {
    _phantom: PhantomData<T>,
    inner: IO,
}

impl<IO, T> Serializer<IO, T> {
    pub fn new(io: IO) -> Self {
        Serializer {
            _phantom: PhantomData,
            inner: io,
        }
    }

    pub fn inner(&self) -> &IO {
        &self.inner
    }
}

impl<T: Serialize, IO: std_io::Write> Serializer<IO, T> {
    pub fn write(&mut self, buf: &[T]) -> std_io::Result<usize> {
        for item in buf {
            let mut bytes = serialize(item, Format::Json)?;
            bytes.push(b'\n');
            self.inner.write_all(&bytes)?;
        }
        Ok(buf.len())
    }

    pub fn flush(&mut self) -> std_io::Result<()> {
        self.inner.flush()
    }
}

impl<T: DeserializeOwned, IO: std_io::BufRead> Serializer<IO, T> {
    pub fn read(&mut self, buf: &mut Vec<T>) -> std_io::Result<usize> {
        let mut count = 0;
        let mut line = String::new();
        loop {
            match self.inner.read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {
                    let trimmed = line.trim_right();
                    if !trimmed.is_empty() {
                        buf.push(deserialize(trimmed.as_bytes(), Format::Json)?);
                        count += 1;
                    }
                }
                Err(ref e) if e.kind() == std_io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
            line.clear();
        }
        Ok(count)
    }
}
