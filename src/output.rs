//! output
//!
//! Diagnostic output stream for usage, help, and listings.
//!
//! # Design
//!
//! All text the resolver produces goes through an [`Output`]. It defaults to
//! stderr; tests swap in [`Output::buffer`] and read the captured text back.

use std::fmt::{self, Display};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
enum Sink {
    Stderr,
    Stdout,
    Buffer(Arc<Mutex<Vec<u8>>>),
    Writer(Arc<Mutex<Box<dyn Write + Send>>>),
}

/// A cloneable handle to the diagnostic output stream.
#[derive(Clone)]
pub struct Output {
    sink: Sink,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Output {
    pub fn stderr() -> Self {
        Self { sink: Sink::Stderr }
    }

    pub fn stdout() -> Self {
        Self { sink: Sink::Stdout }
    }

    /// Capture output in memory; read it with [`Output::contents`].
    pub fn buffer() -> Self {
        Self {
            sink: Sink::Buffer(Arc::new(Mutex::new(Vec::new()))),
        }
    }

    pub fn from_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            sink: Sink::Writer(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// Text captured so far. Always empty unless created with [`Output::buffer`].
    pub fn contents(&self) -> String {
        match &self.sink {
            Sink::Buffer(buf) => String::from_utf8_lossy(&lock(buf)).into_owned(),
            _ => String::new(),
        }
    }

    /// Write `text` as-is.
    pub fn write_str(&self, text: &str) -> io::Result<()> {
        match &self.sink {
            Sink::Stderr => io::stderr().lock().write_all(text.as_bytes()),
            Sink::Stdout => io::stdout().lock().write_all(text.as_bytes()),
            Sink::Buffer(buf) => {
                lock(buf).extend_from_slice(text.as_bytes());
                Ok(())
            }
            Sink::Writer(writer) => {
                let mut writer = lock(writer);
                writer.write_all(text.as_bytes())?;
                writer.flush()
            }
        }
    }

    /// Write `text` followed by a newline.
    pub fn write_line(&self, text: impl Display) -> io::Result<()> {
        self.write_str(&format!("{}\n", text))
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.sink {
            Sink::Stderr => "stderr",
            Sink::Stdout => "stdout",
            Sink::Buffer(_) => "buffer",
            Sink::Writer(_) => "writer",
        };
        f.debug_tuple("Output").field(&kind).finish()
    }
}

/// Print an error message to stderr (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_captures_across_clones() {
        let out = Output::buffer();
        let clone = out.clone();

        out.write_str("one ").unwrap();
        clone.write_line("two").unwrap();

        assert_eq!(out.contents(), "one two\n");
    }

    #[test]
    fn non_buffer_contents_are_empty() {
        assert_eq!(Output::stderr().contents(), "");
    }

    #[test]
    fn writer_receives_text() {
        #[derive(Clone, Default)]
        struct Shared(Arc<Mutex<Vec<u8>>>);

        impl Write for Shared {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let shared = Shared::default();
        let out = Output::from_writer(shared.clone());
        out.write_line("hello").unwrap();

        assert_eq!(&*shared.0.lock().unwrap(), b"hello\n");
    }

    #[test]
    fn stdout_writes_and_captures_nothing() {
        let out = Output::stdout();

        out.write_str("").unwrap();

        assert_eq!(out.contents(), "");
    }
}
