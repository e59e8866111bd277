// src/env/sink.rs

//! Output sinks: where a decorated line finally goes.

use crate::format::{host, Arg};
use crate::utils::error::Result;
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Receives the fully decorated argument list of one debug call.
///
/// Sinks must keep the argument order. Only [`ConsoleSink`] reads the first
/// element as a template; the others print the list as it is.
pub trait Sink: Send + Sync {
    fn write(&self, line: &[String]) -> Result<()>;
}

/// Writes each call as one space-joined line to standard error.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl Sink for StderrSink {
    fn write(&self, line: &[String]) -> Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{}", line.join(" "))?;
        Ok(())
    }
}

/// Writes each call as one space-joined line to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl Sink for StdoutSink {
    fn write(&self, line: &[String]) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}", line.join(" "))?;
        Ok(())
    }
}

/// Writes to any `Write` implementation, flushing after each line.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write(&self, line: &[String]) -> Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", line.join(" "))?;
        writer.flush()?;
        Ok(())
    }
}

/// Prints console argument lists as plain text.
///
/// The first element is a template; `%c` consumes its CSS declaration and
/// prints nothing, other directives resolve as [`host::render`] does.
#[derive(Debug)]
pub struct ConsoleSink<W = Stdout> {
    writer: Mutex<W>,
}

impl ConsoleSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<W: Write + Send> Sink for ConsoleSink<W> {
    fn write(&self, line: &[String]) -> Result<()> {
        let args: Vec<Arg> = line.iter().cloned().map(Arg::Str).collect();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writeln!(writer, "{}", host::render(&args))?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps every call in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The argument lists received so far.
    pub fn records(&self) -> Vec<Vec<String>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The received calls joined into lines, as a console would print them.
    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(|r| r.join(" ")).collect()
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Sink for MemorySink {
    fn write(&self, line: &[String]) -> Result<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_shares_buffer() {
        let sink = MemorySink::new();
        let handle = sink.clone();
        sink.write(&["a".to_owned(), "b".to_owned()]).unwrap();
        assert_eq!(handle.records(), vec![vec!["a".to_owned(), "b".to_owned()]]);
        assert_eq!(handle.lines(), vec!["a b".to_owned()]);
        handle.clear();
        assert!(sink.records().is_empty());
    }

    #[test]
    fn test_writer_sink_appends_lines() {
        let sink = WriterSink::new(Vec::new());
        sink.write(&["one".to_owned()]).unwrap();
        sink.write(&["two".to_owned(), "three".to_owned()]).unwrap();
        assert_eq!(sink.into_inner(), b"one\ntwo three\n");
    }

    #[test]
    fn test_console_sink_consumes_styles() {
        let sink = ConsoleSink::new(Vec::new());
        let line = [
            "%cdb %cslow query%c +3ms".to_owned(),
            "color: #4363d8".to_owned(),
            "color: inherit".to_owned(),
            "color: #4363d8".to_owned(),
        ];
        sink.write(&line).unwrap();
        sink.write(&["100%% done".to_owned()]).unwrap();
        assert_eq!(sink.into_inner(), b"db slow query +3ms\n100% done\n");
    }
}
