use std::fmt::Display;

/// Target that execution trace events are emitted under.
pub const TRACE_TARGET: &str = "sprout::trace";

/// Execution tracer owned by an interpreter. When enabled it emits one `TRACE` event per
/// evaluated statement, indented by block nesting.
#[derive(Debug, Clone, Default)]
pub struct Tracer {
    enabled: bool,
    indent: usize,
}

impl Tracer {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn enabled() -> Self {
        Self {
            enabled: true,
            indent: 0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        self.indent = 0;
    }

    pub fn get_indent(&self) -> usize {
        self.indent
    }

    pub fn trace(&self, message: impl Display) {
        if self.enabled {
            let padding = " ".repeat(self.indent * 2);
            tracing::trace!(target: TRACE_TARGET, "{}{}", padding, message);
        }
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }
}

/// Runs a closure under a subscriber that records every event as text.
#[cfg(test)]
pub(crate) fn capture_events(run: impl FnOnce()) -> String {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .without_time()
        .with_writer(move || writer.clone())
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
