use super::SystemContext;

/// Writes printed values straight to standard output.
pub struct StdioContext;

impl SystemContext for StdioContext {
    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }
}

/// Collects printed values in memory, one line each.
#[derive(Debug, Default)]
pub struct BufferedContext {
    buffer: String,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Hands out everything written so far and empties the buffer.
    pub fn take_data(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }

    pub fn into_data(self) -> String {
        self.buffer
    }
}

impl SystemContext for BufferedContext {
    fn writeln(&mut self, text: &str) {
        self.buffer.push_str(text);
        self.buffer.push('\n');
    }
}

impl<C: SystemContext + ?Sized> SystemContext for &mut C {
    fn writeln(&mut self, text: &str) {
        (**self).writeln(text);
    }
}
