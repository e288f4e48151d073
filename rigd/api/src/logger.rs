use log::Level;

/// Logger handed to landmark sources so their output is attributed to them.
#[derive(Debug, Clone)]
pub struct SourceLogger {
    target: String,
}

impl SourceLogger {
    pub fn new(source_name: &str) -> Self {
        Self {
            target: format!("rigd::sources::{}", source_name),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn error(&self, message: &str) {
        self.log(Level::Error, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(Level::Warn, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::Debug, message);
    }

    pub fn trace(&self, message: &str) {
        self.log(Level::Trace, message);
    }

    fn log(&self, level: Level, message: &str) {
        log::log!(target: self.target.as_str(), level, "{}", message);
    }
}
