//! Environment probe implementations

use std::collections::HashMap;
use std::path::Path;

/// Read-only view of the process environment
///
/// Implementations:
/// - `ProcessEnvProbe`: reads the real process environment
/// - `MemoryEnvProbe`: in-memory for testing
pub trait EnvProbe: Send + Sync {
    /// Read a variable; empty values are treated as unset
    fn get(&self, name: &str) -> Option<String>;

    /// Check whether a file exists and is readable
    fn file_readable(&self, path: &Path) -> bool;
}

/// Probe backed by the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvProbe;

impl ProcessEnvProbe {
    /// Create a new process environment probe
    pub fn new() -> Self {
        Self
    }
}

impl EnvProbe for ProcessEnvProbe {
    fn get(&self, name: &str) -> Option<String> {
        match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        }
    }

    fn file_readable(&self, path: &Path) -> bool {
        std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
    }
}

/// In-memory probe for testing
#[derive(Debug, Default)]
pub struct MemoryEnvProbe {
    vars: HashMap<String, String>,
    readable_files: Vec<std::path::PathBuf>,
}

impl MemoryEnvProbe {
    /// Create an empty probe
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Mark a path as an existing readable file
    pub fn with_readable_file(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.readable_files.push(path.into());
        self
    }
}

impl EnvProbe for MemoryEnvProbe {
    fn get(&self, name: &str) -> Option<String> {
        self.vars
            .get(name)
            .filter(|v| !v.trim().is_empty())
            .cloned()
    }

    fn file_readable(&self, path: &Path) -> bool {
        self.readable_files.iter().any(|p| p == path)
    }
}
