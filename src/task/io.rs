//! Descriptor parsing and file I/O.

use super::TaskDescriptor;
use crate::error::{ForgeError, Result};
use std::path::Path;

impl TaskDescriptor {
    /// Load a descriptor from disk.
    ///
    /// Unreadable files and schema violations are both `DescriptorMalformed`
    /// so the orchestrator can skip the task and move on.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| malformed(path, e))?;
        Self::parse(&content).map_err(|e| match e {
            ForgeError::DescriptorMalformed { reason, .. } => malformed(path, reason),
            other => other,
        })
    }

    /// Parse a descriptor from JSON text.
    pub fn parse(content: &str) -> Result<Self> {
        let descriptor: TaskDescriptor =
            serde_json::from_str(content).map_err(|e| malformed("<inline>", e))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Reject values the backend could never accept.
    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(malformed(
                "<inline>",
                format!("dimensions must be positive (found {}x{})", self.width, self.height),
            ));
        }
        if self.steps == 0 {
            return Err(malformed("<inline>", "steps must be greater than 0"));
        }
        if !self.cfg_scale.is_finite() || self.cfg_scale < 0.0 {
            return Err(malformed(
                "<inline>",
                format!("cfg_scale must be a non-negative number (found {})", self.cfg_scale),
            ));
        }
        Ok(())
    }
}

fn malformed(path: impl AsRef<Path>, reason: impl ToString) -> ForgeError {
    ForgeError::DescriptorMalformed {
        path: path.as_ref().display().to_string(),
        reason: reason.to_string(),
    }
}
