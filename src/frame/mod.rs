//! Stack frames and the identity policy that makes them aggregatable.
//!
//! A raw [`StackFrame`] carries everything a recorder captured about one
//! call site. The [`FramePolicy`] decides which of those attributes count
//! when two frames should collapse into the same tree node.

pub mod identity;

use serde::{Deserialize, Serialize};

// Re-export main types
pub use identity::{CategorizationMode, FrameIdentity, FramePolicy};

/// A raw call-site entry from a recorded stack trace
///
/// **Public** - this is the input frame shape consumed by the tree builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StackFrame {
    /// Fully qualified declaring type (e.g. "com.example.net.Server")
    pub type_name: String,

    /// Method name
    pub method: String,

    /// Method signature, if the recorder captured one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,

    /// Source line, if the recorder captured one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl StackFrame {
    /// Create a frame with just a type and method
    ///
    /// **Public** - convenience constructor, mainly for tests and producers
    pub fn new(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            method: method.into(),
            signature: None,
            line: None,
        }
    }

    /// Same frame with a source line attached
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    /// Same frame with a signature attached
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Package portion of the declaring type (everything before the last dot)
    ///
    /// Returns an empty string for unqualified type names.
    pub fn package(&self) -> &str {
        match self.type_name.rfind('.') {
            Some(idx) => &self.type_name[..idx],
            None => "",
        }
    }
}
