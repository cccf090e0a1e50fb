//! Canonical frame identity under a categorization mode.
//!
//! Two raw frames are interchangeable for aggregation iff their
//! [`FrameIdentity`] values are equal. The identity label doubles as the
//! human-readable node name in serialized trees, so every attribute that
//! distinguishes identities is visible in the label.

use super::StackFrame;
use crate::utils::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// How frames are grouped into identities
///
/// **Public** - selected via CLI/config; unrecognized names are a
/// configuration error raised at policy construction, never mid-build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategorizationMode {
    /// Declaring type + method signature + source line
    Line,
    /// Declaring type + method signature
    Method,
    /// Declaring type only
    Class,
    /// Package of the declaring type only
    Package,
}

impl FromStr for CategorizationMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "method" => Ok(Self::Method),
            "class" => Ok(Self::Class),
            "package" => Ok(Self::Package),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for CategorizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Line => "line",
            Self::Method => "method",
            Self::Class => "class",
            Self::Package => "package",
        };
        write!(f, "{}", name)
    }
}

/// Canonical, value-equal representation of a frame under one mode
///
/// The label fully encodes the mode's distinguishing attributes, so label
/// equality is identity equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameIdentity {
    label: String,
}

impl FrameIdentity {
    /// Human-readable label, used as the node name in serialized trees
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Stable 64-bit FNV-1a hash of the identity
    ///
    /// Used by the tree builder to combine path identities into node ids.
    /// Deliberately independent of `std::hash` so ids are reproducible
    /// across runs and platforms.
    pub fn hash64(&self) -> u64 {
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for b in self.label.as_bytes() {
            hash ^= *b as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        hash
    }
}

impl fmt::Display for FrameIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Pure policy mapping raw frames to identities
///
/// **Public** - passed alongside samples to every build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePolicy {
    mode: CategorizationMode,
    collapse_recursion: bool,
}

impl FramePolicy {
    /// Construct a policy from a mode name
    ///
    /// # Errors
    /// * `ConfigError::UnknownMode` - the mode string is not recognized
    pub fn new(mode: &str, collapse_recursion: bool) -> Result<Self, ConfigError> {
        Ok(Self {
            mode: mode.parse()?,
            collapse_recursion,
        })
    }

    /// Construct a policy from an already-validated mode
    pub fn from_mode(mode: CategorizationMode, collapse_recursion: bool) -> Self {
        Self {
            mode,
            collapse_recursion,
        }
    }

    /// The categorization mode this policy applies
    pub fn mode(&self) -> CategorizationMode {
        self.mode
    }

    /// Whether direct recursive self-calls fold into one node
    pub fn collapse_recursion(&self) -> bool {
        self.collapse_recursion
    }

    /// Compute the identity of a raw frame under this policy
    ///
    /// Pure: identical frame content always yields identity-equal results.
    pub fn identity_of(&self, frame: &StackFrame) -> FrameIdentity {
        let label = match self.mode {
            CategorizationMode::Package => {
                let pkg = frame.package();
                if pkg.is_empty() {
                    "<default>".to_string()
                } else {
                    pkg.to_string()
                }
            }
            CategorizationMode::Class => frame.type_name.clone(),
            CategorizationMode::Method => method_label(frame),
            CategorizationMode::Line => match frame.line {
                Some(line) => format!("{}:{}", method_label(frame), line),
                None => method_label(frame),
            },
        };
        FrameIdentity { label }
    }
}

/// "Type.method(signature)" label, signature omitted when absent
fn method_label(frame: &StackFrame) -> String {
    match &frame.signature {
        Some(sig) => format!("{}.{}({})", frame.type_name, frame.method, sig),
        None => format!("{}.{}", frame.type_name, frame.method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> StackFrame {
        StackFrame::new("com.example.Server", "handle")
            .with_signature("Request")
            .with_line(42)
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(
            "method".parse::<CategorizationMode>().unwrap(),
            CategorizationMode::Method
        );
        assert_eq!(
            "LINE".parse::<CategorizationMode>().unwrap(),
            CategorizationMode::Line
        );
        assert!("bci".parse::<CategorizationMode>().is_err());
    }

    #[test]
    fn test_unknown_mode_fails_at_construction() {
        let err = FramePolicy::new("nonsense", false).unwrap_err();
        assert!(err.to_string().contains("nonsense"));
    }

    #[test]
    fn test_method_identity_ignores_line() {
        let policy = FramePolicy::new("method", false).unwrap();
        let a = policy.identity_of(&frame());
        let b = policy.identity_of(&frame().with_line(99));
        assert_eq!(a, b);
        assert_eq!(a.label(), "com.example.Server.handle(Request)");
    }

    #[test]
    fn test_line_identity_distinguishes_lines() {
        let policy = FramePolicy::new("line", false).unwrap();
        let a = policy.identity_of(&frame());
        let b = policy.identity_of(&frame().with_line(99));
        assert_ne!(a, b);
        assert_eq!(a.label(), "com.example.Server.handle(Request):42");
    }

    #[test]
    fn test_class_and_package_identity() {
        let class = FramePolicy::new("class", false).unwrap();
        assert_eq!(class.identity_of(&frame()).label(), "com.example.Server");

        let package = FramePolicy::new("package", false).unwrap();
        assert_eq!(package.identity_of(&frame()).label(), "com.example");

        let unqualified = StackFrame::new("Main", "run");
        assert_eq!(package.identity_of(&unqualified).label(), "<default>");
    }

    #[test]
    fn test_hash64_is_stable() {
        let policy = FramePolicy::new("method", false).unwrap();
        let a = policy.identity_of(&frame());
        let b = policy.identity_of(&frame());
        assert_eq!(a.hash64(), b.hash64());
    }
}
