//! Rewrite options threaded through the font walker.

/// Code font kept as-is when code fonts are preserved.
pub const PRESERVED_CODE_FONT: &str = "Consolas";

/// Code fonts rewritten to [`PRESERVED_CODE_FONT`] when code fonts are preserved.
pub const REPLACED_CODE_FONTS: &[&str] = &["Courier New"];

/// Maximum group-shape nesting the walker follows before giving up.
pub const DEFAULT_MAX_GROUP_DEPTH: usize = 64;

/// Immutable settings for one rewrite run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Whether code fonts are exempt from theme normalization.
    pub preserve_code_fonts: bool,

    /// The code font left untouched when preserving.
    pub code_font: String,

    /// Code fonts rewritten to `code_font` when preserving.
    pub replaceable_code_fonts: Vec<String>,

    /// How many nested group shapes are followed.
    pub max_group_depth: usize,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            preserve_code_fonts: false,
            code_font: PRESERVED_CODE_FONT.to_string(),
            replaceable_code_fonts: REPLACED_CODE_FONTS.iter().map(|s| s.to_string()).collect(),
            max_group_depth: DEFAULT_MAX_GROUP_DEPTH,
        }
    }
}

impl RewriteOptions {
    /// Create options with code fonts normalized like any other font.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether code fonts are preserved.
    pub fn with_preserve_code_fonts(mut self, preserve: bool) -> Self {
        self.preserve_code_fonts = preserve;
        self
    }

    /// Set the preserved code font.
    pub fn with_code_font(mut self, font: impl Into<String>) -> Self {
        self.code_font = font.into();
        self
    }

    /// Replace the set of code fonts remapped to the preserved code font.
    pub fn with_replaceable_code_fonts<I, S>(mut self, fonts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replaceable_code_fonts = fonts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the group nesting limit.
    pub fn with_max_group_depth(mut self, depth: usize) -> Self {
        self.max_group_depth = depth.max(1); // At least top-level groups
        self
    }

    /// Whether `font` is one of the replaceable code fonts.
    pub fn is_replaceable_code_font(&self, font: &str) -> bool {
        self.replaceable_code_fonts.iter().any(|f| f == font)
    }
}
