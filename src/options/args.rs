//! Shared option-string builder for installer generations.

/// Builder for assembling an installer command line consistently across
/// installer generations.
///
/// Installers parse their own command line, so options are collected as
/// pre-formatted tokens and joined with single spaces.
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    tokens: Vec<String>,
}

impl OptionsBuilder {
    /// Create a new, empty builder.
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Append a flag with no value.
    pub fn push_flag(&mut self, flag: &str) {
        self.tokens.push(flag.to_string());
    }

    /// Append a flag only when `enabled` is set.
    pub fn push_flag_if(&mut self, flag: &str, enabled: bool) {
        if enabled {
            self.push_flag(flag);
        }
    }

    /// Append a flag followed by an unquoted value.
    pub fn push_flag_value(&mut self, flag: &str, value: &str) {
        self.tokens.push(format!("{} {}", flag, value));
    }

    /// Append a flag followed by a double-quoted value: `/log "C:\VS\vsinstall.log"`.
    pub fn push_flag_quoted(&mut self, flag: &str, value: &str) {
        self.tokens.push(format!("{} \"{}\"", flag, value));
    }

    /// Return the options joined by single spaces.
    pub fn into_options(self) -> String {
        self.tokens.join(" ")
    }
}
