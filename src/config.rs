//! Decompiler output configuration
//!
//! The target class-file version decides which Java language constructs the
//! generated source is allowed to use. Transforms query individual features
//! through [`Config::is_supported`] rather than comparing versions inline.

/// Class file major versions for the Java releases we care about
pub mod major_versions {
    pub const JAVA_7: u16 = 51;
    pub const JAVA_8: u16 = 52;
    pub const JAVA_9: u16 = 53;
    pub const JAVA_11: u16 = 55;
    pub const JAVA_17: u16 = 61;
    pub const JAVA_21: u16 = 65;
}

/// Language features that change the shape of generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFeature {
    /// `MethodHandles.privateLookupIn` - scoped private lookup across nest
    /// mates, available from Java 9
    PrivateLookup,
}

/// Configuration for a decompilation session
#[derive(Debug, Clone)]
pub struct Config {
    /// Class file major version of the code being decompiled; generated
    /// source never uses constructs newer than this
    pub major_version: u16,
}

impl Config {
    pub fn new(major_version: u16) -> Self {
        Self { major_version }
    }

    /// Whether the target runtime supports a language feature
    pub fn is_supported(&self, feature: LanguageFeature) -> bool {
        match feature {
            LanguageFeature::PrivateLookup => self.major_version >= major_versions::JAVA_9,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self { major_version: major_versions::JAVA_8 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn private_lookup_requires_java_9() {
        assert!(!Config::new(major_versions::JAVA_8).is_supported(LanguageFeature::PrivateLookup));
        assert!(Config::new(major_versions::JAVA_9).is_supported(LanguageFeature::PrivateLookup));
        assert!(Config::new(major_versions::JAVA_17).is_supported(LanguageFeature::PrivateLookup));
    }
}
