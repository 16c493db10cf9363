//! Compile-time switches for the boot sequence, taken from Cargo features.

/// Optional steps of the boot sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Require the descriptor self-test lookup to succeed
    pub descriptor_self_test: bool,
    /// Copy the vector table on protocols that relocate it
    pub relocate_vectors: bool,
}

impl BootConfig {
    /// Validation only: no self-test, no relocation
    pub const MINIMAL: Self = Self {
        descriptor_self_test: false,
        relocate_vectors: false,
    };

    /// Everything enabled
    pub const FULL: Self = Self {
        descriptor_self_test: true,
        relocate_vectors: true,
    };

    /// The configuration selected by this crate's features
    #[must_use]
    pub const fn from_features() -> Self {
        Self {
            descriptor_self_test: cfg!(feature = "descriptor-self-test"),
            relocate_vectors: cfg!(feature = "vector-relocation"),
        }
    }
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::from_features()
    }
}
