/// One-way switch that turns a configuration section into a "remove this
/// feature" instruction.
///
/// The flag starts cleared and can only ever be set; there is no way to
/// re-enable a section within the same configuration session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisableFlag(bool);

impl DisableFlag {
    /// A cleared flag.
    #[must_use]
    pub const fn new() -> Self {
        Self(false)
    }

    /// Set the flag. Calling it again has no further effect.
    pub fn set(&mut self) {
        self.0 = true;
    }

    #[must_use]
    pub const fn is_set(self) -> bool {
        self.0
    }
}
