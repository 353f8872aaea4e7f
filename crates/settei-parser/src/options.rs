use bitflags::bitflags;

bitflags! {
    /// Document-level behavior flags.
    ///
    /// The bit values are part of the format's external ABI and must not be
    /// renumbered; internally, always match on the named constants rather
    /// than the raw integer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Options: u32 {
        /// Numeric autoconversion (INT <-> INT64 <-> FLOAT) on get/set/lookup.
        const AUTOCONVERT = 0x01;
        /// Require/emit `;` between settings.
        const SEMICOLON_SEPARATORS = 0x02;
        /// Accept/emit `:` for group-valued settings.
        const COLON_ASSIGN_GROUPS = 0x04;
        /// Accept/emit `:` for scalar/array/list-valued settings.
        const COLON_ASSIGN_NONGROUPS = 0x08;
        /// Emit `{` on its own line.
        const OPEN_BRACE_SEP_LINE = 0x10;
        /// Accept/emit floating point literals using `e`/`E` exponents.
        const ALLOW_SCI_NOTATION = 0x20;
        /// Flush to durable storage on `write_file`.
        const FSYNC = 0x40;
        /// Later duplicate names in a group replace the earlier entry.
        const ALLOW_OVERRIDES = 0x80;
        /// Case-insensitive identifier/keyword matching.
        const IGNORECASE = 0x100;
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::empty()
    }
}
