//! Symbol classification flags.

use bitflags::bitflags;

bitflags! {
    /// What a symbol names. Kind bits combine with `TYPE` for type
    /// declarations; see the associated constants for the common mixes.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SymbolFlags: u32 {
        const IMPORTED_MODULE = 1 << 0;

        const VARIABLE = 1 << 1;
        const ARGUMENT = 1 << 2;

        const FUNCTION = 1 << 3;
        const TEMPLATE = 1 << 4;
        const CONTROL = 1 << 5;

        const TYPE = 1 << 6;

        const VISIBILITY_STATIC = 1 << 7;

        const STRUCTURAL = 1 << 8;
        const COMPONENT = 1 << 9;
        const UNION = 1 << 10;
        const CLASS = 1 << 11;
        const CONSTRUCTOR = 1 << 12;
        const ENUM = 1 << 13;
        const SUBTYPE = 1 << 14;
        const LIST = 1 << 15;

        const THIS = 1 << 16;
        const FIELD = 1 << 17;
        const ENUM_MEMBER = 1 << 18;

        const ARRAY = 1 << 19;

        const BUILTIN = 1 << 20;
        const BUILTIN_STRING = 1 << 21;

        const TEMPLATE_SPEC = 1 << 22;

        const PORT = 1 << 23;

        /// Internal symbols such as the control part; skipped when a table
        /// is enumerated.
        const ANONYMOUS = 1 << 24;

        const STRUCTURAL_TYPE = Self::TYPE.bits() | Self::STRUCTURAL.bits();
        const COMPONENT_TYPE = Self::TYPE.bits() | Self::COMPONENT.bits();
        const UNION_TYPE = Self::TYPE.bits() | Self::STRUCTURAL.bits() | Self::UNION.bits();
        const CLASS_TYPE = Self::TYPE.bits() | Self::CLASS.bits();
        const CONSTRUCTOR_FUNCTION =
            Self::FUNCTION.bits() | Self::CONSTRUCTOR.bits() | Self::VISIBILITY_STATIC.bits();
        const ENUM_TYPE = Self::TYPE.bits() | Self::ENUM.bits();
        const SUBTYPE_TYPE = Self::TYPE.bits() | Self::SUBTYPE.bits();
        const LIST_TYPE = Self::TYPE.bits() | Self::LIST.bits();
        const PORT_TYPE = Self::TYPE.bits() | Self::PORT.bits();
        const BUILTIN_TYPE = Self::TYPE.bits() | Self::BUILTIN.bits();
        const BUILTIN_STRING_TYPE =
            Self::TYPE.bits() | Self::BUILTIN.bits() | Self::BUILTIN_STRING.bits();
    }
}

impl SymbolFlags {
    #[inline]
    pub const fn is_type(self) -> bool {
        self.contains(SymbolFlags::TYPE)
    }

    /// Symbols whose member table can be injected by `runs on`.
    #[inline]
    pub const fn is_component(self) -> bool {
        self.contains(SymbolFlags::COMPONENT)
    }

    #[inline]
    pub const fn is_class(self) -> bool {
        self.contains(SymbolFlags::CLASS)
    }
}
