//! Access levels and member modifiers.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Declared access level of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CodeAccess {
    /// No access keyword was written
    #[default]
    None,
    Private,
    Protected,
    Internal,
    /// `protected internal` / `Protected Friend`
    ProtectedInternal,
    Public,
}

impl CodeAccess {
    /// Ordering used when sorting by access: wider access ranks higher.
    pub fn rank(&self) -> u8 {
        match self {
            Self::None => 0,
            Self::Private => 1,
            Self::Protected => 2,
            Self::Internal => 3,
            Self::ProtectedInternal => 4,
            Self::Public => 5,
        }
    }

    /// Textual form used by condition expressions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Private => "Private",
            Self::Protected => "Protected",
            Self::Internal => "Internal",
            Self::ProtectedInternal => "Protected, Internal",
            Self::Public => "Public",
        }
    }

    /// Combine a newly seen access keyword with the level read so far.
    ///
    /// Only `protected` + `internal` (in either order) combine; any other
    /// repetition keeps the latest keyword.
    pub fn combine(self, next: CodeAccess) -> CodeAccess {
        match (self, next) {
            (Self::Protected, Self::Internal) | (Self::Internal, Self::Protected) => {
                Self::ProtectedInternal
            }
            (_, next) => next,
        }
    }
}

impl fmt::Display for CodeAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of member modifiers. Which flags apply depends on the element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const STATIC: Self = Self(1 << 0);
    pub const ABSTRACT: Self = Self(1 << 1);
    pub const VIRTUAL: Self = Self(1 << 2);
    pub const OVERRIDE: Self = Self(1 << 3);
    pub const SEALED: Self = Self(1 << 4);
    pub const NEW: Self = Self(1 << 5);
    pub const PARTIAL: Self = Self(1 << 6);
    pub const EXTERNAL: Self = Self(1 << 7);
    pub const READ_ONLY: Self = Self(1 << 8);
    pub const CONSTANT: Self = Self(1 << 9);
    pub const VOLATILE: Self = Self(1 << 10);
    pub const UNSAFE: Self = Self(1 << 11);
    pub const ASYNC: Self = Self(1 << 12);

    /// Every flag with its display name, in canonical order.
    pub const NAMED: [(Modifiers, &'static str); 13] = [
        (Self::STATIC, "Static"),
        (Self::ABSTRACT, "Abstract"),
        (Self::VIRTUAL, "Virtual"),
        (Self::OVERRIDE, "Override"),
        (Self::SEALED, "Sealed"),
        (Self::NEW, "New"),
        (Self::PARTIAL, "Partial"),
        (Self::EXTERNAL, "External"),
        (Self::READ_ONLY, "ReadOnly"),
        (Self::CONSTANT, "Constant"),
        (Self::VOLATILE, "Volatile"),
        (Self::UNSAFE, "Unsafe"),
        (Self::ASYNC, "Async"),
    ];

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Modifiers) -> bool {
        !other.is_empty() && self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Modifiers) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Modifiers) {
        self.0 &= !other.0;
    }

    /// Names of the flags that are set, in canonical order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Modifiers) -> Modifiers {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Modifiers) {
        self.insert(rhs);
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifiers_display_is_canonical() {
        let mods = Modifiers::READ_ONLY | Modifiers::STATIC;
        assert_eq!(mods.to_string(), "Static, ReadOnly");
        assert_eq!(Modifiers::NONE.to_string(), "None");
    }

    #[test]
    fn test_modifiers_contains_and_remove() {
        let mut mods = Modifiers::ABSTRACT | Modifiers::PARTIAL;
        assert!(mods.contains(Modifiers::PARTIAL));
        assert!(!mods.contains(Modifiers::NONE));
        mods.remove(Modifiers::PARTIAL);
        assert!(!mods.contains(Modifiers::PARTIAL));
        assert!(mods.contains(Modifiers::ABSTRACT));
    }

    #[test]
    fn test_access_combine() {
        assert_eq!(
            CodeAccess::Protected.combine(CodeAccess::Internal),
            CodeAccess::ProtectedInternal
        );
        assert_eq!(
            CodeAccess::Internal.combine(CodeAccess::Protected),
            CodeAccess::ProtectedInternal
        );
        assert_eq!(CodeAccess::None.combine(CodeAccess::Public), CodeAccess::Public);
        assert!(CodeAccess::Public.rank() > CodeAccess::Private.rank());
    }
}
