//! Native scalar types known to every registry
//!
//! The set is closed: these are the C/C++ fundamental types HDF5 has a
//! predefined native datatype for. Every registry is seeded with all of them
//! under their canonical clang spelling.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AtomicType {
    Char,
    SignedChar,
    UnsignedChar,
    Short,
    UnsignedShort,
    Int,
    UnsignedInt,
    Long,
    UnsignedLong,
    LongLong,
    UnsignedLongLong,
    Float,
    Double,
    LongDouble,
    Bool,
}

impl AtomicType {
    pub const ALL: [AtomicType; 15] = [
        AtomicType::Bool,
        AtomicType::Char,
        AtomicType::SignedChar,
        AtomicType::UnsignedChar,
        AtomicType::UnsignedShort,
        AtomicType::Short,
        AtomicType::UnsignedInt,
        AtomicType::Int,
        AtomicType::UnsignedLong,
        AtomicType::Long,
        AtomicType::UnsignedLongLong,
        AtomicType::LongLong,
        AtomicType::Float,
        AtomicType::Double,
        AtomicType::LongDouble,
    ];

    /// Canonical spelling, as the front-end reports canonical types
    pub fn spelling(self) -> &'static str {
        match self {
            AtomicType::Char => "char",
            AtomicType::SignedChar => "signed char",
            AtomicType::UnsignedChar => "unsigned char",
            AtomicType::Short => "short",
            AtomicType::UnsignedShort => "unsigned short",
            AtomicType::Int => "int",
            AtomicType::UnsignedInt => "unsigned int",
            AtomicType::Long => "long",
            AtomicType::UnsignedLong => "unsigned long",
            AtomicType::LongLong => "long long",
            AtomicType::UnsignedLongLong => "unsigned long long",
            AtomicType::Float => "float",
            AtomicType::Double => "double",
            AtomicType::LongDouble => "long double",
            AtomicType::Bool => "bool",
        }
    }

    /// The HDF5 predefined native datatype tag (`H5::PredType::<tag>`)
    pub fn native_tag(self) -> &'static str {
        match self {
            AtomicType::Char => "NATIVE_CHAR",
            AtomicType::SignedChar => "NATIVE_SCHAR",
            AtomicType::UnsignedChar => "NATIVE_UCHAR",
            AtomicType::Short => "NATIVE_SHORT",
            AtomicType::UnsignedShort => "NATIVE_USHORT",
            AtomicType::Int => "NATIVE_INT",
            AtomicType::UnsignedInt => "NATIVE_UINT",
            AtomicType::Long => "NATIVE_LONG",
            AtomicType::UnsignedLong => "NATIVE_ULONG",
            AtomicType::LongLong => "NATIVE_LLONG",
            AtomicType::UnsignedLongLong => "NATIVE_ULLONG",
            AtomicType::Float => "NATIVE_FLOAT",
            AtomicType::Double => "NATIVE_DOUBLE",
            AtomicType::LongDouble => "NATIVE_LDOUBLE",
            AtomicType::Bool => "NATIVE_HBOOL",
        }
    }

    pub fn from_spelling(spelling: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|atomic| atomic.spelling() == spelling)
    }
}

impl fmt::Display for AtomicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}
