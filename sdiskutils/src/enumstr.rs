//!
//! # Named Enumerations
//!
//! [enumstr] declares a fieldless enum whose variants each pair with a fixed name,
//! as used on the command line and in file names.
//!
//! ```
//! use sdiskutils::{enumstr, EnumStr};
//!
//! enumstr!(
//!     /// # Ring Sides
//!     Side {
//!         Inner: "inner",
//!         Outer: "outer",
//!     }
//! );
//! assert_eq!(Side::from_str("outer"), Some(Side::Outer));
//! assert_eq!(Side::Inner.to_string(), "inner");
//! ```
//!

/// # Named-Enumeration Trait
pub trait EnumStr: Sized + Copy + 'static {
    /// Every variant, in declaration order
    const ALL: &'static [Self];

    /// Our name
    fn to_str(&self) -> &'static str;
    /// Find the variant named `txt`. Case sensitive.
    fn from_str(txt: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.to_str() == txt)
    }
    /// All variant names, in declaration order
    fn variants() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::to_str).collect()
    }
}

/// Declare a named enumeration, implementing [EnumStr] and [std::fmt::Display]
#[macro_export]
macro_rules! enumstr {
    (   $(#[$meta: meta])*
        $name: ident {
        $( $variant: ident : $txt: literal ),* $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $( #[doc = $txt] $variant ),*
        }
        impl $crate::EnumStr for $name {
            const ALL: &'static [Self] = &[$( Self::$variant ),*];
            fn to_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $txt ),*
                }
            }
        }
        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str($crate::EnumStr::to_str(self))
            }
        }
    };
}
