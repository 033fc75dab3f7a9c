//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` (the `SQLite` rowid type) with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
///
/// # Example
///
/// ```rust
/// # use creditcards_core::define_id;
/// define_id!(AccountId);
/// define_id!(StatementId);
///
/// let account_id = AccountId::new(1);
/// let statement_id = StatementId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: AccountId = statement_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(PersonId);
define_id!(CardId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(CardId::new(42).to_string(), "42");
    }

    #[test]
    fn test_serializes_transparently() {
        let json = serde_json::to_string(&PersonId::new(7)).unwrap();
        assert_eq!(json, "7");

        let parsed: PersonId = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, PersonId::new(7));
    }

    #[test]
    fn test_i64_conversions() {
        let id = CardId::from(9_i64);
        assert_eq!(i64::from(id), 9);
        assert_eq!(id.as_i64(), 9);
    }
}
