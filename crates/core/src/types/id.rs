//! Newtype IDs for type-safe entity references.
//!
//! The backend uses two key shapes: auto-increment integers for customers,
//! orders, order items, staff and users, and UUIDs for products and
//! categories. `define_id!` and `define_uuid_id!` generate a wrapper for
//! each so IDs of different entities cannot be mixed up.

/// Macro to define a type-safe integer ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>`, `Into<i64>`, `Display` and `FromStr` implementations
///
/// # Example
///
/// ```rust
/// # use tillpoint_core::define_id;
/// define_id!(ReceiptId);
/// define_id!(RegisterId);
///
/// let receipt = ReceiptId::new(1);
/// let register = RegisterId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ReceiptId = register;
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

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
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

/// Macro to define a type-safe UUID wrapper.
///
/// Same surface as [`define_id!`] but backed by [`uuid::Uuid`], for
/// entities whose primary key is a UUID on the server.
#[macro_export]
macro_rules! define_uuid_id {
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
        pub struct $name(::uuid::Uuid);

        impl $name {
            /// Wrap an existing UUID.
            #[must_use]
            pub const fn new(id: ::uuid::Uuid) -> Self {
                Self(id)
            }

            /// Generate a fresh random ID.
            #[must_use]
            pub fn random() -> Self {
                Self(::uuid::Uuid::new_v4())
            }

            /// Get the underlying UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &::uuid::Uuid {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                ::uuid::Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<::uuid::Uuid> for $name {
            fn from(id: ::uuid::Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for ::uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(CustomerId);
define_id!(OrderId);
define_id!(OrderItemId);
define_id!(StaffId);
define_id!(InventoryItemId);

define_uuid_id!(ProductId);
define_uuid_id!(CategoryId);
