//! Status enums for various entities.
//!
//! Wire values are the lowercase snake_case strings the API uses. Enums
//! whose values come from free-form server data carry an `Other` variant so
//! an unexpected value never fails a whole response.

use serde::{Deserialize, Serialize};

/// Generates `as_str`, `Display`, `FromStr` and string serde for a status
/// enum with an `Other(String)` fallback.
macro_rules! open_status {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this client does not know about.
            Other(String),
        }

        impl $name {
            /// Wire representation.
            #[must_use]
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $wire, )+
                    Self::Other(s) => s,
                }
            }

            /// Human-readable label. Unknown values are passed through.
            #[must_use]
            pub fn label(&self) -> &str {
                match self {
                    $( Self::$variant => $label, )+
                    Self::Other(s) => s,
                }
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(match s {
                    $( $wire => Self::$variant, )+
                    other => Self::Other(other.to_owned()),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(s.parse().unwrap_or_else(|never| match never {}))
            }
        }
    };
}

open_status! {
    /// Product catalogue status.
    pub enum ProductStatus {
        Active => "active", "Active",
        Inactive => "inactive", "Inactive",
        OutOfStock => "out_of_stock", "Out of Stock",
    }
}

impl Default for ProductStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Stock level bucket computed by the server (or derived client-side).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Bucket a stock level against its reorder threshold.
    #[must_use]
    pub const fn classify(stock: u32, min_stock: u32) -> Self {
        if stock == 0 {
            Self::OutOfStock
        } else if stock <= min_stock {
            Self::LowStock
        } else {
            Self::InStock
        }
    }

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InStock => "in_stock",
            Self::LowStock => "low_stock",
            Self::OutOfStock => "out_of_stock",
        }
    }
}

open_status! {
    /// Customer account status.
    pub enum CustomerStatus {
        Active => "active", "Active",
        Inactive => "inactive", "Inactive",
        Vip => "vip", "VIP",
    }
}

impl Default for CustomerStatus {
    fn default() -> Self {
        Self::Active
    }
}

open_status! {
    /// Order lifecycle status.
    pub enum OrderStatus {
        Pending => "pending", "Pending",
        Processing => "processing", "Processing",
        Completed => "completed", "Completed",
        Cancelled => "cancelled", "Cancelled",
        Refunded => "refunded", "Refunded",
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

open_status! {
    /// How a sale was paid for.
    pub enum PaymentMethod {
        Cash => "cash", "Cash",
        Card => "card", "Credit/Debit Card",
        Transfer => "transfer", "Bank Transfer",
        BankTransfer => "bank_transfer", "Bank Transfer",
    }
}

open_status! {
    /// Settlement state of an order's payment.
    pub enum PaymentStatus {
        Pending => "pending", "Pending",
        Paid => "paid", "Paid",
        Refunded => "refunded", "Refunded",
        Failed => "failed", "Failed",
    }
}

impl Default for PaymentStatus {
    fn default() -> Self {
        Self::Pending
    }
}

open_status! {
    /// Staff member role with different permission levels.
    pub enum StaffRole {
        /// Full access including staff management.
        Admin => "admin", "Administrator",
        Manager => "manager", "Manager",
        Cashier => "cashier", "Cashier",
        SalesAssociate => "sales_associate", "Sales Associate",
    }
}
