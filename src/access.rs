//! Access-mode enumerations accepted by the batched operations.
//!
//! The Manager façade does not interpret these values beyond forwarding them
//! to the [`crate::manager_interface::ManagerInterface`] and naming them in
//! error messages via [`AccessName`].

use std::fmt::Display;

/// Name of an access-mode value, used to render error messages.
///
/// Shared across all six access enums below since they name their variants
/// identically where they overlap (`read`, `write`, `createRelated`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccessName(pub(crate) &'static str);

impl Display for AccessName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! access_enum {
    ($name:ident { $($variant:ident => $rendered:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Returns the name used when rendering this access mode in error messages.
            pub fn name(&self) -> AccessName {
                match self {
                    $(Self::$variant => AccessName($rendered)),+
                }
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

access_enum!(ResolveAccess {
    Read => "read",
    Write => "write",
});

access_enum!(PublishingAccess {
    Write => "write",
    CreateRelated => "createRelated",
});

access_enum!(RelationsAccess {
    Read => "read",
    Write => "write",
});

access_enum!(PolicyAccess {
    Read => "read",
    Write => "write",
    CreateRelated => "createRelated",
});

access_enum!(DefaultEntityAccess {
    Read => "read",
    Write => "write",
    CreateRelated => "createRelated",
});

access_enum!(EntityTraitsAccess {
    Read => "read",
    Write => "write",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_access_names() {
        assert_eq!(ResolveAccess::Read.name().to_string(), "read");
        assert_eq!(PublishingAccess::CreateRelated.name().to_string(), "createRelated");
        assert_eq!(PolicyAccess::Write.name().to_string(), "write");
    }
}
