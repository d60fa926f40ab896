//! Enumerations used by composed nodes.
//!
//! Each enum converts to and from the exact string the Redfish service uses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! redfish_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $name {
            /// Every known value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The value as sent on the wire.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        "unknown {} value '{}'",
                        stringify!($name),
                        other
                    )),
                }
            }
        }
    };
}

redfish_enum!(
    /// Reset operations accepted by `#ComposedNode.Reset`.
    ResetType {
        On => "On",
        ForceOff => "ForceOff",
        GracefulShutdown => "GracefulShutdown",
        GracefulRestart => "GracefulRestart",
        ForceRestart => "ForceRestart",
        Nmi => "Nmi",
        ForceOn => "ForceOn",
        PushPowerButton => "PushPowerButton",
    }
);

redfish_enum!(
    /// Power state reported by a node.
    PowerState {
        On => "On",
        Off => "Off",
        PoweringOn => "PoweringOn",
        PoweringOff => "PoweringOff",
    }
);

redfish_enum!(
    /// Composition lifecycle state of a node.
    ComposedNodeState {
        Allocating => "Allocating",
        Allocated => "Allocated",
        Assembling => "Assembling",
        Assembled => "Assembled",
        Failed => "Failed",
    }
);

redfish_enum!(
    /// Boot source override target.
    BootSourceTarget {
        /// Boot normally.
        None => "None",
        /// Network boot.
        Pxe => "Pxe",
        /// Local disk.
        Hdd => "Hdd",
    }
);

redfish_enum!(
    /// How long a boot source override stays in effect.
    BootSourceEnabled {
        /// Next boot only.
        Once => "Once",
        /// Every boot until changed.
        Continuous => "Continuous",
        Disabled => "Disabled",
    }
);

redfish_enum!(
    /// Firmware boot mode.
    BootSourceMode {
        Legacy => "Legacy",
        Uefi => "UEFI",
    }
);

impl Default for BootSourceEnabled {
    fn default() -> Self {
        Self::Once
    }
}

/// Joins values for diagnostics, e.g. `"On, ForceOff"`.
pub(crate) fn join_values<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
