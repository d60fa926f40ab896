//! Resources of the Valence `/v1` API.
//!
//! Each resource is a typed wrapper around [`Resource`] plus a client that
//! specializes [`Manager`](crate::rest::Manager) with the resource's method
//! names:
//!
//! | Resource | Collection | Client |
//! |---|---|---|
//! | [`PodManager`] | `/v1/pod_managers` | [`PodManagersClient`] |
//! | [`Node`] | `/v1/nodes` | [`NodeClient`] |
//! | [`Flavor`] | `/v1/flavors` | [`FlavorClient`] |
//! | [`System`] | `/v1/systems` | [`SystemClient`] |

use crate::rest::Resource;

/// Declares a typed wrapper around [`Resource`] bound to one collection.
macro_rules! valence_resource {
    (
        $(#[$meta:meta])*
        $name:ident, collection = $collection:literal, creation = [$($attr:literal),* $(,)?]
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(crate::rest::Resource);

        impl From<crate::rest::Resource> for $name {
            fn from(resource: crate::rest::Resource) -> Self {
                Self(resource)
            }
        }

        impl AsRef<crate::rest::Resource> for $name {
            fn as_ref(&self) -> &crate::rest::Resource {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = crate::rest::Resource;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::ops::DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl crate::rest::ValenceResource for $name {
            const NAME: &'static str = stringify!($name);
            const COLLECTION: &'static str = $collection;
            const CREATION_ATTRIBUTES: &'static [&'static str] = &[$($attr),*];
        }

        impl $name {
            /// Consumes the wrapper, returning the underlying resource.
            #[must_use]
            pub fn into_inner(self) -> crate::rest::Resource {
                self.0
            }
        }
    };
}

mod flavor;
mod node;
mod pod_manager;
mod system;

pub use flavor::{Flavor, FlavorClient};
pub use node::{Node, NodeClient};
pub use pod_manager::{PodManager, PodManagersClient};
pub use system::{System, SystemClient};

/// Common accessors shared by every Valence resource.
pub trait CommonFields: AsRef<Resource> {
    /// The `uuid` attribute.
    fn uuid(&self) -> Option<&str> {
        self.as_ref().get_str("uuid")
    }

    /// The `name` attribute.
    fn name(&self) -> Option<&str> {
        self.as_ref().get_str("name")
    }
}

impl<T: AsRef<Resource>> CommonFields for T {}
