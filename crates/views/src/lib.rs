//! View bindings for the storefront.
//!
//! A mounted view loads its data once, republishes metrics snapshots on the
//! event bus, and reloads whenever the cache mode is toggled. Everything a
//! view does is observable through [`rivo_events`] topics:
//!
//! | Topic                | When                                   |
//! |----------------------|----------------------------------------|
//! | `metrics:updated`    | the metrics snapshot changed           |
//! | `cache_mode:changed` | the cache mode was toggled             |
//! | `view:loaded`        | a catalog fetch succeeded              |
//! | `view:load_failed`   | a catalog fetch failed                 |

mod loader;
mod mount;

pub use loader::{CatalogLoader, CatalogView};
pub use mount::{MountedView, ViewLoader};
