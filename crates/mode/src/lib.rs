//! Cache-mode coordination for the storefront.
//!
//! One part of the UI flips the "use server-side cache" flag; every open
//! data-fetching view hears about it through [`ModeBroadcaster::subscribe`]
//! and reloads with the new value. The flag is mirrored to durable storage
//! under [`REDIS_ENABLED_KEY`] as `"true"` / `"false"`.

mod broadcaster;
mod mode;

pub use broadcaster::ModeBroadcaster;
pub use mode::{CacheMode, REDIS_ENABLED_KEY};

pub use rivo_bus::Subscription;
