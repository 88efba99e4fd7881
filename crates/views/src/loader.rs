//! Catalog-backed view loading.

use crate::mount::ViewLoader;
use rivo_catalog::{CatalogClient, CatalogError};
use rivo_events::{
    emit_event, event_names, now_ms, EventBusRef, ViewLoadFailedEvent, ViewLoadedEvent,
};
use rivo_mode::CacheMode;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;

/// The storefront views that fetch catalog data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogView {
    /// Category tiles.
    Home,
    /// One page of the product listing.
    Category { page: u32 },
    /// A single product.
    Product { id: String },
}

impl CatalogView {
    pub fn name(&self) -> String {
        match self {
            CatalogView::Home => "home".to_string(),
            CatalogView::Category { page } => format!("category:{}", page),
            CatalogView::Product { id } => format!("product:{}", id),
        }
    }

    /// Fetch the view's data and return how many items came back.
    pub async fn fetch(
        &self,
        client: &CatalogClient,
        mode: CacheMode,
    ) -> Result<usize, CatalogError> {
        match self {
            CatalogView::Home => Ok(client.get_categories(mode).await.len()),
            CatalogView::Category { page } => {
                let limit = client.config().page_size;
                Ok(client.get_products(*page, limit, mode).await?.products.len())
            }
            CatalogView::Product { id } => {
                let product = client.get_product_detail(id, mode).await?;
                Ok(usize::from(product.is_some()))
            }
        }
    }
}

/// [`ViewLoader`] that fetches a [`CatalogView`] on a tokio runtime and
/// reports the outcome on the event bus.
///
/// Each load supersedes the previous one; a response arriving after a
/// newer load was started is discarded.
pub struct CatalogLoader {
    client: CatalogClient,
    view: CatalogView,
    runtime: Handle,
    bus: EventBusRef,
    generation: Arc<AtomicU64>,
}

impl CatalogLoader {
    pub fn new(client: CatalogClient, view: CatalogView, runtime: Handle, bus: EventBusRef) -> Self {
        Self {
            client,
            view,
            runtime,
            bus,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn view(&self) -> &CatalogView {
        &self.view
    }
}

impl ViewLoader for CatalogLoader {
    fn load(&self, mode: CacheMode) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let latest = Arc::clone(&self.generation);
        let client = self.client.clone();
        let view = self.view.clone();
        let bus = Arc::clone(&self.bus);

        self.runtime.spawn(async move {
            let name = view.name();
            let started = Instant::now();
            let outcome = view.fetch(&client, mode).await;

            if latest.load(Ordering::SeqCst) != generation {
                tracing::debug!(view = %name, generation, "discarding superseded load");
                return;
            }

            match outcome {
                Ok(items) => {
                    let elapsed_ms = started.elapsed().as_millis() as u64;
                    tracing::info!(view = %name, %mode, items, elapsed_ms, "view loaded");
                    let event = ViewLoadedEvent {
                        view: name,
                        mode,
                        items,
                        elapsed_ms,
                        timestamp_ms: now_ms(),
                    };
                    emit_event(bus.as_ref(), event_names::VIEW_LOADED, &event);
                }
                Err(e) => {
                    tracing::error!(view = %name, %mode, error = %e, "view load failed");
                    let event = ViewLoadFailedEvent {
                        view: name,
                        mode,
                        error: e.to_string(),
                        timestamp_ms: now_ms(),
                    };
                    emit_event(bus.as_ref(), event_names::VIEW_LOAD_FAILED, &event);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_names() {
        assert_eq!(CatalogView::Home.name(), "home");
        assert_eq!(CatalogView::Category { page: 3 }.name(), "category:3");
        assert_eq!(
            CatalogView::Product {
                id: "77".to_string()
            }
            .name(),
            "product:77"
        );
    }
}
