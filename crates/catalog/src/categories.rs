//! Category tiles derived from the product listing.

use crate::dto::{non_empty, Category, Product};
use std::collections::HashSet;

/// Category names that are payment or brand tags rather than departments.
pub const EXCLUDED_CATEGORIES: [&str; 4] =
    ["BoxLtd", "Klarna Pay in 3", "Paypal Finance", "Paypal pay in 3"];

/// Most tiles shown on the home view.
pub const MAX_CATEGORIES: usize = 8;

/// Collect distinct categories in first-seen order.
///
/// The first product naming a category supplies its id and image.
pub fn derive_categories(products: &[Product]) -> Vec<Category> {
    let mut seen = HashSet::new();
    let mut categories = Vec::new();

    for product in products {
        let Some(attributes) = &product.attributes else {
            continue;
        };
        let Some(names) = non_empty(attributes.category_names.as_deref()) else {
            continue;
        };

        for name in names.split(',').map(str::trim) {
            if name.is_empty()
                || EXCLUDED_CATEGORIES.contains(&name)
                || !seen.insert(name.to_string())
            {
                continue;
            }

            let id = non_empty(attributes.fivetech_sku.as_deref())
                .map(str::to_string)
                .unwrap_or_else(|| product.id.to_string());
            let image = non_empty(attributes.thumbnail.as_deref())
                .or(non_empty(attributes.small_image.as_deref()))
                .or(non_empty(attributes.image.as_deref()))
                .map(str::to_string);

            categories.push(Category {
                id,
                name: name.to_string(),
                image,
            });
        }
    }

    categories.truncate(MAX_CATEGORIES);
    categories
}
