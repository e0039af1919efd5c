//! Product listing.

use boutique_core::Catalog;

use super::CliError;
use crate::client::StorefrontClient;
use crate::render;

/// List products, optionally filtered by text and category.
///
/// # Errors
///
/// Returns `CliError::Catalog` if the catalog cannot be fetched.
pub async fn list(
    client: &StorefrontClient,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<String, CliError> {
    let catalog = client.fetch_catalog().await?;
    Ok(filter(&catalog, search, category))
}

/// Render the filtered listing followed by the known categories.
#[must_use]
pub fn filter(catalog: &Catalog, search: Option<&str>, category: Option<&str>) -> String {
    let matches = catalog.search(search.unwrap_or_default(), category);
    let mut out = render::products(&matches);

    let categories = catalog.categories();
    if !categories.is_empty() {
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("Catégories : tous, ");
        out.push_str(&categories.join(", "));
    }
    out
}
