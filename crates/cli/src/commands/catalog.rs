//! Catalog listing.
//!
//! # Usage
//!
//! ```bash
//! lumina-cli catalog
//! lumina-cli catalog --category Sneakers
//! ```

use std::io::{self, Write};

use lumina_core::{CategoryFilter, CategoryParseError, Shoe, catalog};
use thiserror::Error;

/// Errors that can occur while listing the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    Category(#[from] CategoryParseError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Print the catalog, filtered by `category` when given.
///
/// # Errors
///
/// Returns an error for an unknown category or if stdout is closed.
pub fn list(category: Option<&str>) -> Result<(), CatalogError> {
    let filter = category.map_or(Ok(CategoryFilter::All), str::parse::<CategoryFilter>)?;
    let shoes = catalog::list(filter);

    let mut out = io::stdout().lock();
    write_table(&mut out, &shoes)?;
    tracing::debug!(%filter, count = shoes.len(), "Listed catalog");
    Ok(())
}

fn write_table(out: &mut impl Write, shoes: &[&Shoe]) -> io::Result<()> {
    for shoe in shoes {
        writeln!(
            out,
            "{:>3}  {:<20} {:<9} {:>8}  {}",
            shoe.id,
            shoe.name,
            shoe.category,
            shoe.price,
            shoe.colors.join(", ")
        )?;
    }
    Ok(())
}
