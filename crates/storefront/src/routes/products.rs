//! Product grid route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State};
use lumina_core::{Action, CategoryFilter, Shoe, catalog};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::models::dispatch;
use crate::state::AppState;

/// Shoe display data for templates.
#[derive(Clone)]
pub struct ShoeView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: &'static str,
    pub description: String,
    pub image: String,
    pub colors: Vec<String>,
}

impl From<&Shoe> for ShoeView {
    fn from(shoe: &Shoe) -> Self {
        Self {
            id: shoe.id.to_string(),
            name: shoe.name.clone(),
            price: shoe.price.display(),
            category: shoe.category.as_str(),
            description: shoe.description.clone(),
            image: shoe.image.clone(),
            colors: shoe.colors.clone(),
        }
    }
}

/// One button in the category filter bar.
#[derive(Clone)]
pub struct FilterOption {
    pub label: &'static str,
    pub active: bool,
}

/// Everything the catalog section renders.
#[derive(Clone)]
pub struct CatalogView {
    pub filters: Vec<FilterOption>,
    pub shoes: Vec<ShoeView>,
    pub category: &'static str,
}

impl CatalogView {
    /// The catalog filtered by `filter`, with the filter bar marking it.
    #[must_use]
    pub fn new(filter: CategoryFilter) -> Self {
        Self {
            filters: CategoryFilter::options()
                .into_iter()
                .map(|option| FilterOption {
                    label: option.as_str(),
                    active: option == filter,
                })
                .collect(),
            shoes: catalog::list(filter).into_iter().map(ShoeView::from).collect(),
            category: filter.as_str(),
        }
    }
}

/// Category query parameter.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

impl CategoryQuery {
    /// The requested filter; missing or blank means `All`.
    ///
    /// # Errors
    ///
    /// Returns `BadRequest` for an unknown category name.
    pub fn filter(&self) -> Result<CategoryFilter> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(CategoryFilter::All),
            Some(name) => Ok(name.parse()?),
        }
    }
}

/// Filter bar and product grid fragment (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/product_grid.html")]
pub struct ProductGridTemplate {
    pub catalog: CatalogView,
}

/// Render the product grid for a category and remember the selection.
#[instrument(skip(state, session))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CategoryQuery>,
) -> Result<ProductGridTemplate> {
    let filter = query.filter()?;
    dispatch(
        &session,
        state.config().quantity_policy,
        Action::SelectCategory(filter),
    )
    .await?;

    Ok(ProductGridTemplate {
        catalog: CatalogView::new(filter),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(category: Option<&str>) -> CategoryQuery {
        CategoryQuery {
            category: category.map(String::from),
        }
    }

    #[test]
    fn test_category_query() {
        assert_eq!(query(None).filter().ok(), Some(CategoryFilter::All));
        assert_eq!(query(Some(" ")).filter().ok(), Some(CategoryFilter::All));
        assert_eq!(
            query(Some("boots")).filter().ok(),
            Some(CategoryFilter::Only(lumina_core::ShoeCategory::Boots))
        );
        assert!(query(Some("Sandals")).filter().is_err());
    }

    #[test]
    fn test_catalog_view_marks_active_filter() {
        let view = CatalogView::new(CategoryFilter::Only(lumina_core::ShoeCategory::Boots));
        let active: Vec<_> = view.filters.iter().filter(|f| f.active).map(|f| f.label).collect();
        assert_eq!(active, ["Boots"]);
        assert_eq!(view.filters.len(), 6);

        let names: Vec<_> = view.shoes.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Alpine Trekker", "Urban Chelsea"]);
    }

    #[test]
    fn test_empty_grid_offers_show_all() {
        let mut catalog = CatalogView::new(CategoryFilter::Only(lumina_core::ShoeCategory::Heels));
        catalog.shoes.clear();

        let html = ProductGridTemplate { catalog }.render().expect("render");
        assert!(html.contains("No items found in the Heels category."));
        assert!(html.contains("Show all"));
        assert!(!html.contains("Add to Cart"));
    }
}
