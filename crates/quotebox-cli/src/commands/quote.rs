//! Quote command handlers

use anyhow::Result;

use quotebox_core::selector::filtered;
use quotebox_core::{list_categories, CategoryFilter, QuoteError, QuoteStore, Selector};

use super::describe;
use crate::output::Output;

/// Show a random quote passing the persisted filter
pub fn show(store: &QuoteStore, selector: &mut Selector, output: &Output) -> Result<()> {
    match selector.show_random(store) {
        Ok(pick) => output.print_pick(&pick),
        Err(QuoteError::EmptyPool) => output.print_no_quotes(),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Add a quote
pub fn add(store: &mut QuoteStore, text: String, category: String, output: &Output) -> Result<()> {
    let quote = store
        .add(&text, &category)
        .map_err(|e| describe("Failed to add quote", e))?;

    output.success(&format!("Quote added to '{}'", quote.category));
    Ok(())
}

/// List quotes, optionally restricted to one category
pub fn list(store: &QuoteStore, category: Option<String>, output: &Output) -> Result<()> {
    let filter = category
        .as_deref()
        .map(CategoryFilter::parse)
        .unwrap_or_default();

    output.print_quotes(&filtered(store, &filter));
    Ok(())
}

/// List categories available for filtering
pub fn categories(store: &QuoteStore, selector: &Selector, output: &Output) -> Result<()> {
    output.print_categories(&list_categories(store), selector.current_filter());
    Ok(())
}

/// Show or change the category filter
///
/// Without an argument the active filter is printed. With one, the filter
/// is persisted and a matching quote is shown straight away.
pub fn filter(
    store: &QuoteStore,
    selector: &mut Selector,
    category: Option<String>,
    output: &Output,
) -> Result<()> {
    let Some(category) = category else {
        output.message(&format!("Filter: {}", selector.current_filter()));
        return Ok(());
    };

    match selector.set_filter(CategoryFilter::parse(&category), store) {
        Ok(pick) => {
            output.success(&format!("Filter set to '{}'", selector.current_filter()));
            output.print_pick(&pick);
        }
        Err(QuoteError::EmptyPool) => {
            output.success(&format!("Filter set to '{}'", selector.current_filter()));
            output.print_no_quotes();
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
