//! Random selection and category filtering
//!
//! The [`Selector`] remembers two things between renders:
//!
//! - the active [`CategoryFilter`], persisted in durable storage under
//!   [`SELECTED_CATEGORY_KEY`]
//! - the index of the last quote shown, kept in session storage under
//!   [`LAST_VIEWED_KEY`] so a restarted view can show it again
//!
//! The quote list itself always comes from the [`QuoteStore`] passed in, so
//! categories added since the last render are always visible.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{QuoteError, QuoteResult};
use crate::models::{CategoryFilter, Quote, ALL_CATEGORIES};
use crate::storage::{KeyValueStore, LAST_VIEWED_KEY, SELECTED_CATEGORY_KEY};
use crate::store::QuoteStore;

/// A quote chosen for display, with its position in the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pick {
    pub index: usize,
    pub quote: Quote,
}

/// Pick a uniformly random element of `pool`
///
/// Fails with [`QuoteError::EmptyPool`] when `pool` is empty.
pub fn pick_random<T>(pool: &[T]) -> QuoteResult<&T> {
    pick_random_with(pool, &mut rand::thread_rng())
}

/// [`pick_random`] with a caller-supplied random source
pub fn pick_random_with<'a, T, R>(pool: &'a [T], rng: &mut R) -> QuoteResult<&'a T>
where
    R: Rng + ?Sized,
{
    pool.choose(rng).ok_or(QuoteError::EmptyPool)
}

/// Categories offered for filtering: `"all"` followed by the store's
/// categories in first-seen order
pub fn list_categories(store: &QuoteStore) -> Vec<String> {
    std::iter::once(ALL_CATEGORIES.to_string())
        .chain(store.categories())
        .collect()
}

/// Quotes passing `filter`, paired with their store index
pub fn filtered<'a>(store: &'a QuoteStore, filter: &CategoryFilter) -> Vec<(usize, &'a Quote)> {
    store
        .quotes()
        .iter()
        .enumerate()
        .filter(|(_, q)| filter.matches(q))
        .collect()
}

/// Filter state and last-viewed tracking
pub struct Selector {
    prefs: Box<dyn KeyValueStore>,
    session: Box<dyn KeyValueStore>,
    filter: CategoryFilter,
}

impl Selector {
    /// Create a selector, restoring the persisted filter from `prefs`
    ///
    /// Falls back to [`CategoryFilter::All`] when nothing usable is stored.
    pub fn new(prefs: Box<dyn KeyValueStore>, session: Box<dyn KeyValueStore>) -> Self {
        let filter = match prefs.get(SELECTED_CATEGORY_KEY) {
            Ok(Some(value)) => CategoryFilter::parse(&value),
            Ok(None) => CategoryFilter::All,
            Err(e) => {
                warn!("Failed to read category filter: {}", e);
                CategoryFilter::All
            }
        };
        debug!("Restored category filter: {}", filter);

        Self {
            prefs,
            session,
            filter,
        }
    }

    /// The active filter
    pub fn current_filter(&self) -> &CategoryFilter {
        &self.filter
    }

    /// Persist a new filter and immediately pick a quote that passes it
    ///
    /// The filter is kept even when no quote matches; the error then says
    /// there is nothing to show.
    pub fn set_filter(
        &mut self,
        filter: CategoryFilter,
        store: &QuoteStore,
    ) -> QuoteResult<Pick> {
        if let Err(e) = self.prefs.set(SELECTED_CATEGORY_KEY, filter.as_str()) {
            warn!("Failed to save category filter: {}", e);
        }
        self.filter = filter;
        self.show_random(store)
    }

    /// Pick a random quote passing the active filter and remember it
    pub fn show_random(&mut self, store: &QuoteStore) -> QuoteResult<Pick> {
        self.show_random_with(store, &mut rand::thread_rng())
    }

    /// [`Selector::show_random`] with a caller-supplied random source
    pub fn show_random_with<R: Rng + ?Sized>(
        &mut self,
        store: &QuoteStore,
        rng: &mut R,
    ) -> QuoteResult<Pick> {
        let pool = filtered(store, &self.filter);
        let &(index, quote) = pick_random_with(&pool, rng)?;
        let pick = Pick {
            index,
            quote: quote.clone(),
        };

        if let Err(e) = self.session.set(LAST_VIEWED_KEY, &index.to_string()) {
            warn!("Failed to remember last viewed quote: {}", e);
        }
        Ok(pick)
    }

    /// The quote shown last in this session, if the pointer still fits the
    /// store
    pub fn restore_last_viewed(&self, store: &QuoteStore) -> Option<Pick> {
        let raw = self.session.get(LAST_VIEWED_KEY).ok().flatten()?;
        let index: usize = raw.trim().parse().ok()?;
        let quote = store.get(index)?;
        Some(Pick {
            index,
            quote: quote.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn store() -> QuoteStore {
        QuoteStore::open(Box::new(MemoryStorage::new()))
    }

    fn selector() -> Selector {
        Selector::new(Box::new(MemoryStorage::new()), Box::new(MemoryStorage::new()))
    }

    #[test]
    fn test_pick_random_returns_pool_member() {
        let pool = vec![1, 2, 3, 4, 5];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = pick_random_with(&pool, &mut rng).unwrap();
            assert!(pool.contains(picked));
        }
    }

    #[test]
    fn test_pick_random_single_element() {
        let pool = vec!["only"];
        assert_eq!(*pick_random(&pool).unwrap(), "only");
    }

    #[test]
    fn test_pick_random_empty_pool() {
        let pool: Vec<Quote> = Vec::new();
        assert!(matches!(pick_random(&pool), Err(QuoteError::EmptyPool)));
    }

    #[test]
    fn test_pick_random_reaches_every_element() {
        let pool = vec!['a', 'b', 'c'];
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(*pick_random_with(&pool, &mut rng).unwrap());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_list_categories_prefixed_with_all() {
        let mut store = store();
        store.add("Stay hungry.", "Motivation").unwrap();

        assert_eq!(
            list_categories(&store),
            vec!["all", "Motivation", "Technology", "Inspiration"]
        );
    }

    #[test]
    fn test_list_categories_never_repeats_sentinel() {
        let mut store = store();
        assert!(store.add("x", "all").is_err());

        let categories = list_categories(&store);
        assert_eq!(categories.iter().filter(|c| *c == "all").count(), 1);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_list_categories_sees_new_category_immediately() {
        let mut store = store();
        store.add("Ship it.", "Work").unwrap();
        assert!(list_categories(&store).contains(&"Work".to_string()));
    }

    #[test]
    fn test_filtered_keeps_store_indices() {
        let mut store = store();
        store.add("Stay hungry.", "Motivation").unwrap();

        let pool = filtered(&store, &CategoryFilter::parse("Motivation"));
        let indices: Vec<usize> = pool.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 3]);
    }

    #[test]
    fn test_show_random_respects_filter() {
        let store = store();
        let mut selector = selector();
        let mut rng = StdRng::seed_from_u64(1);

        selector
            .set_filter(CategoryFilter::parse("Technology"), &store)
            .unwrap();
        for _ in 0..10 {
            let pick = selector.show_random_with(&store, &mut rng).unwrap();
            assert_eq!(pick.quote.category, "Technology");
            assert_eq!(pick.index, 1);
        }
    }

    #[test]
    fn test_set_filter_unknown_category_is_empty_pool() {
        let store = store();
        let mut selector = selector();

        let result = selector.set_filter(CategoryFilter::parse("Nope"), &store);
        assert!(matches!(result, Err(QuoteError::EmptyPool)));
        // The filter is still applied
        assert_eq!(selector.current_filter().as_str(), "Nope");
    }

    #[test]
    fn test_filter_persists_across_selectors() {
        let temp_dir = TempDir::new().unwrap();
        let store = store();

        {
            let mut selector = Selector::new(
                Box::new(FileStorage::new(temp_dir.path())),
                Box::new(MemoryStorage::new()),
            );
            selector
                .set_filter(CategoryFilter::parse("Inspiration"), &store)
                .unwrap();
        }

        let selector = Selector::new(
            Box::new(FileStorage::new(temp_dir.path())),
            Box::new(MemoryStorage::new()),
        );
        assert_eq!(
            selector.current_filter(),
            &CategoryFilter::Category("Inspiration".to_string())
        );
    }

    #[test]
    fn test_default_filter_is_all() {
        assert_eq!(selector().current_filter(), &CategoryFilter::All);
    }

    #[test]
    fn test_restore_last_viewed() {
        let store = store();
        let mut selector = selector();

        assert!(selector.restore_last_viewed(&store).is_none());

        let pick = selector.show_random(&store).unwrap();
        assert_eq!(selector.restore_last_viewed(&store), Some(pick));
    }

    #[test]
    fn test_restore_last_viewed_out_of_range() {
        let store = store();
        let mut session = MemoryStorage::new();
        session.set(LAST_VIEWED_KEY, "17").unwrap();
        let selector = Selector::new(Box::new(MemoryStorage::new()), Box::new(session));

        assert!(selector.restore_last_viewed(&store).is_none());
    }

    #[test]
    fn test_restore_last_viewed_garbage() {
        let store = store();
        let mut session = MemoryStorage::new();
        session.set(LAST_VIEWED_KEY, "-1").unwrap();
        let selector = Selector::new(Box::new(MemoryStorage::new()), Box::new(session));

        assert!(selector.restore_last_viewed(&store).is_none());
    }
}
