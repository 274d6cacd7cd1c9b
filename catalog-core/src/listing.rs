//! The `{count, results}` envelope returned when listing a collection.

use serde::{Deserialize, Serialize};

/// A full listing of matching items along with how many there are.
///
/// # Example
///
/// ```ignore
/// use catalog_core::listing::Listing;
///
/// let listing = Listing::from(vec!["a", "b"]);
/// assert_eq!(listing.count, 2);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Listing<T> {
    /// Number of items in `results`.
    pub count: usize,
    /// The matching items, in store order.
    pub results: Vec<T>,
}

impl<T> Listing<T> {
    /// Maps every item, keeping the count.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing::from(self.results.into_iter().map(f).collect::<Vec<_>>())
    }
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(results: Vec<T>) -> Self {
        Self {
            count: results.len(),
            results,
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}
