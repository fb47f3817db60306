use serde::{Deserialize, Serialize};

/// Strings the backend puts in a record's key field instead of returning an
/// empty list.
pub const SENTINELS: [&str; 3] = [
    "pedido nao encontrado",
    "Nota nao encontrada",
    "Titulos Nao Encontrados",
];

/// Whether `value` is one of the backend's "not found" markers.
pub fn is_sentinel(value: &str) -> bool {
    let value = value.trim();
    SENTINELS.iter().any(|s| s.eq_ignore_ascii_case(value))
}

/// Result of a list query.
///
/// `NothingFound` covers every way the backend says "no rows": an unsuccessful
/// envelope, an empty list, or a list holding a sentinel record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Listing<T> {
    Found(Vec<T>),
    NothingFound,
}

impl<T> Listing<T> {
    /// Classify a decoded response.
    ///
    /// `key` extracts the field the backend overwrites with a sentinel.
    pub fn classify<F>(success: bool, rows: Vec<T>, key: F) -> Self
    where
        F: Fn(&T) -> &str,
    {
        if !success || rows.is_empty() || rows.iter().any(|row| is_sentinel(key(row))) {
            Listing::NothingFound
        } else {
            Listing::Found(rows)
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Found(items) => items,
            Listing::NothingFound => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Listing<U> {
        match self {
            Listing::Found(items) => Listing::Found(items.into_iter().map(f).collect()),
            Listing::NothingFound => Listing::NothingFound,
        }
    }
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Listing::NothingFound
    }
}
