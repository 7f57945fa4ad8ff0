use super::{BookRecord, ItemCatalog, ItemId, Label, UserHistories, UserId};
use crate::error::IoError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// One genre assigned to one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookGenre {
    pub book_id: ItemId,
    pub genre: String,
}

/// One rating given by one user to one book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRate {
    pub user_id: UserId,
    pub book_id: ItemId,
    pub rating: Label,
}

/// A point-in-time export of books, their genres and user ratings.
///
/// The JSON layout holds one array per table:
///
/// ```json
/// {
///   "books":       [{"book_id": 1, "num_pages": 320, "publication_date": "1954-07-29"}],
///   "book_genres": [{"book_id": 1, "genre": "fantasy, paranormal"}],
///   "user_rates":  [{"user_id": "u1", "book_id": 1, "rating": 5}]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub books: Vec<BookRecord>,
    #[serde(default)]
    pub book_genres: Vec<BookGenre>,
    #[serde(default)]
    pub user_rates: Vec<UserRate>,
}

impl Snapshot {
    /// Reads a snapshot from a JSON file.
    ///
    /// # Returns
    ///
    /// - `Ok(Snapshot)` - The parsed snapshot
    /// - `Err(IoError)` - If the file cannot be opened or is not a valid snapshot
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let reader = IoError::load_in_buf_reader(path)?;
        Self::from_reader(reader)
    }

    /// Reads a snapshot from any JSON source.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, IoError> {
        serde_json::from_reader(reader).map_err(IoError::JsonError)
    }

    /// Builds the item catalog, bucketing every book with the genres assigned to it.
    pub fn catalog(&self) -> ItemCatalog {
        let mut genres: AHashMap<ItemId, Vec<&str>> = AHashMap::new();
        for entry in &self.book_genres {
            genres
                .entry(entry.book_id)
                .or_default()
                .push(entry.genre.as_str());
        }

        self.books
            .iter()
            .map(|book| {
                let book_genres = genres
                    .get(&book.book_id)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                (book.book_id, book.to_item(book_genres))
            })
            .collect()
    }

    /// Groups ratings by user. A later rating of the same book by the same user
    /// replaces the earlier one.
    pub fn histories(&self) -> UserHistories {
        let mut histories = UserHistories::new();
        for rate in &self.user_rates {
            histories
                .entry(rate.user_id.clone())
                .or_default()
                .insert(rate.book_id, rate.rating);
        }
        histories
    }
}
