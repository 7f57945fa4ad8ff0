use super::{AttributeDomain, AttributeVector, Item, ItemId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Genre flags every book carries, each with the values `"0"` and `"1"`.
pub const GENRES: [&str; 10] = [
    "history, historical fiction, biography",
    "children",
    "romance",
    "fantasy, paranormal",
    "fiction",
    "mystery, thriller, crime",
    "poetry",
    "young-adult",
    "non-fiction",
    "comics, graphic",
];

/// Attribute holding the length bucket of a book.
pub const PAGES: &str = "pages";
/// Attribute holding the publication-age bucket of a book.
pub const AGE: &str = "age";

/// Books with more pages than this are `"Long"`.
pub const LONG_BOOK_PAGES: u32 = 400;
/// Books with more pages than this (and not long) are `"Medium"`.
pub const MEDIUM_BOOK_PAGES: u32 = 150;

/// Length bucket of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageBucket {
    Short,
    Medium,
    Long,
}

impl PageBucket {
    pub fn from_pages(num_pages: u32) -> Self {
        if num_pages > LONG_BOOK_PAGES {
            PageBucket::Long
        } else if num_pages > MEDIUM_BOOK_PAGES {
            PageBucket::Medium
        } else {
            PageBucket::Short
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PageBucket::Short => "Short",
            PageBucket::Medium => "Medium",
            PageBucket::Long => "Long",
        }
    }
}

/// Publication-age bucket of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    Old,
    New,
    Mid,
}

impl AgeBucket {
    /// Books published before 1900-01-01 are old, after 2000-01-01 new, everything
    /// in between (both boundary days included) is mid.
    pub fn from_date(date: NaiveDate) -> Self {
        let (old_before, new_after) = match (
            NaiveDate::from_ymd_opt(1900, 1, 1),
            NaiveDate::from_ymd_opt(2000, 1, 1),
        ) {
            (Some(old_before), Some(new_after)) => (old_before, new_after),
            _ => unreachable!("age bucket boundaries are valid dates"),
        };

        if date < old_before {
            AgeBucket::Old
        } else if date > new_after {
            AgeBucket::New
        } else {
            AgeBucket::Mid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeBucket::Old => "Old",
            AgeBucket::New => "New",
            AgeBucket::Mid => "Mid",
        }
    }
}

/// The attribute domain of books: ten genre flags plus the length and age buckets.
///
/// # Example
/// ```rust
/// use shelftree::dataset::book_attribute_domain;
///
/// let domain = book_attribute_domain();
/// assert_eq!(domain.len(), 12);
/// assert_eq!(domain.values("pages").unwrap(), ["Short", "Medium", "Long"]);
/// ```
pub fn book_attribute_domain() -> AttributeDomain {
    let mut attributes: Vec<(&str, Vec<&str>)> = GENRES
        .iter()
        .map(|&genre| (genre, vec!["0", "1"]))
        .collect();
    attributes.push((PAGES, vec!["Short", "Medium", "Long"]));
    attributes.push((AGE, vec!["Old", "New", "Mid"]));

    match AttributeDomain::new(attributes) {
        Ok(domain) => domain,
        Err(e) => unreachable!("book attribute domain is statically valid: {}", e),
    }
}

/// A raw book record before its attributes are bucketed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub book_id: ItemId,
    pub num_pages: u32,
    pub publication_date: NaiveDate,
}

impl BookRecord {
    /// Converts the record into an item of the book attribute domain.
    ///
    /// Every genre listed in `genres` is flagged `"1"`, the remaining genre flags are
    /// `"0"`. Genre names outside [`GENRES`] are ignored.
    ///
    /// # Example
    /// ```rust
    /// use chrono::NaiveDate;
    /// use shelftree::dataset::BookRecord;
    ///
    /// let record = BookRecord {
    ///     book_id: 7,
    ///     num_pages: 320,
    ///     publication_date: NaiveDate::from_ymd_opt(1954, 7, 29).unwrap(),
    /// };
    /// let item = record.to_item(&["fantasy, paranormal"]);
    /// assert_eq!(item.value("pages"), "Medium");
    /// assert_eq!(item.value("age"), "Mid");
    /// assert_eq!(item.value("fantasy, paranormal"), "1");
    /// assert_eq!(item.value("poetry"), "0");
    /// ```
    pub fn to_item<S: AsRef<str>>(&self, genres: &[S]) -> Item {
        let mut attributes = AttributeVector::with_capacity(GENRES.len() + 2);

        for genre in GENRES {
            attributes.insert(genre.to_string(), "0".to_string());
        }
        for genre in genres {
            if let Some(slot) = attributes.get_mut(genre.as_ref()) {
                *slot = "1".to_string();
            }
        }

        attributes.insert(
            PAGES.to_string(),
            PageBucket::from_pages(self.num_pages).as_str().to_string(),
        );
        attributes.insert(
            AGE.to_string(),
            AgeBucket::from_date(self.publication_date).as_str().to_string(),
        );

        Item::new(self.book_id, attributes)
    }
}
