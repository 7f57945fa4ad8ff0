pub use crate::dataset::book_catalog::{
    AgeBucket, BookRecord, PageBucket, book_attribute_domain,
};
pub use crate::dataset::snapshot::{BookGenre, Snapshot, UserRate};
pub use crate::dataset::{
    AttributeDomain, AttributeVector, Dataset, Item, ItemCatalog, ItemId, Label, UserHistories,
    UserId,
};
