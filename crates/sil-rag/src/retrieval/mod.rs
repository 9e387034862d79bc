//! Vector retrieval: index, nearest-neighbour search and relevance filtering

mod filter;
mod index;
mod search;

pub use filter::{filter_by_distance, RelevanceFilter};
pub use index::{cosine_distance, VectorIndex};
pub use search::Retriever;
