pub mod metrics;
pub mod providers;
pub mod store;
pub mod word_store;
pub mod words;

pub use metrics::{get_metrics, init_metrics};
pub use store::{KvStore, MemoryKvStore, RedisKvStore};
pub use word_store::WordStore;
pub use words::{WordGenerator, WordsError};
