//! InMemory Repository 実装

mod history;
mod room;

pub use history::InMemoryHistoryStore;
pub use room::InMemoryRoomRepository;
