pub mod levels;
pub mod packs;
pub mod scheduler;
pub mod variants;
