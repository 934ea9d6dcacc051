pub mod file_history_repo;

pub use file_history_repo::FileHistoryRepo;
