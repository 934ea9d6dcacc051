pub mod file_history;
