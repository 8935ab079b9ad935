//! Platform-agnostic adapters for hosts without a native settings store.

mod json_file_store;
mod selected_account_source;

pub use json_file_store::JsonFileStore;
pub use selected_account_source::SelectedAccountSource;
