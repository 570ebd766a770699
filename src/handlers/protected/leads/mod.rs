pub mod collection;
pub mod record;
pub mod search;
pub mod utils;

// Re-export handler functions for use in routing
pub use collection::post as lead_add;
pub use collection::get as lead_list;
pub use record::get as lead_get;
pub use record::put as lead_edit;
pub use record::delete as lead_delete;
pub use search::get as lead_search;
