pub mod memory;
pub mod state;
pub mod store;
pub mod supabase;
pub mod supabase_store;

pub use memory::MemoryStore;
pub use state::AppState;
pub use store::{ClinicStore, StoreError};
pub use supabase_store::SupabaseStore;
