//! Authentication adapters.

mod mock;
mod supabase;

pub use mock::MockSessionValidator;
pub use supabase::{SupabaseConfig, SupabaseSessionValidator};
