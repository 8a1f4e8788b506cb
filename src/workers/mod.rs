pub mod revoked_token_cleanup;

pub use revoked_token_cleanup::revoked_token_cleanup_worker;
