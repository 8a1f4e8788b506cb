pub mod helpers;
pub mod test_app;

pub use helpers::{TestUser, auth_header, promote_to_admin, register_user, unique_suffix};
pub use test_app::TestApp;
