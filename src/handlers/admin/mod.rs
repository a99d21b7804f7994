// handlers/admin/mod.rs - Admin account handlers
//
// Login only checks credentials; no session or token is issued.

pub mod login; // POST /admin/login
pub mod seed;  // POST /admin/seed

pub use login::admin_login;
pub use seed::admin_seed;
