// handlers/departments/mod.rs - Department handlers
//
// Departments are addressed by their integer code.

pub mod create; // POST /departments
pub mod list;   // GET /departments
pub mod seed;   // POST /seed-data
pub mod show;   // GET /departments/:id

pub use create::department_create;
pub use list::department_list;
pub use seed::department_seed;
pub use show::department_show;
