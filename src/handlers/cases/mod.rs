// handlers/cases/mod.rs - Case record handlers
//
// Listing goes through the case query builder; single-record operations
// address cases by UUID.

pub mod create; // POST /cases
pub mod delete; // DELETE /cases/:id
pub mod list;   // GET /cases
pub mod show;   // GET /cases/:id
pub mod update; // PUT /cases/:id

pub use create::case_create;
pub use delete::case_delete;
pub use list::case_list;
pub use show::case_show;
pub use update::case_update;
