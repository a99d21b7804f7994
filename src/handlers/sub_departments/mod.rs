// handlers/sub_departments/mod.rs - Sub-department handlers

pub mod create; // POST /sub-departments
pub mod delete; // DELETE /sub-departments/:id
pub mod list;   // GET /sub-departments
pub mod show;   // GET /sub-departments/:id
pub mod update; // PUT /sub-departments/:id

pub use create::sub_department_create;
pub use delete::sub_department_delete;
pub use list::sub_department_list;
pub use show::sub_department_show;
pub use update::sub_department_update;
