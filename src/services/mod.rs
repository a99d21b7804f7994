pub mod admin_service;
pub mod case_query;
pub mod case_service;
pub mod department_service;
pub mod mail_service;
pub mod reminder_service;
pub mod statistics_service;
pub mod sub_department_service;
