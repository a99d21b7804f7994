// handlers/email_reminders/mod.rs - Reminder log handlers
//
// Recording a reminder only stores the fact and bumps the case counters;
// nothing is delivered from here.

pub mod create; // POST /email-reminders
pub mod list;   // GET /email-reminders/case/:caseId

pub use create::reminder_create;
pub use list::reminder_list;
