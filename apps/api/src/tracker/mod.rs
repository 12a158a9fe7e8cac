// Job application tracker: plain CRUD over the job_applications table.

pub mod handlers;
pub mod store;
