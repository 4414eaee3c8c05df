//! Persistence module split across logical submodules.

mod connection;
mod students;

pub use connection::{ensure_schema, open_database};
pub use students::{
    count_students, create_student, delete_student, fetch_student, fetch_students,
    search_students, update_student,
};
