use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::models::{NewStudent, Student};

fn student_from_row(row: &Row<'_>) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        name: row.get(1)?,
        course: row.get(2)?,
        mobile: row.get(3)?,
    })
}

/// Load every student in insertion order. This is the query the table
/// re-runs whenever it repaints.
pub fn fetch_students(conn: &Connection) -> Result<Vec<Student>> {
    let mut stmt = conn
        .prepare("SELECT id, name, course, mobile FROM students ORDER BY id")
        .context("failed to prepare student query")?;

    let students = stmt
        .query_map([], student_from_row)
        .context("failed to load students")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect students")?;

    debug!(count = students.len(), "fetched students");
    Ok(students)
}

/// Look up a single student by primary key.
pub fn fetch_student(conn: &Connection, id: i64) -> Result<Option<Student>> {
    conn.query_row(
        "SELECT id, name, course, mobile FROM students WHERE id = ?1",
        params![id],
        student_from_row,
    )
    .optional()
    .context("failed to load student")
}

/// Case-insensitive substring match on the name column. A blank query
/// matches nothing rather than everything.
pub fn search_students(conn: &Connection, name: &str) -> Result<Vec<Student>> {
    let query = name.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let pattern = format!("%{}%", escape_like(query));

    let mut stmt = conn
        .prepare(
            "SELECT id, name, course, mobile FROM students
             WHERE name LIKE ?1 ESCAPE '\\'
             ORDER BY id",
        )
        .context("failed to prepare student search")?;

    let students = stmt
        .query_map(params![pattern], student_from_row)
        .context("failed to search students")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect search results")?;

    debug!(query, matches = students.len(), "searched students");
    Ok(students)
}

/// Insert a student and echo back the stored row.
pub fn create_student(conn: &Connection, student: &NewStudent) -> Result<Student> {
    conn.execute(
        "INSERT INTO students (name, course, mobile) VALUES (?1, ?2, ?3)",
        params![student.name, student.course, student.mobile],
    )
    .context("failed to insert student")?;

    let id = conn.last_insert_rowid();
    info!(id, name = %student.name, "inserted student");
    Ok(Student {
        id,
        name: student.name.clone(),
        course: student.course.clone(),
        mobile: student.mobile.clone(),
    })
}

/// Overwrite every editable column of an existing student.
pub fn update_student(conn: &Connection, id: i64, student: &NewStudent) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE students SET name = ?1, course = ?2, mobile = ?3 WHERE id = ?4",
            params![student.name, student.course, student.mobile, id],
        )
        .context("failed to update student")?;

    if updated == 0 {
        Err(anyhow!("Student not found"))
    } else {
        info!(id, "updated student");
        Ok(())
    }
}

/// Remove a student row by primary key.
pub fn delete_student(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM students WHERE id = ?1", params![id])
        .context("failed to delete student")?;

    if deleted == 0 {
        Err(anyhow!("Student not found"))
    } else {
        info!(id, "deleted student");
        Ok(())
    }
}

/// Number of rows in the table, shown in the status bar.
pub fn count_students(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))
        .context("failed to count students")
}

/// Escape `LIKE` wildcards so user input is matched literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}
