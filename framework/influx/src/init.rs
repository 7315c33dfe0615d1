use crate::{Database, DatabaseError};

/// Make sure the database `name` exists and select it for writing.
///
/// Safe to call repeatedly, the database is only created if the server doesn't list it yet.
pub fn ensure_database<D>(database: &mut D, name: &str) -> Result<(), DatabaseError>
where
    D: Database + ?Sized,
{
    let existing = database.list_databases()?;
    log::debug!("Found {} databases on the server", existing.len());

    if !existing.iter().any(|n| n == name) {
        log::debug!("Creating database {name}");
        database.create_database(name)?;
    }

    database.use_database(name)
}
