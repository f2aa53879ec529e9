use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::{doctor::get_doctor_profile_by_actor, uuid_column};
use crate::db::DatabaseError;
use crate::models::enums::Role;
use crate::models::*;

pub fn insert_actor(conn: &Connection, actor: &ActorRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO actors (id, display_name, role) VALUES (?1, ?2, ?3)",
        params![actor.id.to_string(), actor.display_name, actor.role.as_str()],
    )?;
    Ok(())
}

/// Loads an actor with their role resolved. Doctors get their profile
/// attached when one exists.
pub fn get_actor(conn: &Connection, id: &Uuid) -> Result<Option<Actor>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, display_name, role FROM actors WHERE id = ?1",
            params![id.to_string()],
            |row| Ok((uuid_column(row, 0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
        )
        .optional()?;

    let Some((id, display_name, role)) = row else {
        return Ok(None);
    };

    let actor = match Role::from_str(&role)? {
        Role::Patient => Actor::patient(id, display_name),
        Role::Doctor => {
            let profile = get_doctor_profile_by_actor(conn, &id)?;
            Actor::doctor(id, display_name, profile)
        }
    };
    Ok(Some(actor))
}
