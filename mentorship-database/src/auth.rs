//! Password credentials, API tokens and permission groups.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString};
use argon2::Argon2;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng as _};
use serde::Serialize;
use tracing::warn;

use crate::error::DatabaseError;
use crate::models::{Credentials, NewCredentials};
use crate::schema::{auth_token, credentials, permission_group, permission_group_member};

pub const CURATORS_GROUP: &str = "curators";
pub const STUDENTS_GROUP: &str = "students";

const TOKEN_LENGTH: usize = 40;
const SALT_LENGTH: usize = 16;

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct LoginToken {
    pub token: String,
    pub user_id: i32,
}

fn random_string(length: usize) -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Argon2id in PHC string format, salt included.
pub fn hash_password(password: &str) -> Result<String, DatabaseError> {
    let mut salt = [0_u8; SALT_LENGTH];
    thread_rng().fill(&mut salt);
    let salt = SaltString::encode_b64(&salt)?;
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// A stored hash that does not parse never matches.
#[must_use]
pub fn verify_password(credentials: &Credentials, password: &str) -> bool {
    PasswordHash::new(&credentials.password_hash).is_ok_and(|hash| {
        Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok()
    })
}

/// Stores a new login and adds it to `groups`. Unknown group names are
/// ignored.
pub async fn create_credentials(
    conn: &mut AsyncPgConnection,
    username: &str,
    password: &str,
    groups: &[&str],
) -> Result<i32, DatabaseError> {
    let password_hash = hash_password(password)?;
    let id = diesel::insert_into(credentials::table)
        .values(NewCredentials {
            username,
            password_hash: &password_hash,
        })
        .returning(credentials::id)
        .get_result(conn)
        .await?;
    let group_ids: Vec<i32> = permission_group::table
        .filter(permission_group::name.eq_any(groups.iter().copied()))
        .select(permission_group::id)
        .load(conn)
        .await?;
    let memberships: Vec<_> = group_ids
        .into_iter()
        .map(|group_id| {
            (
                permission_group_member::group_id.eq(group_id),
                permission_group_member::credentials_id.eq(id),
            )
        })
        .collect();
    if !memberships.is_empty() {
        diesel::insert_into(permission_group_member::table)
            .values(memberships)
            .execute(conn)
            .await?;
    }
    Ok(id)
}

/// `None` if the username is unknown or the password is wrong. Each login
/// has at most one token; logging in again returns it until [`logout`].
pub async fn login(
    conn: &mut AsyncPgConnection,
    username: &str,
    password: &str,
) -> Result<Option<LoginToken>, DatabaseError> {
    let found = credentials::table
        .filter(credentials::username.eq(username))
        .select(Credentials::as_select())
        .first(conn)
        .await
        .optional()?;
    let Some(found) = found.filter(|found| verify_password(found, password)) else {
        warn!(username, "rejected login");
        return Ok(None);
    };
    diesel::insert_into(auth_token::table)
        .values((
            auth_token::key.eq(random_string(TOKEN_LENGTH)),
            auth_token::credentials_id.eq(found.id),
        ))
        .on_conflict(auth_token::credentials_id)
        .do_nothing()
        .execute(conn)
        .await?;
    let token = auth_token::table
        .filter(auth_token::credentials_id.eq(found.id))
        .select(auth_token::key)
        .first(conn)
        .await?;
    Ok(Some(LoginToken {
        token,
        user_id: found.id,
    }))
}

/// Returns whether the token existed.
pub async fn logout(conn: &mut AsyncPgConnection, token: &str) -> Result<bool, DatabaseError> {
    let deleted = diesel::delete(auth_token::table.find(token))
        .execute(conn)
        .await?;
    Ok(deleted > 0)
}

/// The credentials a token belongs to.
pub async fn authenticate(
    conn: &mut AsyncPgConnection,
    token: &str,
) -> Result<Option<i32>, DatabaseError> {
    Ok(auth_token::table
        .find(token)
        .select(auth_token::credentials_id)
        .first(conn)
        .await
        .optional()?)
}

pub async fn is_member_of_any(
    conn: &mut AsyncPgConnection,
    credentials_id: i32,
    groups: &[&str],
) -> Result<bool, DatabaseError> {
    let memberships: i64 = permission_group_member::table
        .inner_join(permission_group::table)
        .filter(permission_group_member::credentials_id.eq(credentials_id))
        .filter(permission_group::name.eq_any(groups.iter().copied()))
        .count()
        .get_result(conn)
        .await?;
    Ok(memberships > 0)
}
