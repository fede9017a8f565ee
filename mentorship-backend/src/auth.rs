//! Token authentication and group checks. Tokens, group memberships and
//! ownership are looked up on every request.

use core::marker::PhantomData;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use mentorship_database::auth::{self, CURATORS_GROUP, STUDENTS_GROUP};
use mentorship_database::{people, AsyncPgConnection, Owner};
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;
use crate::extract::Path;
use crate::AppState;

/// The key from an `Authorization: Token <key>` or `Bearer <key>` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token(pub String);

fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();
    let known = scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer");
    (known && !token.is_empty()).then_some(token)
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Token {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_authorization)
            .map(|token| Self(token.to_owned()))
            .ok_or(AppError::Unauthorized)
    }
}

async fn credentials_of(conn: &mut AsyncPgConnection, Token(token): &Token) -> Result<i32, AppError> {
    auth::authenticate(conn, token)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Any logged in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated {
    pub credentials_id: i32,
}

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = Token::from_request_parts(parts, state).await?;
        let mut conn = state.pool.get().await?;
        let credentials_id = credentials_of(&mut conn, &token).await?;
        Ok(Self { credentials_id })
    }
}

/// Which routes a handler serves and who may call them.
pub trait Scope: Send + Sync + 'static {
    /// Membership in any of these groups grants access.
    const GROUPS: &'static [&'static str];

    /// Members of this group only get in as the `:owner` of the path.
    const SELF_SERVICE: Option<&'static str> = None;

    /// Restriction derived from the `:owner` path segment.
    fn owner(id: Option<i32>) -> Option<Owner>;
}

/// A scope nested below a curator or a student.
pub trait Side: Scope {
    fn owner_of(id: i32) -> Owner;
}

/// Unnested routes, available to curators.
pub enum Staff {}

/// Routes below `/curators/:owner`.
pub enum CuratorSide {}

/// Routes below `/students/:owner`.
pub enum StudentSide {}

impl Scope for Staff {
    const GROUPS: &'static [&'static str] = &[CURATORS_GROUP];

    fn owner(_id: Option<i32>) -> Option<Owner> {
        None
    }
}

impl Scope for CuratorSide {
    const GROUPS: &'static [&'static str] = &[CURATORS_GROUP];

    fn owner(id: Option<i32>) -> Option<Owner> {
        id.map(Self::owner_of)
    }
}

impl Side for CuratorSide {
    fn owner_of(id: i32) -> Owner {
        Owner::Curator(id)
    }
}

impl Scope for StudentSide {
    const GROUPS: &'static [&'static str] = &[CURATORS_GROUP];
    const SELF_SERVICE: Option<&'static str> = Some(STUDENTS_GROUP);

    fn owner(id: Option<i32>) -> Option<Owner> {
        id.map(Self::owner_of)
    }
}

impl Side for StudentSide {
    fn owner_of(id: i32) -> Owner {
        Owner::Student(id)
    }
}

#[derive(Deserialize, Debug)]
struct OwnerSegment {
    owner: Option<i32>,
}

const fn acts_as_self(credentials_id: i32, owner_login: Option<i32>) -> bool {
    matches!(owner_login, Some(login) if login == credentials_id)
}

/// Proof that the caller belongs to one of `S::GROUPS`, or to
/// `S::SELF_SERVICE` and is the path's owner.
#[derive(Debug)]
pub struct Access<S> {
    pub credentials_id: i32,
    scope: PhantomData<fn() -> S>,
}

#[async_trait]
impl<S: Scope> FromRequestParts<AppState> for Access<S> {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = Token::from_request_parts(parts, state).await?;
        let mut conn = state.pool.get().await?;
        let credentials_id = credentials_of(&mut conn, &token).await?;
        let access = Self {
            credentials_id,
            scope: PhantomData,
        };
        if auth::is_member_of_any(&mut conn, credentials_id, S::GROUPS).await? {
            return Ok(access);
        }
        if let Some(group) = S::SELF_SERVICE {
            let Path(segment) = Path::<OwnerSegment>::from_request_parts(parts, state).await?;
            if let Some(owner) = S::owner(segment.owner) {
                if auth::is_member_of_any(&mut conn, credentials_id, &[group]).await?
                    && acts_as_self(
                        credentials_id,
                        people::owner_credentials(&mut conn, owner).await?,
                    )
                {
                    return Ok(access);
                }
            }
        }
        debug!(credentials_id, groups = ?S::GROUPS, "permission denied");
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn accepts_token_and_bearer_schemes() {
        assert_eq!(parse_authorization("Token abc123"), Some("abc123"));
        assert_eq!(parse_authorization("Bearer abc123"), Some("abc123"));
        assert_eq!(parse_authorization("bearer  abc123 "), Some("abc123"));
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(parse_authorization("Basic dXNlcjpwdw=="), None);
        assert_eq!(parse_authorization("Token"), None);
        assert_eq!(parse_authorization("Token   "), None);
        assert_eq!(parse_authorization(""), None);
    }

    #[test]
    fn nested_scopes_restrict_to_the_owner() {
        assert_eq!(Staff::owner(Some(4)), None);
        assert_eq!(CuratorSide::owner(Some(4)), Some(Owner::Curator(4)));
        assert_eq!(StudentSide::owner(Some(4)), Some(Owner::Student(4)));
    }

    #[test]
    fn students_only_act_for_themselves() {
        assert_eq!(StudentSide::GROUPS, &[CURATORS_GROUP]);
        assert_eq!(StudentSide::SELF_SERVICE, Some(STUDENTS_GROUP));
        assert_eq!(CuratorSide::SELF_SERVICE, None);
        assert_eq!(Staff::SELF_SERVICE, None);
        assert!(acts_as_self(7, Some(7)));
        assert!(!acts_as_self(7, Some(8)));
        assert!(!acts_as_self(7, None));
    }
}
