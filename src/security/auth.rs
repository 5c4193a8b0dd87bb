use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::State;

use crate::db::DbPool;
use crate::models::slot::Slot;

/// Slot marking an active admin session: `"true"` or absent.
pub const SESSION_SLOT: &str = "loggedIn";

// ── Credential verification ──

/// Seam for the credential check. The shipped implementation compares one
/// fixed pair; a real deployment would drop in something backed by hashes
/// without touching the login flow.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// The single admin credential pair. Both submitted fields are trimmed, then
/// compared exactly and case-sensitively.
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(username: &str, password: &str) -> Self {
        FixedCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

impl Default for FixedCredentials {
    fn default() -> Self {
        FixedCredentials::new("adminyogga", "010101")
    }
}

impl CredentialVerifier for FixedCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username.trim() == self.username && password.trim() == self.password
    }
}

// ── Session flag ──

pub fn establish_session(pool: &DbPool) -> Result<(), String> {
    Slot::set(pool, SESSION_SLOT, "true")
}

pub fn destroy_session(pool: &DbPool) -> Result<(), String> {
    Slot::delete(pool, SESSION_SLOT)
}

pub fn session_active(pool: &DbPool) -> bool {
    Slot::get_or(pool, SESSION_SLOT, "false") == "true"
}

// ── Request guard ──

/// Guard: admitted while the session flag is set. Guarded routes forward on
/// a missing flag and the rank-99 catch-all sends the visitor to the login
/// page.
pub struct AdminSession;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AdminSession {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let pool = match request.guard::<&State<DbPool>>().await.succeeded() {
            Some(pool) => pool,
            None => return Outcome::Forward(Status::Unauthorized),
        };

        if session_active(pool) {
            Outcome::Success(AdminSession)
        } else {
            Outcome::Forward(Status::Unauthorized)
        }
    }
}
