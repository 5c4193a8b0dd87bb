use std::sync::Arc;

use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;

use crate::db::DbPool;
use crate::render;
use crate::security::auth::{self, CredentialVerifier};
use crate::store::PortfolioStore;

#[derive(FromForm)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn login_html(error: Option<&str>) -> String {
    let banner = error
        .map(|msg| render::flash_banner("error", msg))
        .unwrap_or_default();
    let body = format!(
        r#"<div class="admin-section" style="max-width:420px;margin:40px auto">
<h2>Admin Login</h2>
{banner}
<form method="post" action="/admin/login">
<div class="field"><label for="username">Username</label><input type="text" id="username" name="username" required></div>
<div class="field"><label for="password">Password</label><input type="password" id="password" name="password" required></div>
<button type="submit" class="btn">Log In</button>
</form>
</div>"#,
        banner = banner
    );
    render::page("Admin Login", &body)
}

/// An already-active session skips the login prompt.
#[get("/login")]
pub fn login_page(pool: &State<DbPool>) -> Result<Redirect, RawHtml<String>> {
    if auth::session_active(pool) {
        return Ok(Redirect::to("/admin"));
    }
    Err(RawHtml(login_html(None)))
}

#[post("/login", data = "<form>")]
pub fn login_submit(
    form: Form<LoginForm>,
    pool: &State<DbPool>,
    store: &State<PortfolioStore>,
    verifier: &State<Arc<dyn CredentialVerifier>>,
) -> Result<Redirect, RawHtml<String>> {
    if !verifier.verify(&form.username, &form.password) {
        return Err(RawHtml(login_html(Some("Wrong username or password"))));
    }

    if let Err(e) = auth::establish_session(pool) {
        log::error!("Failed to set session flag: {}", e);
        return Err(RawHtml(login_html(Some("Login failed, please try again"))));
    }

    // Refresh the working copy now that the panel is open.
    store.load();
    Ok(Redirect::to("/admin"))
}

#[get("/logout")]
pub fn logout(pool: &State<DbPool>, store: &State<PortfolioStore>) -> Redirect {
    if let Err(e) = auth::destroy_session(pool) {
        log::warn!("Failed to clear session flag: {}", e);
    }
    // Drop the working copy, then reload it the way a page refresh would, so
    // the public gallery keeps serving the persisted list.
    store.clear();
    store.load();
    Redirect::to("/admin/login")
}

/// Catch-all for any /admin/* page that failed the AdminSession guard.
/// Fires when the guard returns Forward(Unauthorized).
#[get("/<_path..>", rank = 99)]
pub fn admin_redirect_to_login(_path: std::path::PathBuf) -> Redirect {
    Redirect::to("/admin/login")
}

pub fn routes() -> Vec<rocket::Route> {
    routes![login_page, login_submit, logout, admin_redirect_to_login]
}
