#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::response::content::RawHtml;

mod boot;
mod contact;
mod db;
mod gallery;
mod models;
mod render;
mod routes;
mod security;
mod store;
mod uploads;

#[cfg(test)]
mod tests;

use security::auth::{CredentialVerifier, FixedCredentials};
use store::PortfolioStore;
use uploads::PendingUploads;

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin Pages", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with("/admin") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    // Boot check — verify/create directories, validate critical files
    boot::run();

    let pool = db::init_pool().expect("Failed to initialize database pool");
    db::run_migrations(&pool).expect("Failed to run database migrations");

    let store = PortfolioStore::new(pool.clone(), store::EXPORT_PATH);
    store.load();

    let verifier: Arc<dyn CredentialVerifier> = Arc::new(FixedCredentials::default());

    rocket::build()
        .manage(pool)
        .manage(store)
        .manage(verifier)
        .manage(PendingUploads::new())
        .attach(NoCacheAdmin)
        .mount("/static", FileServer::from("website/static"))
        .mount("/", routes::public::routes())
        .mount("/admin", routes::admin::routes())
        .mount("/admin", routes::auth::routes())
        .register("/", catchers![not_found, server_error])
}
