use rocket::form::Form;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::serde::json::Json;
use rocket::State;

use crate::contact::ContactMessage;
use crate::gallery::{self, Lightbox};
use crate::models::project::Project;
use crate::render;
use crate::store::PortfolioStore;

// ── Gallery ────────────────────────────────────────────

#[get("/")]
pub fn homepage(store: &State<PortfolioStore>) -> RawHtml<String> {
    let projects = store.snapshot();
    RawHtml(render::page("Portfolio", &gallery::render_grid(&projects)))
}

/// Full-page lightbox for one record. The image index wraps through the
/// prev/next links; an unknown project index is a plain 404.
#[get("/project/<index>?<image>")]
pub fn project_view(
    store: &State<PortfolioStore>,
    index: usize,
    image: Option<usize>,
) -> Option<RawHtml<String>> {
    let project = store.get(index)?;
    let lightbox = Lightbox::open(&project, image.unwrap_or(0));
    Some(RawHtml(render::page(
        &project.title,
        &gallery::render_modal(&lightbox, index),
    )))
}

/// The live document, exactly as a static host would serve it.
#[get("/portfolio.json")]
pub fn portfolio_json(store: &State<PortfolioStore>) -> Json<Vec<Project>> {
    Json(store.snapshot())
}

// ── Contact ────────────────────────────────────────────

#[derive(FromForm)]
pub struct ContactFormData {
    pub name: String,
    pub email: String,
    pub message: String,
}

fn contact_html(flash: Option<&str>) -> String {
    let banner = match flash {
        Some("missing") => render::flash_banner("error", "Please fill in your name and a message"),
        _ => String::new(),
    };
    let body = format!(
        r#"<div class="admin-section" style="max-width:560px;margin:0 auto">
<h2>Contact</h2>
<p style="color:#666;margin-bottom:16px">Send a message straight to my WhatsApp.</p>
{banner}
<form method="post" action="/contact">
<div class="field"><label for="name">Name <span style="color:#999">(required)</span></label><input type="text" id="name" name="name" placeholder="Your name"></div>
<div class="field"><label for="email">Email</label><input type="email" id="email" name="email" placeholder="your@email.com"></div>
<div class="field"><label for="message">Message <span style="color:#999">(required)</span></label><textarea id="message" name="message" rows="6" placeholder="Your message…"></textarea></div>
<button type="submit" class="btn">Send via WhatsApp</button>
</form>
</div>"#,
        banner = banner
    );
    render::page("Contact", &body)
}

#[get("/contact?<flash>")]
pub fn contact_page(flash: Option<&str>) -> RawHtml<String> {
    RawHtml(contact_html(flash))
}

/// Valid submissions are sent on to the prefilled WhatsApp deep link;
/// invalid ones come back with an inline error.
#[post("/contact", data = "<form>")]
pub fn contact_submit(form: Form<ContactFormData>) -> Redirect {
    match ContactMessage::from_input(&form.name, &form.email, &form.message) {
        Ok(message) => Redirect::to(message.deep_link()),
        Err(_) => Redirect::to("/contact?flash=missing"),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        homepage,
        project_view,
        portfolio_json,
        contact_page,
        contact_submit
    ]
}
