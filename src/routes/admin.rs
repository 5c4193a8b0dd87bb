use std::sync::atomic::{AtomicU64, Ordering};

use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::response::Redirect;
use rocket::State;

use crate::gallery::PLACEHOLDER_IMAGE;
use crate::models::project::Project;
use crate::render::{self, html_escape};
use crate::security::auth::AdminSession;
use crate::store::{PortfolioStore, ProjectEdit, EXPORT_FILENAME};
use crate::uploads::{self, PendingUploads};

// ── Dashboard ──────────────────────────────────────────

fn flash_html(flash: Option<&str>) -> String {
    match flash {
        Some("added") => render::flash_banner("success", "Project added — portfolio.json re-exported"),
        Some("updated") => render::flash_banner("success", "Project updated"),
        Some("deleted") => render::flash_banner("success", "Project deleted"),
        Some("uploaded") => render::flash_banner("success", "Images added to the selection"),
        Some("cleared") => render::flash_banner("success", "Pending images cleared"),
        Some("badfile") => render::flash_banner("error", "Some files were rejected — images only, 5 MB max"),
        Some("missing") => render::flash_banner("error", "Fill in the title, the description, and pick at least one image"),
        _ => String::new(),
    }
}

fn pending_preview_html(pending: &[String]) -> String {
    if pending.is_empty() {
        return String::new();
    }

    let mut thumbs = String::new();
    for src in pending {
        thumbs.push_str(&format!(r#"<img src="{}" alt="pending image">"#, html_escape(src)));
    }
    format!(
        r#"<div class="preview-strip">{thumbs}</div>
<form method="post" action="/admin/uploads/clear" style="margin-bottom:14px">
<button type="submit" class="btn btn-muted">Remove images</button>
</form>"#,
        thumbs = thumbs
    )
}

fn project_list_html(projects: &[Project]) -> String {
    if projects.is_empty() {
        return r#"<p style="color:#666;text-align:center">No projects yet.</p>"#.to_string();
    }

    let mut html = String::new();
    for (index, project) in projects.iter().enumerate() {
        let view = if project.link.is_empty() {
            String::new()
        } else {
            format!(
                r#"<a class="btn btn-muted" href="{}" target="_blank">View</a> "#,
                html_escape(&project.link)
            )
        };

        html.push_str(&format!(
            r#"<div class="project-item">
<img src="{thumb}" alt="{title}">
<div class="meta"><strong>{title}</strong><br><small>{desc}</small></div>
<div>{view}<a class="btn" href="/admin/projects/{index}/edit">Edit</a>
<a class="btn btn-danger" href="/admin/projects/{index}/delete">Delete</a></div>
</div>"#,
            thumb = html_escape(project.thumbnail().unwrap_or(PLACEHOLDER_IMAGE)),
            title = html_escape(&project.title),
            desc = html_escape(&project.short_description()),
            view = view,
            index = index,
        ));
    }
    html
}

fn dashboard_html(projects: &[Project], pending: &[String], flash: Option<&str>) -> String {
    let body = format!(
        r#"{flash}
<div class="admin-section">
<h2>Add Project</h2>
<form method="post" action="/admin/uploads" enctype="multipart/form-data">
<div class="upload-zone">
<p>Drop images here or pick files (JPG, PNG, GIF — max 5 MB each)</p>
<input type="file" name="images" multiple accept="image/*">
<button type="submit" class="btn btn-muted">Add to selection</button>
</div>
</form>
{preview}
<form method="post" action="/admin/projects">
<div class="field"><label for="title">Title</label><input type="text" id="title" name="title"></div>
<div class="field"><label for="description">Description</label><textarea id="description" name="description" rows="4"></textarea></div>
<div class="field"><label for="link">Project link (optional)</label><input type="url" id="link" name="link" placeholder="https://…"></div>
<button type="submit" class="btn">Add Project</button>
</form>
</div>
<div class="admin-section">
<h3>Projects</h3>
{list}
</div>
<p><a class="btn" href="/admin/export">Export portfolio.json</a>
<a class="btn btn-muted" href="/admin/logout">Log Out</a></p>"#,
        flash = flash_html(flash),
        preview = pending_preview_html(pending),
        list = project_list_html(projects),
    );
    render::page("Admin", &body)
}

/// The whole panel re-renders after every mutation, so list indices always
/// match the in-memory order.
#[get("/?<flash>")]
pub fn dashboard(
    _admin: AdminSession,
    store: &State<PortfolioStore>,
    pending: &State<PendingUploads>,
    flash: Option<&str>,
) -> RawHtml<String> {
    RawHtml(dashboard_html(&store.snapshot(), &pending.snapshot(), flash))
}

// ── Upload intake ──────────────────────────────────────

#[derive(FromForm)]
pub struct UploadForm<'f> {
    pub images: Vec<TempFile<'f>>,
}

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Spool one multipart part to a scratch file and return its bytes.
async fn read_upload(file: &mut TempFile<'_>) -> std::io::Result<Vec<u8>> {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::SeqCst);
    let dest = std::env::temp_dir().join(format!("folio_upload_{}_{}", std::process::id(), n));
    file.persist_to(&dest).await?;
    let bytes = std::fs::read(&dest);
    let _ = std::fs::remove_file(&dest);
    bytes
}

/// Validate every submitted file; accepted ones join the pending selection,
/// rejected ones are skipped individually.
#[post("/uploads", data = "<form>")]
pub async fn uploads_add(
    _admin: AdminSession,
    pending: &State<PendingUploads>,
    mut form: Form<UploadForm<'_>>,
) -> Redirect {
    let mut rejected = false;
    let mut accepted = false;

    for file in form.images.iter_mut() {
        if file.len() == 0 {
            continue;
        }
        let declared = file.content_type().map(|ct| ct.to_string());

        let bytes = match read_upload(file).await {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read upload: {}", e);
                rejected = true;
                continue;
            }
        };

        match uploads::encode_image(declared.as_deref(), &bytes) {
            Ok(data_uri) => {
                pending.push(data_uri);
                accepted = true;
            }
            Err(reason) => {
                log::warn!("Rejected upload: {}", reason);
                rejected = true;
            }
        }
    }

    if rejected {
        Redirect::to("/admin?flash=badfile")
    } else if accepted {
        Redirect::to("/admin?flash=uploaded")
    } else {
        Redirect::to("/admin")
    }
}

#[post("/uploads/clear")]
pub fn uploads_clear(_admin: AdminSession, pending: &State<PendingUploads>) -> Redirect {
    pending.clear();
    Redirect::to("/admin?flash=cleared")
}

// ── Create ─────────────────────────────────────────────

#[derive(FromForm)]
pub struct NewProjectForm {
    pub title: String,
    pub description: String,
    pub link: String,
}

#[post("/projects", data = "<form>")]
pub fn project_create(
    _admin: AdminSession,
    store: &State<PortfolioStore>,
    pending: &State<PendingUploads>,
    form: Form<NewProjectForm>,
) -> Redirect {
    let title = form.title.trim();
    let description = form.description.trim();
    if title.is_empty() || description.is_empty() || pending.is_empty() {
        return Redirect::to("/admin?flash=missing");
    }

    store.add(Project {
        title: title.to_string(),
        description: description.to_string(),
        images: pending.take(),
        link: form.link.trim().to_string(),
    });

    Redirect::to("/admin?flash=added")
}

// ── Edit ───────────────────────────────────────────────

#[get("/projects/<index>/edit")]
pub fn project_edit_page(
    _admin: AdminSession,
    store: &State<PortfolioStore>,
    index: usize,
) -> Option<RawHtml<String>> {
    let project = store.get(index)?;
    let body = format!(
        r#"<div class="admin-section" style="max-width:560px">
<h2>Edit Project</h2>
<form method="post" action="/admin/projects/{index}/edit">
<div class="field"><label for="title">Title</label><input type="text" id="title" name="title" value="{title}"></div>
<div class="field"><label for="description">Description</label><textarea id="description" name="description" rows="4">{desc}</textarea></div>
<div class="field"><label for="link">Project link</label><input type="url" id="link" name="link" value="{link}"></div>
<p style="color:#888;font-size:.88em;margin-bottom:14px">An empty title or description keeps the current value; clearing the link removes it.</p>
<button type="submit" class="btn">Save</button>
<a class="btn btn-muted" href="/admin">Cancel</a>
</form>
</div>"#,
        index = index,
        title = html_escape(&project.title),
        desc = html_escape(&project.description),
        link = html_escape(&project.link),
    );
    Some(RawHtml(render::page("Edit Project", &body)))
}

#[derive(FromForm)]
pub struct EditProjectForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[post("/projects/<index>/edit", data = "<form>")]
pub fn project_update(
    _admin: AdminSession,
    store: &State<PortfolioStore>,
    index: usize,
    form: Form<EditProjectForm>,
) -> Redirect {
    let edit = ProjectEdit {
        title: form.title.clone(),
        description: form.description.clone(),
        link: form.link.clone(),
    };
    match store.edit(index, edit) {
        Ok(()) => Redirect::to("/admin?flash=updated"),
        Err(_) => Redirect::to("/admin"),
    }
}

// ── Delete ─────────────────────────────────────────────

/// Deleting goes through an explicit confirmation page; nothing mutates on
/// the GET.
#[get("/projects/<index>/delete")]
pub fn project_delete_page(
    _admin: AdminSession,
    store: &State<PortfolioStore>,
    index: usize,
) -> Option<RawHtml<String>> {
    let project = store.get(index)?;
    let body = format!(
        r#"<div class="admin-section" style="max-width:480px">
<h2>Delete Project</h2>
<p style="margin-bottom:16px">Delete &ldquo;{title}&rdquo;? This cannot be undone.</p>
<form method="post" action="/admin/projects/{index}/delete">
<button type="submit" class="btn btn-danger">Delete</button>
<a class="btn btn-muted" href="/admin">Cancel</a>
</form>
</div>"#,
        title = html_escape(&project.title),
        index = index,
    );
    Some(RawHtml(render::page("Delete Project", &body)))
}

#[post("/projects/<index>/delete")]
pub fn project_delete(
    _admin: AdminSession,
    store: &State<PortfolioStore>,
    index: usize,
) -> Redirect {
    match store.delete(index) {
        Ok(()) => Redirect::to("/admin?flash=deleted"),
        Err(_) => Redirect::to("/admin"),
    }
}

// ── Export ─────────────────────────────────────────────

#[derive(Responder)]
#[response(content_type = "application/json")]
pub struct JsonDownload {
    content: String,
    disposition: Header<'static>,
}

/// Download the deployable document; also rewrites the on-disk artifact.
#[get("/export")]
pub fn export_download(_admin: AdminSession, store: &State<PortfolioStore>) -> JsonDownload {
    JsonDownload {
        content: store.export(),
        disposition: Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
        ),
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![
        dashboard,
        uploads_add,
        uploads_clear,
        project_create,
        project_edit_page,
        project_update,
        project_delete_page,
        project_delete,
        export_download,
    ]
}
