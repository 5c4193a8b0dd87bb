//! Public portfolio rendering: the gallery grid and the full-page lightbox.
//! All markup is built with `format!` + `html_escape`; the lightbox itself is
//! a small state machine so navigation stays correct at the boundaries.

use crate::models::project::Project;
use crate::render::html_escape;

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300x200?text=No+Image";

/// Open states of the lightbox. "Closed" is the gallery page with no
/// `Lightbox` value at all, which is how closing stays idempotent: there is
/// nothing left to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxState {
    OpenSingle,
    OpenGallery,
}

/// One opened lightbox, seeded from a single record. Every view builds a
/// fresh instance from the addressed record, so navigation can never act on
/// a previously opened gallery.
#[derive(Debug, Clone)]
pub struct Lightbox {
    title: String,
    images: Vec<String>,
    index: usize,
}

impl Lightbox {
    /// Open on a record's image set at `start` (clamped into range). A
    /// record without images shows the placeholder as a one-image gallery.
    pub fn open(project: &Project, start: usize) -> Self {
        let images = if project.images.is_empty() {
            vec![PLACEHOLDER_IMAGE.to_string()]
        } else {
            project.images.clone()
        };
        let index = start.min(images.len() - 1);
        Lightbox {
            title: project.title.clone(),
            images,
            index,
        }
    }

    pub fn state(&self) -> LightboxState {
        if self.images.len() > 1 {
            LightboxState::OpenGallery
        } else {
            LightboxState::OpenSingle
        }
    }

    pub fn current_image(&self) -> &str {
        &self.images[self.index]
    }

    pub fn caption(&self) -> String {
        format!("{} ({}/{})", self.title, self.index + 1, self.images.len())
    }

    /// Wrap-around index one step forward.
    pub fn next_index(&self) -> usize {
        (self.index + 1) % self.images.len()
    }

    /// Wrap-around index one step back.
    pub fn prev_index(&self) -> usize {
        (self.index + self.images.len() - 1) % self.images.len()
    }
}

// ── Markup ──────────────────────────────────────────────

/// Render the public gallery grid. Cards fade in with an index-proportional
/// delay; each thumbnail opens the lightbox for its record.
pub fn render_grid(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "<p>No projects yet.</p>".to_string();
    }

    let mut html = String::from(r#"<div class="portfolio-grid">"#);
    for (index, project) in projects.iter().enumerate() {
        let thumbnail = project.thumbnail().unwrap_or(PLACEHOLDER_IMAGE);
        let external = if project.link.is_empty() {
            String::new()
        } else {
            format!(
                r#"<a href="{}" target="_blank" class="card-link">Lihat Proyek Lengkap</a>"#,
                html_escape(&project.link)
            )
        };

        html.push_str(&format!(
            r#"<div class="portfolio-card" style="animation-delay:{delay:.1}s">
<a href="/project/{index}"><img src="{thumb}" alt="{title}"></a>
{external}
<div class="card-content">
<h3 class="card-title">{title}</h3>
<p class="card-desc">{desc}</p>
</div>
</div>"#,
            delay = index as f32 * 0.1,
            index = index,
            thumb = html_escape(thumbnail),
            title = html_escape(&project.title),
            external = external,
            desc = html_escape(&project.description),
        ));
    }
    html.push_str("</div>");
    html
}

/// Render the full-page modal for one opened lightbox. Prev/next controls
/// only appear for multi-image sets; the close control returns to the
/// gallery, which is a no-op when already there.
pub fn render_modal(lightbox: &Lightbox, project_index: usize) -> String {
    let image = format!(
        r#"<img src="{}" alt="{}">"#,
        html_escape(lightbox.current_image()),
        html_escape(&lightbox.title)
    );

    let stage = match lightbox.state() {
        LightboxState::OpenGallery => format!(
            r#"<div class="modal-gallery">
<a class="gallery-nav" href="/project/{idx}?image={prev}">&lt;</a>
{image}
<a class="gallery-nav" href="/project/{idx}?image={next}">&gt;</a>
</div>"#,
            idx = project_index,
            prev = lightbox.prev_index(),
            next = lightbox.next_index(),
            image = image,
        ),
        LightboxState::OpenSingle => image,
    };

    format!(
        r#"<div class="modal-backdrop">
<a class="modal-close" href="/">&times;</a>
{stage}
<div class="modal-caption">{caption}</div>
</div>"#,
        stage = stage,
        caption = html_escape(&lightbox.caption()),
    )
}
