#![cfg(test)]

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::contact::ContactMessage;
use crate::db::{run_migrations, DbPool};
use crate::gallery::{self, Lightbox, LightboxState, PLACEHOLDER_IMAGE};
use crate::models::project::Project;
use crate::models::slot::Slot;
use crate::render::html_escape;
use crate::security::auth::{self, CredentialVerifier, FixedCredentials};
use crate::store::{PortfolioStore, ProjectEdit, DATA_SLOT};
use crate::uploads::{self, PendingUploads, MAX_IMAGE_BYTES};

/// Atomic counter for unique shared-cache DB names so parallel tests don't collide.
static TEST_DB_COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);

/// Create a fresh in-memory SQLite pool with migrations applied. Uses a named
/// shared-cache in-memory DB so multiple connections see the same data.
fn test_pool() -> DbPool {
    let id = TEST_DB_COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    let uri = format!("file:testdb_{}?mode=memory&cache=shared", id);
    let manager = SqliteConnectionManager::file(uri);
    let pool = Pool::builder()
        .max_size(2)
        .build(manager)
        .expect("Failed to create test pool");
    run_migrations(&pool).expect("Failed to run migrations");
    pool
}

/// Store over a fresh pool, with the export artifact redirected into a
/// temp dir so tests never touch the real website/ tree.
fn test_store() -> (PortfolioStore, DbPool, tempfile::TempDir) {
    let pool = test_pool();
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = PortfolioStore::new(pool.clone(), dir.path().join("portfolio.json"));
    (store, pool, dir)
}

fn make_project(title: &str) -> Project {
    Project {
        title: title.to_string(),
        description: "A description".to_string(),
        images: vec!["x.png".to_string()],
        link: String::new(),
    }
}

// ═══════════════════════════════════════════════════════════
// Slots
// ═══════════════════════════════════════════════════════════

#[test]
fn slot_set_and_get() {
    let pool = test_pool();
    Slot::set(&pool, "test_key", "hello").unwrap();
    assert_eq!(Slot::get(&pool, "test_key"), Some("hello".to_string()));
}

#[test]
fn slot_get_or_default() {
    let pool = test_pool();
    assert_eq!(Slot::get_or(&pool, "nonexistent", "fallback"), "fallback");
    Slot::set(&pool, "exists", "val").unwrap();
    assert_eq!(Slot::get_or(&pool, "exists", "fallback"), "val");
}

#[test]
fn slot_upsert() {
    let pool = test_pool();
    Slot::set(&pool, "key", "first").unwrap();
    Slot::set(&pool, "key", "second").unwrap();
    assert_eq!(Slot::get(&pool, "key"), Some("second".to_string()));
}

#[test]
fn slot_delete() {
    let pool = test_pool();
    Slot::set(&pool, "key", "value").unwrap();
    assert!(Slot::get(&pool, "key").is_some());
    Slot::delete(&pool, "key").unwrap();
    assert_eq!(Slot::get(&pool, "key"), None);
}

// ═══════════════════════════════════════════════════════════
// Project records
// ═══════════════════════════════════════════════════════════

#[test]
fn decode_modern_record() {
    let list = Project::decode_list(
        r#"[{"title":"A","description":"d","images":["a.png","b.png"],"link":"https://a"}]"#,
    )
    .unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].title, "A");
    assert_eq!(list[0].images, vec!["a.png", "b.png"]);
    assert_eq!(list[0].link, "https://a");
}

#[test]
fn decode_legacy_single_image() {
    let legacy =
        Project::decode_list(r#"[{"title":"A","description":"d","image":"x.png"}]"#).unwrap();
    let modern =
        Project::decode_list(r#"[{"title":"A","description":"d","images":["x.png"],"link":""}]"#)
            .unwrap();
    // A legacy record is indistinguishable from a one-element images array.
    assert_eq!(legacy, modern);
    assert_eq!(legacy[0].images, vec!["x.png"]);
}

#[test]
fn decode_record_without_images() {
    let list = Project::decode_list(r#"[{"title":"A","description":"d"}]"#).unwrap();
    assert!(list[0].images.is_empty());
    assert_eq!(list[0].link, "");
    assert_eq!(list[0].thumbnail(), None);
}

#[test]
fn decode_legacy_empty_image_is_no_image() {
    let list = Project::decode_list(r#"[{"title":"A","description":"d","image":""}]"#).unwrap();
    assert!(list[0].images.is_empty());
}

#[test]
fn thumbnail_skips_empty_entries() {
    let mut project = make_project("A");
    project.images = vec![String::new(), "real.png".to_string()];
    assert_eq!(project.thumbnail(), Some("real.png"));
}

#[test]
fn encode_pretty_uses_two_space_indent() {
    let pretty = Project::encode_list_pretty(&[make_project("A")]);
    assert!(pretty.starts_with("[\n  {\n    \"title\""));
}

#[test]
fn short_description_truncates_at_50_chars() {
    let mut project = make_project("A");
    project.description = "x".repeat(50);
    assert_eq!(project.short_description(), "x".repeat(50));

    project.description = "x".repeat(51);
    let short = project.short_description();
    assert_eq!(short.chars().count(), 53);
    assert!(short.ends_with("..."));
}

// ═══════════════════════════════════════════════════════════
// Store: load / persist
// ═══════════════════════════════════════════════════════════

#[test]
fn load_seeds_from_fallback_document() {
    let (store, pool, dir) = test_store();
    let fallback = dir.path().join("seed.json");
    std::fs::write(
        &fallback,
        r#"[{"title":"A","description":"d","images":["a.png"],"link":""},
           {"title":"B","description":"d","image":"b.png"}]"#,
    )
    .unwrap();

    store.load_with_fallback(&fallback);

    assert_eq!(store.len(), 2);
    // The slot now mirrors the fallback content.
    let persisted = Slot::get(&pool, DATA_SLOT).expect("slot written");
    let decoded = Project::decode_list(&persisted).unwrap();
    assert_eq!(decoded, store.snapshot());
}

#[test]
fn load_missing_fallback_persists_empty_list() {
    let (store, pool, dir) = test_store();
    store.load_with_fallback(&dir.path().join("does-not-exist.json"));

    assert_eq!(store.len(), 0);
    assert_eq!(Slot::get(&pool, DATA_SLOT), Some("[]".to_string()));
}

#[test]
fn load_invalid_fallback_persists_empty_list() {
    let (store, pool, dir) = test_store();
    let fallback = dir.path().join("seed.json");
    std::fs::write(&fallback, "not json at all").unwrap();

    store.load_with_fallback(&fallback);

    assert_eq!(store.len(), 0);
    assert_eq!(Slot::get(&pool, DATA_SLOT), Some("[]".to_string()));
}

#[test]
fn load_prefers_slot_over_fallback() {
    let (store, pool, dir) = test_store();
    Slot::set(
        &pool,
        DATA_SLOT,
        r#"[{"title":"FromSlot","description":"d","images":["s.png"],"link":""}]"#,
    )
    .unwrap();
    let fallback = dir.path().join("seed.json");
    std::fs::write(
        &fallback,
        r#"[{"title":"X","description":"d","images":["x.png"],"link":""},
           {"title":"Y","description":"d","images":["y.png"],"link":""}]"#,
    )
    .unwrap();

    store.load_with_fallback(&fallback);

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().title, "FromSlot");
}

#[test]
fn load_corrupt_slot_starts_empty() {
    let (store, pool, dir) = test_store();
    Slot::set(&pool, DATA_SLOT, "{{{ garbage").unwrap();

    store.load_with_fallback(&dir.path().join("unused.json"));

    assert_eq!(store.len(), 0);
}

#[test]
fn persist_roundtrips_through_slot() {
    let (store, pool, dir) = test_store();
    store.add(make_project("A"));
    store.add(make_project("B"));

    let reloaded = PortfolioStore::new(pool.clone(), dir.path().join("again.json"));
    reloaded.load_with_fallback(&dir.path().join("unused.json"));

    assert_eq!(reloaded.snapshot(), store.snapshot());
}

// ═══════════════════════════════════════════════════════════
// Store: mutators
// ═══════════════════════════════════════════════════════════

#[test]
fn add_prepends() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("First"));
    for i in 0..4 {
        store.add(make_project(&format!("Later {}", i)));
    }

    assert_eq!(store.len(), 5);
    assert_eq!(store.get(0).unwrap().title, "Later 3");
    // After K further additions the original sits at index K.
    assert_eq!(store.get(4).unwrap().title, "First");
}

#[test]
fn delete_removes_one_and_shifts() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("C"));
    store.add(make_project("B"));
    store.add(make_project("A"));

    store.delete(1).unwrap();

    assert_eq!(store.len(), 2);
    assert_eq!(store.get(0).unwrap().title, "A");
    assert_eq!(store.get(1).unwrap().title, "C");
}

#[test]
fn delete_out_of_range_is_an_error() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("A"));
    assert!(store.delete(5).is_err());
    assert_eq!(store.len(), 1);
}

#[test]
fn edit_withdrawn_title_is_a_noop() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("Original"));

    store
        .edit(
            0,
            ProjectEdit {
                title: None,
                description: Some("changed".to_string()),
                link: Some("https://x".to_string()),
            },
        )
        .unwrap();

    let project = store.get(0).unwrap();
    assert_eq!(project.title, "Original");
    assert_eq!(project.description, "A description");
    assert_eq!(project.link, "");
}

#[test]
fn edit_empty_title_keeps_previous_value() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("Original"));

    store
        .edit(
            0,
            ProjectEdit {
                title: Some("   ".to_string()),
                description: Some("New description".to_string()),
                link: Some("https://x".to_string()),
            },
        )
        .unwrap();

    let project = store.get(0).unwrap();
    assert_eq!(project.title, "Original");
    assert_eq!(project.description, "New description");
    assert_eq!(project.link, "https://x");
}

#[test]
fn edit_empty_link_clears_it() {
    let (store, _pool, _dir) = test_store();
    let mut project = make_project("A");
    project.link = "https://old".to_string();
    store.add(project);

    store
        .edit(
            0,
            ProjectEdit {
                title: Some("A".to_string()),
                description: Some("d".to_string()),
                link: Some("".to_string()),
            },
        )
        .unwrap();

    assert_eq!(store.get(0).unwrap().link, "");
}

#[test]
fn edit_trims_submitted_fields() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("A"));

    store
        .edit(
            0,
            ProjectEdit {
                title: Some("  Spaced Out  ".to_string()),
                description: Some("  tidy  ".to_string()),
                link: Some("  https://x  ".to_string()),
            },
        )
        .unwrap();

    let project = store.get(0).unwrap();
    assert_eq!(project.title, "Spaced Out");
    assert_eq!(project.description, "tidy");
    assert_eq!(project.link, "https://x");
}

#[test]
fn edit_out_of_range_is_an_error() {
    let (store, _pool, _dir) = test_store();
    assert!(store
        .edit(
            0,
            ProjectEdit {
                title: Some("A".to_string()),
                description: Some("d".to_string()),
                link: None,
            },
        )
        .is_err());
}

#[test]
fn scenario_add_add_delete() {
    let (store, _pool, _dir) = test_store();
    assert_eq!(store.len(), 0);

    store.add(Project {
        title: "A".to_string(),
        description: "d".to_string(),
        images: vec!["x.png".to_string()],
        link: String::new(),
    });
    assert_eq!(store.get(0).unwrap().title, "A");

    store.add(make_project("B"));
    assert_eq!(store.get(0).unwrap().title, "B");
    assert_eq!(store.get(1).unwrap().title, "A");

    store.delete(1).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().title, "B");
}

#[test]
fn clear_drops_memory_but_not_the_slot() {
    let (store, pool, _dir) = test_store();
    store.add(make_project("A"));

    store.clear();
    assert_eq!(store.len(), 0);
    assert!(Slot::get(&pool, DATA_SLOT).is_some());

    store.load_with_fallback(std::path::Path::new("unused.json"));
    assert_eq!(store.len(), 1);
}

// ═══════════════════════════════════════════════════════════
// Store: export
// ═══════════════════════════════════════════════════════════

#[test]
fn mutations_rewrite_the_export_artifact() {
    let (store, _pool, dir) = test_store();
    let artifact = dir.path().join("portfolio.json");

    store.add(make_project("A"));
    assert!(artifact.exists());

    let on_disk = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(on_disk, Project::encode_list_pretty(&store.snapshot()));

    store.delete(0).unwrap();
    let on_disk = std::fs::read_to_string(&artifact).unwrap();
    assert_eq!(on_disk, "[]");
}

#[test]
fn export_returns_the_serialized_text() {
    let (store, _pool, _dir) = test_store();
    store.add(make_project("A"));
    let text = store.export();
    let decoded = Project::decode_list(&text).unwrap();
    assert_eq!(decoded, store.snapshot());
}

// ═══════════════════════════════════════════════════════════
// Lightbox
// ═══════════════════════════════════════════════════════════

fn gallery_project() -> Project {
    Project {
        title: "Alpha".to_string(),
        description: "d".to_string(),
        images: vec!["a.png".into(), "b.png".into(), "c.png".into()],
        link: String::new(),
    }
}

#[test]
fn lightbox_next_is_circular() {
    // Each navigation step opens a fresh lightbox at the linked index, the
    // same way the prev/next links work.
    let project = gallery_project();
    for start in 0..3 {
        let origin = Lightbox::open(&project, start);
        let mut lightbox = Lightbox::open(&project, start);
        for _ in 0..3 {
            lightbox = Lightbox::open(&project, lightbox.next_index());
        }
        assert_eq!(lightbox.current_image(), origin.current_image());
        assert_eq!(lightbox.caption(), origin.caption());
    }
}

#[test]
fn lightbox_prev_is_circular() {
    let project = gallery_project();
    for start in 0..3 {
        let origin = Lightbox::open(&project, start);
        let mut lightbox = Lightbox::open(&project, start);
        for _ in 0..3 {
            lightbox = Lightbox::open(&project, lightbox.prev_index());
        }
        assert_eq!(lightbox.current_image(), origin.current_image());
        assert_eq!(lightbox.caption(), origin.caption());
    }
}

#[test]
fn lightbox_prev_from_zero_wraps_to_last() {
    let project = gallery_project();
    let opened = Lightbox::open(&project, 0);
    assert_eq!(opened.prev_index(), 2);

    let wrapped = Lightbox::open(&project, opened.prev_index());
    assert_eq!(wrapped.current_image(), "c.png");
    assert_eq!(wrapped.next_index(), 0);
}

#[test]
fn lightbox_caption_counts_from_one() {
    let project = gallery_project();
    assert_eq!(Lightbox::open(&project, 0).caption(), "Alpha (1/3)");
    assert_eq!(Lightbox::open(&project, 1).caption(), "Alpha (2/3)");
}

#[test]
fn lightbox_states() {
    let multi = Lightbox::open(&gallery_project(), 0);
    assert_eq!(multi.state(), LightboxState::OpenGallery);

    let single = Lightbox::open(&make_project("A"), 0);
    assert_eq!(single.state(), LightboxState::OpenSingle);
}

#[test]
fn lightbox_clamps_start_index() {
    let lightbox = Lightbox::open(&gallery_project(), 99);
    assert_eq!(lightbox.caption(), "Alpha (3/3)");
    assert_eq!(lightbox.current_image(), "c.png");
}

#[test]
fn lightbox_without_images_shows_placeholder() {
    let mut project = make_project("A");
    project.images.clear();
    let lightbox = Lightbox::open(&project, 0);
    assert_eq!(lightbox.state(), LightboxState::OpenSingle);
    assert_eq!(lightbox.current_image(), PLACEHOLDER_IMAGE);
}

#[test]
fn legacy_record_opens_like_a_one_image_gallery() {
    let legacy = Project::decode_list(r#"[{"title":"A","description":"d","image":"x.png"}]"#)
        .unwrap()
        .remove(0);

    let lightbox = Lightbox::open(&legacy, 0);
    assert_eq!(lightbox.state(), LightboxState::OpenSingle);
    assert_eq!(lightbox.caption(), "A (1/1)");
    assert_eq!(lightbox.current_image(), "x.png");
    assert_eq!(legacy.thumbnail(), Some("x.png"));
}

// ═══════════════════════════════════════════════════════════
// Gallery markup
// ═══════════════════════════════════════════════════════════

#[test]
fn grid_empty_message() {
    assert_eq!(gallery::render_grid(&[]), "<p>No projects yet.</p>");
}

#[test]
fn grid_staggers_fade_in_delays() {
    let projects = vec![make_project("One"), make_project("Two")];
    let html = gallery::render_grid(&projects);
    assert!(html.contains("animation-delay:0.0s"));
    assert!(html.contains("animation-delay:0.1s"));
    assert!(html.contains(r#"href="/project/0""#));
    assert!(html.contains(r#"href="/project/1""#));
}

#[test]
fn grid_renders_external_link_only_when_set() {
    let mut linked = make_project("Linked");
    linked.link = "https://example.com".to_string();
    let html = gallery::render_grid(&[linked, make_project("Plain")]);
    assert_eq!(html.matches("Lihat Proyek Lengkap").count(), 1);
}

#[test]
fn grid_escapes_content() {
    let mut project = make_project("<script>alert(1)</script>");
    project.description = "a & b".to_string();
    let html = gallery::render_grid(&[project]);
    assert!(!html.contains("<script>alert"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(html.contains("a &amp; b"));
}

#[test]
fn modal_shows_nav_only_for_galleries() {
    let multi = Lightbox::open(&gallery_project(), 0);
    let html = gallery::render_modal(&multi, 0);
    assert!(html.contains(r#"href="/project/0?image=1""#));
    assert!(html.contains(r#"href="/project/0?image=2""#));
    assert!(html.contains("Alpha (1/3)"));

    let single = Lightbox::open(&make_project("A"), 0);
    let html = gallery::render_modal(&single, 3);
    assert!(!html.contains("gallery-nav"));
    assert!(html.contains(r#"<a class="modal-close" href="/">"#));
}

#[test]
fn html_escape_covers_attribute_breakers() {
    assert_eq!(
        html_escape(r#"<a href="x">&"#),
        "&lt;a href=&quot;x&quot;&gt;&amp;"
    );
}

// ═══════════════════════════════════════════════════════════
// Session gate
// ═══════════════════════════════════════════════════════════

#[test]
fn fixed_credentials_verify_exact_pair() {
    let verifier = FixedCredentials::default();
    assert!(verifier.verify("adminyogga", "010101"));
    assert!(verifier.verify("  adminyogga  ", " 010101 "));
    assert!(!verifier.verify("adminyogga", "010102"));
    assert!(!verifier.verify("Adminyogga", "010101"));
    assert!(!verifier.verify("", ""));
}

#[test]
fn custom_credentials_compare_case_sensitively() {
    let verifier = FixedCredentials::new("admin", "Secret");
    assert!(verifier.verify("admin", "Secret"));
    assert!(!verifier.verify("admin", "secret"));
}

#[test]
fn session_flag_lifecycle() {
    let pool = test_pool();
    assert!(!auth::session_active(&pool));

    auth::establish_session(&pool).unwrap();
    assert!(auth::session_active(&pool));
    assert_eq!(
        Slot::get(&pool, auth::SESSION_SLOT),
        Some("true".to_string())
    );

    auth::destroy_session(&pool).unwrap();
    assert!(!auth::session_active(&pool));
    assert!(!Slot::exists(&pool, auth::SESSION_SLOT));
}

// ═══════════════════════════════════════════════════════════
// Upload pipeline
// ═══════════════════════════════════════════════════════════

fn tiny_png() -> Vec<u8> {
    let img = image::RgbaImage::new(1, 1);
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

#[test]
fn upload_accepts_png_as_data_uri() {
    let uri = uploads::encode_image(Some("image/png"), &tiny_png()).unwrap();
    assert!(uri.starts_with("data:image/png;base64,"));
    assert!(uri.len() > 30);
}

#[test]
fn upload_rejects_non_image_media_type() {
    assert!(uploads::encode_image(Some("text/plain"), &tiny_png()).is_err());
    assert!(uploads::encode_image(None, &tiny_png()).is_err());
}

#[test]
fn upload_rejects_undecodable_payload() {
    assert!(uploads::encode_image(Some("image/png"), b"definitely not a png").is_err());
}

#[test]
fn upload_size_limit_is_exclusive() {
    // Pad a valid PNG with trailing bytes: format sniffing only looks at the
    // signature, so this exercises the size check alone.
    let mut payload = tiny_png();
    payload.resize(MAX_IMAGE_BYTES, 0);
    assert!(uploads::encode_image(Some("image/png"), &payload).is_ok());

    payload.push(0);
    assert!(uploads::encode_image(Some("image/png"), &payload).is_err());
}

#[test]
fn pending_uploads_accumulate_in_completion_order() {
    let pending = PendingUploads::new();
    assert!(pending.is_empty());

    pending.push("data:image/png;base64,aa".to_string());
    pending.push("data:image/png;base64,bb".to_string());
    assert_eq!(pending.len(), 2);
    assert_eq!(
        pending.snapshot(),
        vec![
            "data:image/png;base64,aa".to_string(),
            "data:image/png;base64,bb".to_string(),
        ]
    );
}

#[test]
fn pending_uploads_clear_and_take() {
    let pending = PendingUploads::new();
    pending.push("one".to_string());
    pending.clear();
    assert!(pending.is_empty());

    pending.push("two".to_string());
    let taken = pending.take();
    assert_eq!(taken, vec!["two".to_string()]);
    assert!(pending.is_empty());
}

// ═══════════════════════════════════════════════════════════
// Contact bridge
// ═══════════════════════════════════════════════════════════

#[test]
fn contact_requires_name_and_message() {
    assert!(ContactMessage::from_input("", "a@b.c", "hello").is_err());
    assert!(ContactMessage::from_input("Budi", "", "   ").is_err());
    assert!(ContactMessage::from_input("Budi", "", "hello").is_ok());
}

#[test]
fn contact_compose_with_and_without_email() {
    let with_email = ContactMessage::from_input("Budi", "budi@mail.com", "Apa kabar?").unwrap();
    assert_eq!(
        with_email.compose(),
        "Halo! Nama saya Budi. Email: budi@mail.com. Pesan: Apa kabar?"
    );

    let without = ContactMessage::from_input("Budi", "  ", "Apa kabar?").unwrap();
    assert_eq!(without.compose(), "Halo! Nama saya Budi. Pesan: Apa kabar?");
}

#[test]
fn contact_deep_link_is_percent_encoded() {
    let message = ContactMessage::from_input("Budi", "", "Apa kabar?").unwrap();
    let link = message.deep_link();
    assert!(link.starts_with("https://wa.me/628873434754?text="));
    assert!(!link.contains(' '));
    assert!(link.contains("Halo%21"));
}

#[test]
fn contact_trims_all_fields() {
    let message = ContactMessage::from_input("  Budi  ", " a@b.c ", "  hi  ").unwrap();
    assert_eq!(message.name, "Budi");
    assert_eq!(message.email, "a@b.c");
    assert_eq!(message.message, "hi");
}
