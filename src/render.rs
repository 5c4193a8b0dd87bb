//! Shared HTML building blocks. Pages are assembled server-side as plain
//! strings; there is no template engine in front of this.

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

const BASE_CSS: &str = r#"
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:'Inter',system-ui,sans-serif;color:#222;background:#fafafa;line-height:1.6}
a{color:#0a66c2;text-decoration:none}
.site-header{display:flex;justify-content:space-between;align-items:center;padding:18px 32px;background:#fff;border-bottom:1px solid #eee}
.site-header .brand{font-weight:700;font-size:1.2em;color:#222}
.site-nav a{margin-left:20px;color:#444}
.site-main{max-width:1080px;margin:0 auto;padding:32px 20px}
.site-footer{text-align:center;color:#999;padding:32px 0;font-size:.9em}
.portfolio-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(280px,1fr));gap:24px}
.portfolio-card{background:#fff;border-radius:10px;overflow:hidden;box-shadow:0 2px 8px rgba(0,0,0,.08);opacity:0;animation:fade-in .6s ease forwards}
@keyframes fade-in{from{opacity:0;transform:translateY(12px)}to{opacity:1;transform:none}}
.portfolio-card img{width:100%;height:200px;object-fit:cover;display:block}
.card-content{padding:14px 16px}
.card-title{font-size:1.05em;margin-bottom:6px}
.card-desc{color:#666;font-size:.92em}
.card-link{display:block;padding:8px 16px;font-size:.88em;border-top:1px solid #f0f0f0}
.modal-backdrop{position:fixed;inset:0;background:rgba(0,0,0,.92);display:flex;align-items:center;justify-content:center;flex-direction:column}
.modal-backdrop img{max-width:88vw;max-height:78vh;object-fit:contain}
.modal-caption{color:#ddd;margin-top:14px}
.modal-close{position:absolute;top:16px;right:28px;color:#fff;font-size:2em}
.gallery-nav{color:#fff;font-size:2.4em;padding:0 26px;user-select:none}
.modal-gallery{display:flex;align-items:center}
.project-item{display:flex;align-items:center;background:#fff;border:1px solid #eee;border-radius:8px;padding:10px 14px;margin-bottom:10px}
.project-item img{width:50px;height:50px;object-fit:cover;border-radius:5px;margin-right:10px}
.project-item .meta{flex:1}
.project-item small{color:#777}
.btn{display:inline-block;padding:7px 14px;border:0;border-radius:6px;background:#0a66c2;color:#fff;font-size:.9em;cursor:pointer}
.btn-danger{background:#c22}
.btn-muted{background:#888}
form .field{margin-bottom:14px}
form label{display:block;font-weight:600;margin-bottom:4px;font-size:.92em}
form input[type=text],form input[type=email],form input[type=password],form input[type=url],form textarea{width:100%;padding:9px 10px;border:1px solid #ccc;border-radius:6px;font:inherit}
.flash{padding:12px 14px;border-radius:6px;margin-bottom:16px;font-size:.94em}
.flash-success{background:rgba(34,197,94,.12);color:#16a34a}
.flash-error{background:rgba(239,68,68,.12);color:#ef4444}
.upload-zone{border:2px dashed #bbb;border-radius:8px;padding:22px;text-align:center;color:#888;margin-bottom:14px}
.preview-strip img{width:100px;height:100px;object-fit:cover;margin:5px;border-radius:6px}
.admin-section{background:#fff;border:1px solid #eee;border-radius:10px;padding:22px;margin-bottom:26px}
"#;

/// Wrap a body fragment in the full page shell.
pub fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{css}</style>
</head>
<body>
<header class="site-header">
  <a class="brand" href="/">Folio</a>
  <nav class="site-nav"><a href="/">Work</a><a href="/contact">Contact</a><a href="/admin">Admin</a></nav>
</header>
<main class="site-main">
{body}
</main>
<footer class="site-footer"><p>&copy; {year} Folio</p></footer>
</body>
</html>"#,
        title = html_escape(title),
        css = BASE_CSS,
        body = body,
        year = chrono::Utc::now().format("%Y"),
    )
}

/// Inline status banner. `kind` is "success" or "error".
pub fn flash_banner(kind: &str, message: &str) -> String {
    format!(
        r#"<div class="flash flash-{}">{}</div>"#,
        kind,
        html_escape(message)
    )
}
