use crate::tile::{DetailRecord, TileKind};

/// Icon font behind the `fas fa-*` classes.
pub const FONT_AWESOME_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.5.1/css/all.min.css";

/// Escape text for HTML body and double-quoted attribute contexts.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn meta_item(out: &mut String, icon: &str, body: &str) {
    out.push_str(&format!(
        "        <div class=\"meta-item\"><i class=\"fas {icon}\"></i>{body}</div>\n"
    ));
}

/// Standalone page for one résumé entry. Header fields are escaped; the
/// entry body is trusted markup from the résumé document.
pub fn detail_page(record: &DetailRecord, site_title: &str) -> String {
    let kind = record.kind();
    let headline_icon = match kind {
        TileKind::Education => "fa-graduation-cap",
        TileKind::Experience | TileKind::Project => "fa-briefcase",
    };
    let organization = escape_html(record.meta.organization());
    let headline = escape_html(record.meta.headline());
    let site = escape_html(site_title);

    let mut meta = String::new();
    meta_item(&mut meta, headline_icon, &format!("<strong>{headline}</strong>"));
    meta_item(&mut meta, "fa-map-marker-alt", &escape_html(record.meta.location()));
    meta_item(&mut meta, "fa-calendar", &escape_html(record.meta.dates()));
    if let Some(gpa) = record.meta.gpa() {
        meta_item(&mut meta, "fa-star", &escape_html(gpa));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en" data-theme="light">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{organization} - {site}</title>
  <meta name="description" content="{headline}">
  <link rel="stylesheet" href="../../css/main.css">
  <link rel="stylesheet" href="{FONT_AWESOME_CSS}" crossorigin="anonymous" referrerpolicy="no-referrer">
</head>
<body>
  <header class="site-header">
    <div class="header-content">
      <div class="header-left"><a href="../../" class="site-title">{site}</a></div>
      <div class="header-right">
        <button id="theme-toggle" class="theme-toggle" aria-label="Toggle theme" title="Toggle theme">🌙</button>
      </div>
    </div>
  </header>
  <main class="writing-container">
    <a href="../../" class="back-link"><i class="fas fa-arrow-left"></i> Back to Home</a>
    <div class="writing-header">
      <h1 class="writing-title">{organization}</h1>
      <div class="writing-meta">
{meta}      </div>
    </div>
    <div class="{kind}-content">{body}</div>
  </main>
  <script type="module">
    import {{ initTheme }} from '../../js/theme.js';
    initTheme();
  </script>
</body>
</html>
"#,
        body = record.description_html,
    )
}
