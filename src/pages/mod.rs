//! HTML rendering for the showcase pages.
//!
//! Pages are plain `format!` templates. Anything that did not come from a
//! literal in this module (CSV cells, captions, file names) goes through
//! [`escape_html`].

pub mod home;
pub mod usecase;

use crate::assets::{AssetStore, DataTable};

pub use home::render_home;
pub use usecase::{render_use_case, Metric, UseCase};

pub const SITE_TITLE: &str = "Image Captioning Project";

const INFOSYS_LOGO: &str = "infosys.jpg";
const SPRINGBOARD_LOGO: &str = "Spring.png";

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

/// `<img>` tag for an embedded asset, or an empty placeholder box when the
/// asset could not be loaded.
pub fn img_tag(src: Option<&str>, alt: &str, class: &str) -> String {
    match src {
        Some(src) => format!(
            r#"<img src="{}" alt="{}" class="{}"/>"#,
            src,
            escape_html(alt),
            class
        ),
        None => format!(
            r#"<div class="img-placeholder {}" role="img" aria-label="{}"></div>"#,
            class,
            escape_html(alt)
        ),
    }
}

/// Wraps page content in the shared head, navbar and sidebar.
pub async fn layout(store: &AssetStore, page_title: &str, active: Option<UseCase>, body: &str) -> String {
    let css = store.stylesheet().await;
    let infosys = store.image_or_placeholder(INFOSYS_LOGO).await;
    let springboard = store.image_or_placeholder(SPRINGBOARD_LOGO).await;

    let mut nav_links = String::new();
    for case in UseCase::ALL {
        let class = if Some(case) == active { "active" } else { "" };
        nav_links.push_str(&format!(
            r#"<li><a href="/{}" class="{}">{}</a></li>"#,
            case.slug(),
            class,
            case.title()
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{page_title} - {site}</title>
    <style>{css}</style>
</head>
<body>
    <aside class="sidebar">
        <a href="/" class="{home_class}">Home</a>
        <ul>{nav_links}</ul>
        <div class="sidebar-hint">Select a Usecase above.</div>
    </aside>
    <main>
        <div class="navbar">
            <a href="/">{infosys}</a>
            {springboard}
            <div>
                <h1>{site}</h1>
            </div>
        </div>
        {body}
    </main>
</body>
</html>"#,
        page_title = escape_html(page_title),
        site = SITE_TITLE,
        css = css,
        home_class = if active.is_none() { "active" } else { "" },
        nav_links = nav_links,
        infosys = img_tag(infosys.as_deref(), "Infosys", "avatar"),
        springboard = img_tag(springboard.as_deref(), "Springboard", "avatar avatar-small"),
        body = body,
    )
}

/// Two-column metric/value table.
pub fn metrics_table(metrics: &[Metric]) -> String {
    let mut rows = String::new();
    for m in metrics {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>",
            m.metric, m.value
        ));
    }
    format!(
        r#"<table class="metrics"><thead><tr><th>metric</th><th>value</th></tr></thead><tbody>{}</tbody></table>"#,
        rows
    )
}

/// Scrollable dataframe view, truncated to `max_rows`.
pub fn data_table(table: &DataTable, max_rows: usize) -> String {
    let mut html = String::from(r#"<div class="dataframe"><table><thead><tr>"#);
    for header in &table.headers {
        html.push_str(&format!("<th>{}</th>", escape_html(header)));
    }
    html.push_str("</tr></thead><tbody>");
    for row in table.rows.iter().take(max_rows) {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table></div>");

    if table.rows.len() > max_rows {
        html.push_str(&format!(
            r#"<p class="table-note">Showing {} of {} rows</p>"#,
            max_rows,
            table.rows.len()
        ));
    }
    html
}

/// Notice shown in place of a dataframe that failed to load.
pub fn unavailable(what: &str) -> String {
    format!(
        r#"<div class="notice">{} is not available.</div>"#,
        escape_html(what)
    )
}
