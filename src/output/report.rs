use super::PageReport;
use crate::pagination::PageToken;
use crate::view::route_for_page;

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn render_card(out: &mut String, post: &crate::post::Post) {
    let tags = post
        .categories
        .iter()
        .map(|c| format!(r#"<span class="tag">{}</span>"#, escape_html(c)))
        .collect::<Vec<_>>()
        .join("");
    out.push_str(&format!(
        r#"    <article class="card" data-category="{category}">
      <a href="{url}"><img src="{image}" alt="{title}" loading="lazy" decoding="async" width="800" height="450"/></a>
      <div class="tags">{tags}</div>
      <h2><a href="{url}">{title}</a></h2>
      <p class="excerpt">{excerpt}</p>
      <p class="meta">{author} &middot; {date} &middot; {read_time}</p>
    </article>
"#,
        category = escape_html(post.primary_category()),
        url = escape_html(&post.original_url),
        image = escape_html(&post.featured_image),
        title = escape_html(&post.title),
        tags = tags,
        excerpt = escape_html(&post.excerpt),
        author = escape_html(&post.author),
        date = escape_html(&post.date),
        read_time = escape_html(&post.read_time),
    ));
}

fn render_pagination(out: &mut String, report: &PageReport) {
    let controls = &report.pagination;
    if controls.total_pages <= 1 {
        return;
    }
    out.push_str("  <nav class=\"pagination\" aria-label=\"Recipe pages\">\n");
    let link = |page: u32, label: &str, disabled: bool| -> String {
        if disabled {
            format!("    <span class=\"disabled\">{label}</span>\n")
        } else {
            let href = escape_html(&route_for_page(&report.route, page));
            format!("    <a href=\"{href}\">{label}</a>\n")
        }
    };
    out.push_str(&link(
        controls.current_page.saturating_sub(1),
        "Previous",
        controls.prev_disabled,
    ));
    for token in controls.tokens.iter() {
        match token {
            PageToken::Page(n) if controls.is_current(*token) => {
                out.push_str(&format!(
                    "    <span class=\"current\" aria-current=\"page\">{n}</span>\n"
                ));
            }
            PageToken::Page(n) => out.push_str(&link(*n, &n.to_string(), false)),
            PageToken::Ellipsis => {
                out.push_str(&format!("    <span class=\"ellipsis\">{token}</span>\n"));
            }
        }
    }
    out.push_str(&link(
        controls.current_page.saturating_add(1),
        "Next",
        controls.next_disabled,
    ));
    out.push_str("  </nav>\n");
}

pub fn render_html(report: &PageReport) -> Vec<u8> {
    let mut body = String::new();
    if let Some(error) = report.error.as_deref() {
        let retry = escape_html(&route_for_page(&report.route, report.current_page));
        body.push_str(&format!(
            r#"  <section class="error">
    <h2>Recipes are unavailable right now</h2>
    <p>{}</p>
    <a class="retry" href="{retry}">Try Again</a>
  </section>
"#,
            escape_html(error)
        ));
    } else {
        body.push_str("  <section class=\"grid\">\n");
        for post in report.posts.iter() {
            render_card(&mut body, post);
        }
        body.push_str("  </section>\n");
        render_pagination(&mut body, report);
    }

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Recipes - Page {page} | Postman Oil</title>
  <style>
    body {{ font-family: 'Inter', sans-serif; margin: 0 auto; max-width: 1200px; padding: 2rem; }}
    .grid {{ display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); }}
    .card img {{ width: 100%; height: auto; border-radius: 0.75rem; }}
    .tag {{ background: #fdf2d0; border-radius: 9999px; font-size: 0.75rem; margin-right: 0.25rem; padding: 0.125rem 0.5rem; }}
    .meta {{ color: #64748b; font-size: 0.875rem; }}
    .pagination {{ display: flex; gap: 0.5rem; justify-content: center; margin-top: 2rem; }}
    .pagination .current {{ font-weight: 700; }}
    .pagination .disabled {{ color: #cbd5e1; }}
  </style>
</head>
<body>
  <h1>Recipes</h1>
{body}</body>
</html>
"#,
        page = report.current_page,
        body = body,
    );
    html.into_bytes()
}
