use crate::web::chart_svg::render_chart;
use f1core::model::Driver;
use f1core::sessions::{grand_prix_names, SEASON};
use f1core::{TyreBoard, TyreChart};

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:0;background:#fafafa;color:#111}\
main{max-width:960px;margin:0 auto;padding:4rem 1rem}\
.accent{color:#8b0000}\
.card{display:grid;grid-template-columns:220px 1fr;gap:1.5rem;border:2px solid;border-radius:12px;padding:1.5rem;background:#fff}\
.card img{width:100%;border-radius:8px;object-fit:cover}\
.facts{display:grid;grid-template-columns:1fr 1fr;gap:1rem}\
.facts p{margin:0}\
.label{font-size:.85rem}\
form{display:flex;gap:.5rem;margin-bottom:1rem}\
form input{flex:1;padding:.5rem}\
.panel{background:#fff;border-radius:12px;padding:1rem;box-shadow:0 4px 12px rgba(0,0,0,.1)}";

/// Escapes text for use in HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{}</style></head>\
         <body><main>{}</main></body></html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn fact(label: &str, value: &str, class: &str) -> String {
    format!(
        "<div><p class=\"label\">{}</p><p class=\"{}\">{}</p></div>",
        label,
        class,
        escape(value)
    )
}

pub fn driver_card(driver: &Driver) -> String {
    let team_colour = driver.team_colour_css();
    let headshot = match driver.headshot_url.as_deref() {
        Some(url) if !url.is_empty() => format!(
            "<img src=\"{}\" alt=\"{}\" width=\"1080\" height=\"1080\">",
            escape(url),
            escape(driver.image_alt())
        ),
        _ => String::new(),
    };

    let body = format!(
        "<p><a class=\"accent\" href=\"/racers\">Back to drivers</a></p>\
         <section class=\"card\" style=\"border-color:{}\">\
         <div>{}</div>\
         <div><p class=\"label accent\">Driver</p><h1>{}</h1>\
         <div class=\"facts\">{}{}{}{}</div></div></section>",
        escape(&team_colour),
        headshot,
        escape(&driver.full_name),
        fact("Number", &driver.driver_number.to_string(), "accent number"),
        fact("Team", &driver.team_name, "accent"),
        fact("Broadcast Name", &driver.broadcast_name, "accent"),
        fact("Country", &driver.country_code, "accent"),
    );
    layout(&driver.full_name, &body)
}

pub fn not_found() -> String {
    layout(
        "Not found",
        "<h1>404</h1><p>This page could not be found.</p>\
         <p><a class=\"accent\" href=\"/tyre\">Tyre stints</a></p>",
    )
}

pub fn tyre_page(board: &TyreBoard, chart: Option<&TyreChart>) -> String {
    let options: String = grand_prix_names()
        .map(|name| format!("<option value=\"{}\">", escape(name)))
        .collect();

    let content = match chart {
        Some(chart) if !chart.rows.is_empty() => render_chart(chart),
        _ => "<p style=\"text-align:center\">Enter a valid Grand Prix name and click \
              &quot;Fetch Data&quot; to see the chart.</p>"
            .to_string(),
    };

    let title = format!("F1 Tire Stint Visualization - {SEASON} Season");
    let body = format!(
        "<div class=\"panel\"><h2 style=\"text-align:center\">{}</h2>\
         <form method=\"get\" action=\"/tyre\">\
         <input type=\"text\" name=\"grand_prix\" list=\"grand-prix\" \
         placeholder=\"Enter Grand Prix Name\" value=\"{}\">\
         <datalist id=\"grand-prix\">{}</datalist>\
         <button type=\"submit\">Fetch Data</button></form>{}</div>",
        escape(&title),
        escape(board.grand_prix()),
        options,
        content
    );
    layout(&title, &body)
}
