use std::fmt::Write;

use crate::chart::RenderedStationPlot;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Water Level Forecast</title>
<style>
body { font-family: sans-serif; margin: 2rem; color: #222; }
.station { margin-bottom: 2.5rem; }
.station img { max-width: 100%; height: auto; border: 1px solid #ddd; }
.danger { color: #b45309; }
.no-data { color: #777; font-style: italic; }
</style>
</head>
<body>
<h1>Seven-Day Water Level Forecast</h1>
"#;

const PAGE_TAIL: &str = "</body>\n</html>\n";

/// Build the forecast page, one section per station in the given order.
pub fn render_page(plots: &[RenderedStationPlot]) -> String {
    let mut html = String::from(PAGE_HEAD);

    if plots.is_empty() {
        html.push_str("<p class=\"no-data\">No stations available.</p>\n");
    }

    for plot in plots {
        let name = escape_html(&plot.station_name);
        // Writing to a String cannot fail
        let _ = writeln!(html, "<section class=\"station\">\n<h2>{name}</h2>");

        if let Some(level) = plot.danger_level {
            let _ = writeln!(html, "<p class=\"danger\">Danger Level: {level} m</p>");
        }

        match &plot.image {
            Some(uri) => {
                let _ = writeln!(
                    html,
                    "<img src=\"{uri}\" alt=\"Water level chart for {name}\">"
                );
            }
            None => html.push_str("<p class=\"no-data\">No data available.</p>\n"),
        }

        html.push_str("</section>\n");
    }

    html.push_str(PAGE_TAIL);
    html
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plot(name: &str, danger_level: Option<f64>, image: Option<&str>) -> RenderedStationPlot {
        RenderedStationPlot {
            station_name: name.to_string(),
            danger_level,
            image: image.map(str::to_string),
        }
    }

    #[test]
    fn test_page_lists_stations_in_order() {
        let html = render_page(&[
            plot("Sylhet", Some(3.5), Some("data:image/svg+xml;base64,AAAA")),
            plot("Derai", None, None),
        ]);

        let sylhet = html.find("<h2>Sylhet</h2>").unwrap();
        let derai = html.find("<h2>Derai</h2>").unwrap();
        assert!(sylhet < derai);

        assert!(html.contains("Danger Level: 3.5 m"));
        assert!(html.contains("<img src=\"data:image/svg+xml;base64,AAAA\""));
        assert_eq!(html.matches("Danger Level:").count(), 1);
        assert_eq!(html.matches("No data available.").count(), 1);
    }

    #[test]
    fn test_page_escapes_station_names() {
        let html = render_page(&[plot("B. Baria <&>", None, None)]);
        assert!(html.contains("<h2>B. Baria &lt;&amp;&gt;</h2>"));
    }

    #[test]
    fn test_empty_page() {
        let html = render_page(&[]);
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("No stations available."));
        assert!(html.ends_with("</html>\n"));
    }
}
