//! Self-contained HTML shell for a dashboard: one full-width div, the
//! Plotly.js runtime pulled from its CDN, and the trace and layout objects
//! inlined as JSON. Opening the file in a browser is the whole deployment.

use serde_json::{json, Value};

use crate::common::get_handlebars;
use crate::errors::DataError;

pub fn render(title: &str, traces: &Value, layout: &Value) -> Result<String, DataError> {
    let handlebars = get_handlebars();
    let context = json!({
        "title": title,
        "traces": traces,
        "layout": layout,
    });
    let html = handlebars.render_template(&get_template(), &context)?;
    Ok(html)
}

fn get_template() -> String {
    let template = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{title}}</title>
    <script src="https://cdn.plot.ly/plotly-2.32.0.min.js" charset="utf-8"></script>
    <style>
        body { margin: 0; background: #f5f6fa; font-family: "Segoe UI", Arial, sans-serif; }
        #dashboard { width: 100%; }
    </style>
</head>
<body>
    <div id="dashboard"></div>
    <script>
        var traces = {{{json traces}}};
        var layout = {{{json layout}}};
        Plotly.newPlot("dashboard", traces, layout, { responsive: true });
    </script>
</body>
</html>
"##;
    template.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_standalone_page() {
        let traces = json!([{ "type": "bar", "x": ["a"], "y": [1.0] }]);
        let layout = json!({ "title": { "text": "Test" }, "height": 600 });
        let html = render("Test Dashboard", &traces, &layout).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Test Dashboard</title>"));
        assert!(html.contains("cdn.plot.ly"));
        assert!(html.contains(r#"Plotly.newPlot("dashboard""#));
        assert!(html.contains(r#"var traces = [{"type":"bar","x":["a"],"y":[1.0]}];"#));
    }

    #[test]
    fn layout_is_embedded_as_compact_json() {
        let html = render("T", &json!([]), &json!({ "height": 1200 })).unwrap();
        assert!(html.contains(r#"var layout = {"height":1200};"#));
    }
}
