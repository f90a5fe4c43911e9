//! Declarative chart descriptors: small constructors that map columns to
//! Plotly trace and layout objects. There is no algorithmic content here,
//! only the fixed "which columns feed which primitive" table used by the
//! dashboard modules.

use serde_json::{json, Value};

/// Trace-side axis references for a subplot: ("x", "y"), ("x2", "y2"), ...
pub fn xy_refs(index: usize) -> (String, String) {
    if index == 1 {
        ("x".to_string(), "y".to_string())
    } else {
        (format!("x{}", index), format!("y{}", index))
    }
}

/// Layout axis object anchored to its paired axis and clipped to a domain
pub fn axis(title: &str, domain: [f64; 2], anchor: &str) -> Value {
    json!({
        "title": { "text": title },
        "domain": domain,
        "anchor": anchor,
    })
}

/// Line-and-marker trace
pub fn line_trace(
    name: &str,
    x: Value,
    y: Value,
    color: &str,
    subplot: usize,
    hovertemplate: &str,
) -> Value {
    let (xref, yref) = xy_refs(subplot);
    json!({
        "type": "scatter",
        "mode": "lines+markers",
        "name": name,
        "x": x,
        "y": y,
        "line": { "color": color, "width": 3 },
        "marker": { "size": 6 },
        "xaxis": xref,
        "yaxis": yref,
        "hovertemplate": hovertemplate,
    })
}

/// Markers-only trace for scatter analysis panels
pub fn marker_trace(
    name: &str,
    x: Value,
    y: Value,
    color: &str,
    text: Value,
    subplot: usize,
    hovertemplate: &str,
) -> Value {
    let (xref, yref) = xy_refs(subplot);
    json!({
        "type": "scatter",
        "mode": "markers",
        "name": name,
        "x": x,
        "y": y,
        "marker": {
            "size": 12,
            "color": color,
            "opacity": 0.7,
            "line": { "width": 1, "color": "white" },
        },
        "text": text,
        "xaxis": xref,
        "yaxis": yref,
        "hovertemplate": hovertemplate,
    })
}

/// Vertical bar trace; `colors` may be a single color or one per bar
pub fn bar_trace(
    name: &str,
    x: Value,
    y: Value,
    colors: Value,
    text: Value,
    subplot: usize,
    hovertemplate: &str,
) -> Value {
    let (xref, yref) = xy_refs(subplot);
    json!({
        "type": "bar",
        "name": name,
        "x": x,
        "y": y,
        "marker": { "color": colors },
        "text": text,
        "textposition": "outside",
        "xaxis": xref,
        "yaxis": yref,
        "hovertemplate": hovertemplate,
    })
}

/// Horizontal bar trace
pub fn hbar_trace(
    name: &str,
    x: Value,
    y: Value,
    colors: Value,
    text: Value,
    subplot: usize,
    hovertemplate: &str,
) -> Value {
    let mut trace = bar_trace(name, x, y, colors, text, subplot, hovertemplate);
    trace["orientation"] = json!("h");
    trace
}

/// Donut trace pinned to a paper-coordinate domain
pub fn pie_trace(
    labels: Value,
    values: Value,
    colors: Value,
    domain_x: [f64; 2],
    domain_y: [f64; 2],
    hovertemplate: &str,
) -> Value {
    json!({
        "type": "pie",
        "labels": labels,
        "values": values,
        "hole": 0.4,
        "marker": { "colors": colors },
        "textinfo": "label+percent",
        "textposition": "outside",
        "domain": { "x": domain_x, "y": domain_y },
        "hovertemplate": hovertemplate,
    })
}

/// Geographic scatter trace with value-scaled markers
pub fn scattergeo_trace(
    name: &str,
    lat: Value,
    lon: Value,
    text: Value,
    sizes: Value,
    values: Value,
    hovertemplate: &str,
) -> Value {
    json!({
        "type": "scattergeo",
        "mode": "markers+text",
        "name": name,
        "lat": lat,
        "lon": lon,
        "text": text,
        "marker": {
            "size": sizes,
            "color": values,
            "colorscale": "Viridis",
            "showscale": true,
            "colorbar": { "title": { "text": "Revenue ($)" }, "x": 1.02 },
        },
        "textposition": "middle center",
        "customdata": values,
        "hovertemplate": hovertemplate,
    })
}

/// Paper-anchored text annotation used for panel titles
pub fn panel_title(text: &str, x: f64, y: f64) -> Value {
    json!({
        "x": x,
        "y": y,
        "xref": "paper",
        "yref": "paper",
        "text": format!("<b>{}</b>", text),
        "showarrow": false,
        "font": { "size": 13, "color": "#2c3e50" },
        "xanchor": "center",
        "yanchor": "bottom",
    })
}

/// Boxed headline metric card rendered as an annotation
pub fn metric_card(text: &str, x: f64, y: f64) -> Value {
    json!({
        "x": x,
        "y": y,
        "xref": "paper",
        "yref": "paper",
        "text": text,
        "showarrow": false,
        "font": { "size": 14, "color": "white" },
        "bgcolor": "rgba(52, 73, 94, 0.8)",
        "bordercolor": "white",
        "borderwidth": 2,
        "xanchor": "center",
        "yanchor": "middle",
    })
}

/// Free-form annotation line, used for the text-table panels
pub fn text_line(text: &str, x: f64, y: f64, size: u32) -> Value {
    json!({
        "x": x,
        "y": y,
        "xref": "paper",
        "yref": "paper",
        "text": text,
        "showarrow": false,
        "font": { "size": size, "color": "#34495e" },
        "xanchor": "center",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_refs_follow_plotly_numbering() {
        assert_eq!(xy_refs(1), ("x".to_string(), "y".to_string()));
        assert_eq!(xy_refs(3), ("x3".to_string(), "y3".to_string()));
    }

    #[test]
    fn line_trace_assigns_the_subplot_axes() {
        let trace = line_trace(
            "2025 Revenue",
            json!(["2025-01-01"]),
            json!([1000.0]),
            "#ff7f0e",
            1,
            "%{x}<br>$%{y}<extra></extra>",
        );
        assert_eq!(trace["type"], "scatter");
        assert_eq!(trace["mode"], "lines+markers");
        assert_eq!(trace["xaxis"], "x");
        assert_eq!(trace["yaxis"], "y");
    }

    #[test]
    fn hbar_trace_is_horizontal() {
        let trace = hbar_trace(
            "Growth",
            json!([1.0]),
            json!(["Europe"]),
            json!("#2ca02c"),
            json!(["1%"]),
            3,
            "",
        );
        assert_eq!(trace["orientation"], "h");
        assert_eq!(trace["xaxis"], "x3");
    }

    #[test]
    fn pie_trace_is_a_donut_in_its_domain() {
        let trace = pie_trace(
            json!(["a", "b"]),
            json!([60.0, 40.0]),
            json!(["#ff9999", "#66b3ff"]),
            [0.55, 1.0],
            [0.7, 1.0],
            "",
        );
        assert_eq!(trace["hole"], 0.4);
        assert_eq!(trace["domain"]["x"][0], 0.55);
    }

    #[test]
    fn metric_card_is_paper_anchored() {
        let card = metric_card("<b>$9.50M</b><br>Sum of Invoices", 0.125, 0.88);
        assert_eq!(card["xref"], "paper");
        assert_eq!(card["yref"], "paper");
        assert_eq!(card["showarrow"], false);
    }
}
