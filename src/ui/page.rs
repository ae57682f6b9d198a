//! Server-side rendering of the analysis page

use std::fmt::Write;

use super::form::FEATURE_INPUTS;
use crate::domain::{FEATURE_COUNT, PredictionResult};

/// Everything needed to render the page once
#[derive(Debug, Clone)]
pub struct PageView {
    pub online: bool,
    pub provider: String,
    /// Form target, including any mount prefix
    pub action: String,
    pub values: [f64; FEATURE_COUNT],
    pub result: Option<PredictionResult>,
    pub error: Option<String>,
    pub notice: Option<String>,
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; background: #f8f9fa; color: #2c3e50; }
aside { width: 280px; padding: 1.5rem; background: #eef1f5; min-height: 100vh; box-sizing: border-box; }
main { flex: 1; padding: 2rem 3rem; }
.status { padding: 10px; border-radius: 5px; margin: 0.5rem 0; }
.online, .success { background: #d4edda; color: #155724; border: 1px solid #c3e6cb; }
.offline, .failure { background: #f8d7da; color: #721c24; border: 1px solid #f5c6cb; }
.banner { display: flex; justify-content: space-between; align-items: center; padding: 10px; border-radius: 5px; margin-bottom: 1rem; }
.banner button { background: none; border: none; font-size: 1.2rem; cursor: pointer; color: inherit; }
.notice { background: #fff3cd; color: #856404; border: 1px solid #ffeeba; }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 1rem 2rem; }
label { display: block; font-weight: 600; margin-bottom: 0.25rem; }
input[type=number] { width: 100%; padding: 0.4rem; box-sizing: border-box; }
.hint { font-size: 0.8rem; color: #6c757d; }
.submit { width: 100%; height: 3em; margin-top: 1.5rem; border-radius: 5px; background: #007bff; color: white; border: none; font-weight: bold; cursor: pointer; }
.submit:hover { background: #0056b3; }
.report { display: flex; gap: 2rem; align-items: center; }
.icon { font-size: 6rem; }
pre { background: #fff; padding: 1rem; border: 1px solid #dee2e6; border-radius: 5px; }
"#;

pub fn render(view: &PageView) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>AquaSafe | Water Potability AI</title>\n<style>");
    html.push_str(STYLE);
    html.push_str("</style>\n</head>\n<body>\n");

    render_sidebar(&mut html, view);

    html.push_str("<main>\n<h1>💧 Water Potability Predictor</h1>\n");
    html.push_str("<h4>Instant AI-Analysis for Water Quality Safety</h4>\n");
    html.push_str(
        "<p>Enter the chemical properties of the water sample below to generate a safety report.</p>\n<hr>\n",
    );

    if let Some(error) = &view.error {
        banner(&mut html, "failure", &format!("An error occurred: {}", error));
    }
    if let Some(notice) = &view.notice {
        banner(&mut html, "notice", notice);
    }

    render_form(&mut html, view);

    if let Some(result) = &view.result {
        render_report(&mut html, result);
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

fn render_sidebar(html: &mut String, view: &PageView) {
    html.push_str("<aside>\n<h2>AquaSafe AI</h2>\n<h3>🔍 Model Status</h3>\n");
    if view.online {
        html.push_str("<div class=\"status online\">🟢 System Online</div>\n");
    } else {
        html.push_str("<div class=\"status offline\">🔴 Offline</div>\n");
        html.push_str("<p class=\"hint\">The prediction backend is not ready.</p>\n");
    }
    let _ = writeln!(html, "<p class=\"hint\">{}</p>", escape(&view.provider));

    html.push_str("<hr>\n<h3>📊 Dataset Info</h3>\n<p>");
    html.push_str(
        "This model is trained on water quality metrics including pH, Hardness, Solids, \
         Chloramines, Sulfate, Conductivity, Organic Carbon, Trihalomethanes, and Turbidity.",
    );
    html.push_str("</p>\n</aside>\n");
}

fn render_form(html: &mut String, view: &PageView) {
    let _ = writeln!(
        html,
        "<form method=\"post\" action=\"{}\">\n<h3>🧪 Chemical Parameters</h3>\n<div class=\"grid\">",
        escape(&view.action)
    );

    for (input, value) in FEATURE_INPUTS.iter().zip(view.values) {
        let _ = write!(
            html,
            "<div><label for=\"{name}\">{label}</label>\
             <input type=\"number\" id=\"{name}\" name=\"{name}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{value}\">",
            name = input.name,
            label = escape(input.label),
            min = input.min,
            max = input.max,
            step = input.step(),
            value = value,
        );
        if let Some(help) = input.help {
            let _ = write!(html, "<div class=\"hint\">{}</div>", escape(help));
        }
        html.push_str("</div>\n");
    }

    html.push_str(
        "</div>\n<button class=\"submit\" type=\"submit\">🚀 Analyze Sample</button>\n</form>\n",
    );
}

fn render_report(html: &mut String, result: &PredictionResult) {
    html.push_str("<hr>\n<h2>📋 Analysis Report</h2>\n<div class=\"report\">\n");

    if result.is_potable() {
        html.push_str("<div class=\"icon\">🚰</div>\n<div>\n");
        let _ = writeln!(
            html,
            "<div class=\"status success\"><h3>Result: {}</h3></div>",
            escape(&result.result)
        );
        html.push_str("<p>✅ <strong>Safety Status:</strong> Safe for human consumption.</p>\n");
        html.push_str(
            "<p>This sample meets the required safety standards based on the provided metrics.</p>\n",
        );
    } else {
        html.push_str("<div class=\"icon\">☣️</div>\n<div>\n");
        let _ = writeln!(
            html,
            "<div class=\"status failure\"><h3>Result: {}</h3></div>",
            escape(&result.result)
        );
        html.push_str("<p>⚠️ <strong>Safety Status:</strong> Unsafe / Contaminated.</p>\n");
        html.push_str(
            "<p>This sample contains levels of contaminants that may be harmful.</p>\n",
        );
    }
    html.push_str("</div>\n</div>\n");

    let raw = serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string());
    let _ = writeln!(
        html,
        "<details>\n<summary>Show Raw Analysis Data</summary>\n<pre>{}</pre>\n</details>",
        escape(&raw)
    );
}

fn banner(html: &mut String, class: &str, message: &str) {
    let _ = writeln!(
        html,
        "<div class=\"banner {}\" role=\"alert\"><span>{}</span>\
         <button type=\"button\" aria-label=\"Dismiss\" onclick=\"this.parentElement.remove()\">×</button></div>",
        class,
        escape(message)
    );
}

/// Escape text for HTML element content and double-quoted attributes
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
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
