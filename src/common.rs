use handlebars::{handlebars_helper, Handlebars};
use serde_json::Value;
use tracing::info;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn create_path_if_not_exists(path: &str) -> anyhow::Result<()> {
    //
    // remove the file name from the path

    let path = Path::new(path)
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Invalid path: no parent directory for '{}'", path))?;
    if !path.exists() {
        info!("Creating path: {:?}", path);
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn write_string_to_file(filename: &str, content: &str) -> anyhow::Result<()> {
    create_path_if_not_exists(filename)?;
    let path = Path::new(filename);
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();

    handlebars_helper!(exists: |v: Value| !v.is_null());
    handlebars.register_helper("exists", Box::new(exists));

    // Embeds a context value as compact JSON; used with triple-stash to
    // inline trace and layout objects into the dashboard template
    handlebars_helper!(json: |v: Value| v.to_string());
    handlebars.register_helper("json", Box::new(json));

    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn write_string_to_file_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/nested/dashboard.html");
        write_string_to_file(&path.to_string_lossy(), "<html></html>").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }

    #[test]
    fn handlebars_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("Hello {{name}}", &json!({"name": "foo"}))
            .expect("This to render");
        assert_eq!(res, "Hello foo");
    }

    #[test]
    fn handlebars_helper_json_embeds_compact_json() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                "var traces = {{{json traces}}};",
                &json!({"traces": [{"type": "bar", "x": [1, 2]}]}),
            )
            .expect("This to render");
        assert_eq!(res, r#"var traces = [{"type":"bar","x":[1,2]}];"#);
    }

    #[test]
    fn handlebars_helper_exists_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template(
                r#"{{#if (exists title) }}{{title}}{{/if}}"#,
                &json!({"title": "Dashboard"}),
            )
            .expect("This to render");
        assert_eq!(res, "Dashboard");
    }
}
