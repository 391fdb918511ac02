//! Page shells wrapped around the rendered application.

use minijinja::{context, Environment};

/// A pre-rendered page, embedded as a `<template>`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PageTemplate {
    /// Page slug, used in the element id
    pub slug: String,
    /// Rendered application HTML for the page
    pub html: String,
}

/// Context for rendering a shell template.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct Context {
    /// Site title
    pub site_title: String,
    /// Base URL
    pub base_url: String,
    /// Stylesheet URLs to link
    pub styles: Vec<String>,
    /// Application HTML shown before any script runs
    pub app_html: String,
    /// Theme the client starts from
    pub default_theme: String,
    /// Pages for the static hash router
    pub pages: Vec<PageTemplate>,
    /// Serialized route table for the static hash router
    pub routes_json: String,
    /// Script driving the page
    pub script: String,
}

/// Template engine using minijinja.
///
/// URLs come from `docs.toml` and are emitted unescaped.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create a new template engine with the built-in shells.
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();

        env.add_template_owned("base.html".to_string(), BASE_TEMPLATE.to_string())?;
        env.add_template_owned("static.html".to_string(), STATIC_TEMPLATE.to_string())?;
        env.add_template_owned("live.html".to_string(), LIVE_TEMPLATE.to_string())?;

        Ok(Self { env })
    }

    /// Render a shell using the specified template.
    pub fn render_page(
        &self,
        template: &str,
        context: &Context,
    ) -> Result<String, minijinja::Error> {
        let tmpl = self.env.get_template(template)?;

        tmpl.render(context! {
            site_title => &context.site_title,
            base_url => &context.base_url,
            styles => &context.styles,
            app_html => &context.app_html,
            default_theme => &context.default_theme,
            pages => &context.pages,
            routes_json => &context.routes_json,
            script => &context.script,
        })
    }
}

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ site_title }}</title>
  <link rel="stylesheet" href="{{ base_url | safe }}assets/main.css">
  {% for style in styles %}<link rel="stylesheet" href="{{ style | safe }}">
  {% endfor %}
</head>
<body>
  <div id="app" data-default-theme="{{ default_theme }}">{{ app_html | safe }}</div>
  {% block scripts %}{% endblock %}
</body>
</html>"##;

const STATIC_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block scripts %}
{% for page in pages %}
  <template id="page-{{ page.slug }}">{{ page.html | safe }}</template>
{% endfor %}
  <script>window.__TACKLE_ROUTES__ = {{ routes_json | safe }};</script>
  <script src="{{ script | safe }}"></script>
{% endblock %}"##;

const LIVE_TEMPLATE: &str = r##"{% extends "base.html" %}

{% block scripts %}
  <script src="{{ script | safe }}"></script>
{% endblock %}"##;

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> Context {
        Context {
            site_title: "AzureTackle".to_string(),
            base_url: "/".to_string(),
            app_html: "<p>Hello world</p>".to_string(),
            default_theme: "light".to_string(),
            script: "/assets/app.js".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn renders_static_shell() {
        let engine = TemplateEngine::new().unwrap();

        let context = Context {
            pages: vec![PageTemplate {
                slug: "install".to_string(),
                html: "<h2>Installation</h2>".to_string(),
            }],
            routes_json: r#"{"routes":[]}"#.to_string(),
            ..context()
        };

        let html = engine.render_page("static.html", &context).unwrap();

        assert!(html.contains("<title>AzureTackle</title>"));
        assert!(html.contains("<p>Hello world</p>"));
        assert!(html.contains(r#"<template id="page-install"><h2>Installation</h2></template>"#));
        assert!(html.contains(r#"window.__TACKLE_ROUTES__ = {"routes":[]};"#));
        assert!(html.contains(r#"data-default-theme="light""#));
    }

    #[test]
    fn renders_live_shell() {
        let engine = TemplateEngine::new().unwrap();
        let context = Context {
            script: "/__live.js".to_string(),
            ..context()
        };

        let html = engine.render_page("live.html", &context).unwrap();

        assert!(html.contains(r#"<script src="/__live.js"></script>"#));
        assert!(!html.contains("<template"));
    }

    #[test]
    fn links_stylesheets() {
        let engine = TemplateEngine::new().unwrap();
        let context = Context {
            styles: vec!["https://cdn.example.com/daisy.css".to_string()],
            ..context()
        };

        let html = engine.render_page("live.html", &context).unwrap();
        assert!(html.contains(
            r#"<link rel="stylesheet" href="https://cdn.example.com/daisy.css">"#
        ));
    }
}
