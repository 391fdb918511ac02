//! Asset pipeline for CSS and JavaScript processing.

use serde::Serialize;
use tackle_docs_app::router::{self, Page};

/// Hash routing table handed to the static client script.
///
/// Generated from the Rust router so the exported site resolves URLs the
/// same way the live application does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteTable {
    /// Joined path segments -> page slug
    pub routes: Vec<(String, String)>,
    /// Page slug -> canonical hash URL
    pub canonical: Vec<(String, String)>,
    /// Slug shown for anything not in `routes`
    pub fallback: String,
}

impl RouteTable {
    pub fn build() -> Self {
        let empty: [&str; 0] = [];
        let mut routes = vec![(
            String::new(),
            Page::parse_from_url_segments(&empty).slug().to_string(),
        )];
        let mut canonical = Vec::new();

        for page in Page::ROUTABLE {
            let (path, _) = page.to_url_segments();
            routes.push((path.join("/"), page.slug().to_string()));
            canonical.push((page.slug().to_string(), page.href()));
        }

        Self {
            routes,
            canonical,
            fallback: Page::NotFound.slug().to_string(),
        }
    }

    /// Slug the static script will show for `hash`.
    pub fn resolve(&self, hash: &str) -> &str {
        let key = router::url_segments(hash).join("/");
        self.routes
            .iter()
            .find(|(path, _)| *path == key)
            .map(|(_, slug)| slug.as_str())
            .unwrap_or(self.fallback.as_str())
    }
}

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the main CSS file.
    pub fn generate_css() -> String {
        DEFAULT_CSS.to_string()
    }

    /// Generate the static client script.
    pub fn generate_js() -> String {
        DEFAULT_JS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

// Fallback styles for the drawer layout and code mockups.
// A DaisyUI stylesheet listed in docs.toml takes precedence.
const DEFAULT_CSS: &str = r#"/* AzureTackle docs */

:root {
  --sidebar-width: 20rem;
  --code-bg: #1f2937;
  --code-fg: #e5e7eb;
  --warning: #fbbd23;
}

* {
  box-sizing: border-box;
}

body {
  margin: 0;
  font-family: system-ui, -apple-system, sans-serif;
  line-height: 1.6;
}

.drawer {
  display: grid;
  grid-template-columns: var(--sidebar-width) 1fr;
  min-height: 100vh;
}

.drawer-toggle {
  display: none;
}

.drawer-side {
  grid-column: 1;
  grid-row: 1;
}

.drawer-content {
  grid-column: 2;
  grid-row: 1;
  min-width: 0;
}

.menu {
  list-style: none;
  margin: 0;
}

.menu a {
  display: flex;
  padding: 0.5rem 0.75rem;
  border-radius: 0.5rem;
  color: inherit;
  text-decoration: none;
}

.menu a.active {
  background: #570df8;
  color: #fff;
}

.menu-title {
  font-size: 0.875rem;
  font-weight: 700;
  opacity: 0.6;
  padding: 0.5rem 0.75rem;
}

.mockup-code {
  background: var(--code-bg);
  color: var(--code-fg);
  border-radius: 1rem;
  padding: 1.25rem 0;
  overflow-x: auto;
  position: relative;
}

.mockup-code pre {
  margin: 0;
  padding-right: 1.25rem;
}

.mockup-code pre[data-prefix]::before {
  content: attr(data-prefix);
  display: inline-block;
  width: 2rem;
  margin-right: 1rem;
  text-align: right;
  opacity: 0.5;
}

.mockup-code .text-warning {
  color: var(--warning);
}

.flex-row {
  display: flex;
  flex-direction: row;
  gap: 1rem;
}

.flex-1 {
  flex: 1 1 0%;
  min-width: 0;
}

.divider-horizontal {
  display: flex;
  align-items: center;
}

.description {
  font-weight: 600;
  margin-bottom: 0.5rem;
}

.copy-btn {
  position: absolute;
  top: 0.5rem;
  right: 0.5rem;
  padding: 0.25rem 0.75rem;
  font-size: 0.75rem;
  border: none;
  border-radius: 0.375rem;
  cursor: pointer;
}

@media (max-width: 1024px) {
  .drawer {
    grid-template-columns: 1fr;
  }

  .drawer-side {
    display: none;
  }

  .drawer-toggle:checked ~ .drawer-side {
    display: block;
  }

  .drawer-content {
    grid-column: 1;
  }
}
"#;

const DEFAULT_JS: &str = r#"// AzureTackle docs - static hash router
(function() {
  'use strict';

  const table = window.__TACKLE_ROUTES__ || { routes: [], canonical: [], fallback: 'notfound' };
  const routes = new Map(table.routes);
  const canonical = new Map(table.canonical);
  const app = document.getElementById('app');
  let theme = app.dataset.defaultTheme || 'light';

  function segments(hash) {
    const path = hash.replace(/^#/, '').split('?')[0];
    return path.split('/').filter(Boolean).map(function(s) {
      try { return decodeURIComponent(s); } catch (e) { return s; }
    });
  }

  function resolve(hash) {
    const key = segments(hash).join('/');
    return routes.has(key) ? routes.get(key) : table.fallback;
  }

  function applyTheme() {
    const root = app.firstElementChild;
    if (root) {
      root.setAttribute('data-theme', theme);
    }
    document.querySelectorAll('[data-msg="set_theme"]').forEach(function(select) {
      select.value = theme;
    });
  }

  function addCopyButtons() {
    app.querySelectorAll('.mockup-code').forEach(function(block) {
      if (block.querySelector('.copy-btn')) return;

      const btn = document.createElement('button');
      btn.className = 'copy-btn';
      btn.textContent = 'Copy';
      btn.setAttribute('type', 'button');

      btn.addEventListener('click', async function() {
        const text = Array.from(block.querySelectorAll('code'))
          .map(function(code) { return code.textContent; })
          .join('\n');
        try {
          await navigator.clipboard.writeText(text);
          btn.textContent = 'Copied!';
        } catch (err) {
          btn.textContent = 'Error';
        }
        setTimeout(function() { btn.textContent = 'Copy'; }, 2000);
      });

      block.appendChild(btn);
    });
  }

  function render() {
    const slug = resolve(window.location.hash);
    const template = document.getElementById('page-' + slug);
    if (template) {
      app.innerHTML = template.innerHTML;
    }
    applyTheme();
    addCopyButtons();
  }

  document.addEventListener('change', function(event) {
    const target = event.target;
    if (target && target.dataset && target.dataset.msg === 'set_theme') {
      theme = target.value;
      applyTheme();
    }
  });

  window.addEventListener('hashchange', render);

  // Normalize the address bar to the canonical URL of the resolved page.
  const initial = resolve(window.location.hash);
  if (canonical.has(initial) && window.location.hash !== canonical.get(initial)) {
    history.replaceState(null, '', canonical.get(initial));
  }
  render();
})();
"#;
