//! Documentation page bodies.

use crate::config::SiteConfig;
use crate::router::Page;
use crate::view::{text, Node};

pub mod install;
pub mod query_table;
pub mod usage;

/// Body of `page`.
pub fn content(page: Page, site: &SiteConfig) -> Node {
    match page {
        Page::Install => install::view(site),
        Page::Use => usage::view(site),
        Page::QueryTable => query_table::view(site),
        Page::NotFound => text("Not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_routable_page_has_content() {
        let site = SiteConfig::default();
        for page in Page::ROUTABLE {
            let html = content(page, &site).render();
            assert!(html.contains("mockup-code"), "{:?} has no code sample", page);
        }
    }

    #[test]
    fn not_found_is_plain_text() {
        assert_eq!(
            content(Page::NotFound, &SiteConfig::default()).render(),
            "Not found"
        );
    }
}
