//! Page chrome: navigation drawer, content pane and the root layout.

use crate::app::State;
use crate::config::SiteConfig;
use crate::pages;
use crate::router::Page;
use crate::view::{el, Element, Node};

/// Id of the checkbox toggling the navigation drawer on small screens.
const MENU_ID: &str = "main-menu";

/// Heading shown above the content of a page.
pub fn page_title(page: Page) -> &'static str {
    match page {
        Page::Install => "Installation",
        Page::Use => "How to use",
        Page::QueryTable => "QueryTable",
        Page::NotFound => "Not found",
    }
}

/// The whole application for the given state.
pub fn app_view(state: &State, site: &SiteConfig) -> Node {
    let title = page_title(state.page);
    let content = pages::content(state.page, site);
    in_layout(state, site, title, state.page, content)
}

/// Root element: drawer with content and navigation, themed by `state`.
pub fn in_layout(state: &State, site: &SiteConfig, title: &str, page: Page, content: Node) -> Node {
    el("div")
        .class("bg-base-100 text-base-content h-screen")
        .attr("data-theme", state.theme.as_str())
        .child(
            el("div")
                .class("drawer")
                .class("lg:drawer-open")
                .child(
                    el("input")
                        .class("drawer-toggle")
                        .attr("type", "checkbox")
                        .attr("id", MENU_ID),
                )
                .child(right_side(state, site, title, content))
                .child(left_side(page, site)),
        )
        .into()
}

/// Content pane: navbar with the drawer toggle and theme picker, then the page.
pub fn right_side(state: &State, site: &SiteConfig, title: &str, content: Node) -> Node {
    let menu_button = el("label")
        .class("btn")
        .class("btn-square")
        .class("btn-ghost")
        .attr("for", MENU_ID)
        .child(
            el("svg")
                .attr("viewBox", "0 0 24 24")
                .class("inline-block w-6 h-6 stroke-current")
                .child(
                    el("path")
                        .attr("d", "M4 6h16M4 12h16M4 18h16")
                        .attr("stroke-width", "2"),
                ),
        );

    el("div")
        .class("drawer-content")
        .child(
            el("div")
                .class("navbar")
                .child(
                    el("div")
                        .class("navbar-start")
                        .child(el("div").class("lg:hidden").child(menu_button)),
                )
                .child(el("div").class("navbar-end").child(theme_picker(state, site))),
        )
        .child(
            el("div")
                .class("px-5 py-5")
                .child(
                    el("h2")
                        .class("text-primary")
                        .class("my-6 text-5xl font-bold")
                        .text(title),
                )
                .child(content),
        )
        .into()
}

/// Navigation drawer listing every routable page.
pub fn left_side(page: Page, site: &SiteConfig) -> Node {
    let brand = el("div")
        .class("inline-block text-3xl font-title px-5 py-5 font-bold")
        .child(el("span").class("text-primary").text(site.package.as_str()))
        .child(
            el("a")
                .attr("href", site.nuget_url())
                .child(el("img").attr("src", site.badge_url())),
        );

    let menu = el("ul")
        .class("menu")
        .class("menu-md")
        .class("flex flex-col p-4 pt-0")
        .child(el("li").class("menu-title").child(el("span").text("Docs")))
        .children(Page::ROUTABLE.iter().map(|&p| menu_item(p.label(), p, page)));

    el("div")
        .class("drawer-side")
        .child(el("label").class("drawer-overlay").attr("for", MENU_ID))
        .child(
            el("aside")
                .class("flex flex-col border-r w-80 bg-base-100 text-base-content")
                .child(brand)
                .child(menu),
        )
        .into()
}

fn menu_item(label: &str, target: Page, current: Page) -> Element {
    el("li").child(
        el("a")
            .class_if(target == current, "active")
            .attr("href", target.href())
            .text(label),
    )
}

fn theme_picker(state: &State, site: &SiteConfig) -> Element {
    let mut themes: Vec<&str> = site.themes.iter().map(String::as_str).collect();
    if !themes.contains(&state.theme.as_str()) {
        themes.insert(0, state.theme.as_str());
    }

    let options = themes.into_iter().map(|theme| {
        let option = el("option").attr("value", theme).text(theme);
        if theme == state.theme {
            option.attr("selected", "selected")
        } else {
            option
        }
    });

    el("select")
        .class("select select-sm select-bordered")
        .attr("aria-label", "Theme")
        .attr("data-msg", "set_theme")
        .children(options)
}
