//! Installation instructions.

use crate::config::SiteConfig;
use crate::view::{coded_no_example_view, el, fix_docs_view, markdown, Node};

pub fn view(site: &SiteConfig) -> Node {
    let dotnet = format!("dotnet add package {}", site.package);
    let paket = format!("paket add {} --project ./project/path", site.package);

    el("div")
        .child(
            el("div")
                .class("content")
                .child(markdown(&format!(
                    "{} is published on NuGet. Add it to your project with the .NET CLI \
                     or with Paket.",
                    site.package
                )))
                .child(coded_no_example_view("Using the .NET CLI", &dotnet))
                .child(coded_no_example_view("Using Paket", &paket))
                .child(markdown(
                    "The library talks to Azure Table Storage, so the project also needs a \
                     storage account connection string at runtime. See **How to use** for \
                     the first query.",
                )),
        )
        .child(fix_docs_view("Install", site))
        .into()
}
