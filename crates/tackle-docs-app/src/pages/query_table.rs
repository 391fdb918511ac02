//! Querying a table end to end.

use crate::config::SiteConfig;
use crate::view::{coded_view, el, fix_docs_view, lined_mockup_code, markdown, Node};

pub const TITLE: &str = "AzureTackle";

pub const CODE: &str = "
            let data =
                connectionString()
                |> AzureTackle.connect
                |> AzureTackle.query
                \"
                SELECT * FROM Trades
                ORDER BY timestamp desc
                \"
                |> AzureTackle.execute (fun read ->
                    { Symbol = read.string \"Symbol\"
                      Timestamp = read.dateTime \"Timestamp\"
                      Price = read.double \"Price\"
                      TradeSize = read.double \"TradeSize\" })
                |> function
                | Ok x -> x
                | otherwise ->
                    printfn \"error %A\" otherwise
                    fail () ";

/// The example rendered next to [`CODE`].
fn example() -> Node {
    el("div")
        .child(el("h1").class("title is-1").text("AzureTackle - QueryTable"))
        .child(el("hr"))
        .child(
            el("div")
                .class("content")
                .child(el("h4").class("title is-4").text("Connect to your database"))
                .child(markdown("Get the connection from the environment"))
                .child(lined_mockup_code(
                    "\n            open AzureTackle\n            let connectionString() = Env.getVar \"app_db\"",
                )),
        )
        .into()
}

pub fn view(site: &SiteConfig) -> Node {
    el("div")
        .child(el("div").class("content").child(coded_view(TITLE, CODE, example())))
        .child(fix_docs_view("QueryTable", site))
        .into()
}
