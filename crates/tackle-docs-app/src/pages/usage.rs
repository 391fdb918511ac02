//! Getting started with queries.

use crate::config::SiteConfig;
use crate::view::{
    coded_no_example_view, coded_with_text_example_view, el, fix_docs_view, markdown, Node,
};

const CONNECT: &str = "open AzureTackle

// read the connection string from the environment
let connectionString () = Env.getVar \"app_db\"";

const QUERY: &str = "connectionString ()
|> AzureTackle.connect
|> AzureTackle.query \"SELECT Symbol, Price FROM Trades\"
|> AzureTackle.execute (fun read ->
    { Symbol = read.string \"Symbol\"
      Price = read.double \"Price\" })";

const QUERY_RESULT: &str = "Ok [
  { Symbol = \"MSFT\"; Price = 411.22 }
  { Symbol = \"AAPL\"; Price = 189.87 }
]";

pub fn view(site: &SiteConfig) -> Node {
    el("div")
        .child(
            el("div")
                .class("content")
                .child(markdown(
                    "Every query starts from a connection. Keep the connection string out of \
                     source control and read it from the environment.",
                ))
                .child(coded_no_example_view("Connect to your database", CONNECT))
                .child(markdown(
                    "Queries are composed with the pipe operator. `execute` maps each row \
                     with a reader function and returns a `Result`.",
                ))
                .child(coded_with_text_example_view("Run a query", QUERY, QUERY_RESULT)),
        )
        .child(fix_docs_view("Use", site))
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_query_with_result() {
        let html = view(&SiteConfig::default()).render();

        assert!(html.contains("Run a query"));
        assert!(html.contains("AzureTackle.execute"));
        assert!(html.contains("MSFT"));
    }
}
