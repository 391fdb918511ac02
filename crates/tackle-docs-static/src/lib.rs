//! Static export of the AzureTackle documentation site.
//!
//! Pre-renders every page into a single `index.html`; a small script swaps
//! pages on hash changes using the route table generated from the router.

pub mod assets;
pub mod builder;
pub mod templates;

pub use assets::{AssetPipeline, RouteTable};
pub use builder::{BuildConfig, BuildError, BuildResult, StaticBuilder};
pub use templates::{Context, TemplateEngine};
