//! Graph command implementation

use super::GlobalArgs;
use super::helpers::{Context, print_json};
use crate::catalog::Tool;
use crate::cli::{GraphArgs, GraphFormat};
use crate::error::Result;
use crate::resolver::Resolver;

/// Run graph command
pub fn run(globals: &GlobalArgs, args: GraphArgs) -> Result<()> {
    let ctx = Context::load(globals)?;
    let resolver = Resolver::new(&ctx.catalog);

    let tools: Vec<&Tool> = if args.tools.is_empty() {
        ctx.catalog.tools()
    } else {
        // The selection plus everything it pulls in, in install order
        let selected = resolver.select(&args.tools)?;
        crate::resolver::sort::install_order(&ctx.catalog, &selected)
    };

    let graph = Resolver::dependency_graph(&tools);
    match args.format {
        GraphFormat::Json => print_json(&graph),
        GraphFormat::Dot => {
            print!("{}", graph.to_dot());
            Ok(())
        }
    }
}
