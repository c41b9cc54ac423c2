use crate::accumulator::{AccumulatorConfig, ResultAccumulator};
use crate::cli::SearchArgs;
use crate::client::ApiClient;
use crate::error::Result;
use crate::render;
use crate::session::Session;

pub async fn run(client: ApiClient, config: AccumulatorConfig, args: SearchArgs) -> Result<()> {
    // Nothing is rendered before the search lands, so skip the default page.
    let mut session = Session::new(client, ResultAccumulator::empty(config));
    session.search(&args.query)?;
    session.settle().await?;
    session.load_pages(args.pages.limit()).await?;

    render::print_results(session.accumulator());
    Ok(())
}
