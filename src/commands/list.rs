use crate::accumulator::AccumulatorConfig;
use crate::cli::PageArgs;
use crate::client::ApiClient;
use crate::error::Result;
use crate::render;
use crate::session::Session;

pub async fn run(client: ApiClient, config: AccumulatorConfig, args: PageArgs) -> Result<()> {
    let mut session = Session::bootstrap(client, config).await?;
    session.load_pages(args.limit()).await?;

    render::print_results(session.accumulator());
    Ok(())
}
