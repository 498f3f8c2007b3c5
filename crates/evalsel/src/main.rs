use clap::Parser;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = evalsel::cli::Cli::parse();
    evalsel::init(cli.verbose);

    cli.run().await
}
