use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = aq_api::Args::parse();

	aq_api::run(args).await
}
