fn main() -> anyhow::Result<()> {
    grpc_agent_gen::cli::run_cli()
}
