fn main() -> anyhow::Result<()> {
    correction_cli::run()
}
