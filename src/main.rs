use anyhow::Result;

fn main() -> Result<()> {
    coach_booking::cli::run_cli()
}
