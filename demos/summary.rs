use miette::{miette, Result};
use wxreport::Report;

fn main() -> Result<()> {
    let file = std::env::args()
        .nth(1)
        .ok_or_else(|| miette!("Missing filename"))?;
    let report = Report::from_path(&file)?;

    print!("{}", report.daily_summary());
    print!("{}", report.overview());

    Ok(())
}
