use sea_orm::Database;
use sea_orm_migration::prelude::*;

const DEFAULT_DATABASE_URL: &str = "sqlite:./invoicer.db?mode=rwc";
const USAGE: &str = "usage: migration [up|down|fresh|status] (DATABASE_URL selects the database)";

enum Step {
    Up,
    Down,
    Fresh,
    Status,
}

impl Step {
    fn parse(arg: Option<&str>) -> Option<Self> {
        match arg.unwrap_or("up") {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "fresh" => Some(Self::Fresh),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let arg = std::env::args().nth(1);
    let Some(step) = Step::parse(arg.as_deref()) else {
        eprintln!("{USAGE}");
        std::process::exit(2);
    };

    let url = std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
    let db = Database::connect(&url).await?;

    match step {
        Step::Up => migration::Migrator::up(&db, None).await?,
        // Only the most recent migration is reverted.
        Step::Down => migration::Migrator::down(&db, Some(1)).await?,
        Step::Fresh => migration::Migrator::fresh(&db).await?,
        Step::Status => migration::Migrator::status(&db).await?,
    }

    Ok(())
}
