use sea_orm_migration::prelude::*;

use presenza_attendance_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
