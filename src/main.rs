use std::path::PathBuf;

use actix_web::web::Data;
use actix_web::{middleware, App, HttpServer};
use clap::Parser;

use rollbookd::{db, web};

/// Attendance and marks record keeper.
#[derive(Debug, Parser)]
#[command(name = "rollbookd")]
struct Args {
    /// Address to bind the HTTP server on.
    #[arg(long, default_value = "127.0.0.1:8088")]
    bind: String,

    /// Directory holding the SQLite database.
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let conn = db::open_db(&args.data_dir)?;
    let state = Data::new(web::AppState::new(conn));

    log::info!("listening on http://{}", args.bind);
    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(web::configure)
    })
    // The store is one serialized connection; extra workers would only
    // queue on its lock.
    .workers(1)
    .bind(&args.bind)?
    .run()
    .await?;
    Ok(())
}
