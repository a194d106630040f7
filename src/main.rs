use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use log::{debug, error, info};

mod api;
mod app;
mod args;
mod auth;
mod image;
mod render;
mod shell;
mod store;
mod upload;

#[cfg(test)]
mod mock;

use api::Api;
use app::App;
use args::{Args, Command};
use store::TokenStore;

#[tokio::main]
async fn main() -> ExitCode {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let args = Args::parse();

    let Ok(api) = Api::new(args.server()) else {
        return ExitCode::FAILURE;
    };

    let data_dir = args.data_dir();
    let mut app = App::new(api, TokenStore::new(&data_dir));

    let result = match args.action() {
        // neither of these need a session
        Command::Url { filename } => {
            println!("{}", app.resolve_thumbnail_url(&filename));
            return ExitCode::SUCCESS;
        }
        Command::Fetch { filename, output } => {
            let output = output.unwrap_or_else(|| filename.clone().into());
            return match fetch(&app, &filename, &output).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(()) => ExitCode::FAILURE,
            };
        }
        command => {
            debug!("session kept in {data_dir:?}");
            let restored = app.restore_session().await;
            run(&mut app, command, restored).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

async fn run(app: &mut App, command: Command, restored: app::Result<()>) -> Result<(), ()> {
    let result = match command {
        Command::Show => restored,
        Command::Login { username, password } => {
            app.set_username(username);
            app.set_password(password);
            app.login().await
        }
        Command::Register { username, password } => {
            app.set_username(username);
            app.set_password(password);
            app.register().await
        }
        Command::Upload { file } => {
            if !app.select_file(&file) {
                error!("{file:?} doesn't name a file");
                return Err(());
            }
            app.submit_upload().await
        }
        Command::Like { id } => app.toggle_like(id).await,
        Command::Shell => {
            return shell::run(app).await.map_err(|e| {
                error!("reading commands: {e}");
            });
        }
        Command::Url { .. } | Command::Fetch { .. } => Ok(()),
    };

    print!("{}", app.view());
    result.map_err(|_| ())
}

async fn fetch(app: &App, filename: &str, output: &Path) -> Result<(), ()> {
    let contents = app.fetch_thumbnail(filename).await.map_err(|_| ())?;

    tokio::fs::write(output, &contents).await.map_err(|e| {
        error!("write {output:?}: {e}");
    })?;

    info!("saved {} bytes to {output:?}", contents.len());
    Ok(())
}
