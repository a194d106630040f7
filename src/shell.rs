use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::App;
use crate::image::ImageId;

const HELP: &str = "\
commands:
  username NAME    set the username for login/register
  password PASS    set the password for login/register
  login            log in with the current username/password
  register         create the account, then log in
  select PATH      choose the file to upload
  upload           upload the chosen file
  like ID          like an image
  refresh          reload the gallery
  url FILENAME     print where a file is served from
  show             print the current view
  help             this text
  quit";

#[derive(Debug, PartialEq, Eq)]
pub enum ShellCommand {
    Username(String),
    Password(String),
    Login,
    Register,
    Select(PathBuf),
    Upload,
    Like(ImageId),
    Refresh,
    Url(String),
    Show,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = &'static str;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start().trim_end_matches(|c| c == '\r' || c == '\n');
        // only the one space after the command word is a separator
        let (cmd, raw) = line.split_once(' ').unwrap_or((line, ""));
        let arg = raw.trim();

        let need_arg = |what| {
            if arg.is_empty() {
                Err(what)
            } else {
                Ok(arg.to_string())
            }
        };

        Ok(match cmd {
            "username" | "user" => Self::Username(need_arg("username needs a name")?),
            // taken verbatim, spaces included; empty is allowed
            "password" | "pass" => Self::Password(raw.to_string()),
            "login" => Self::Login,
            "register" => Self::Register,
            "select" => Self::Select(need_arg("select needs a path")?.into()),
            "upload" => Self::Upload,
            "like" => Self::Like(arg.parse().map_err(|_| "like needs an image id")?),
            "refresh" => Self::Refresh,
            "url" => Self::Url(need_arg("url needs a filename")?),
            "" | "show" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => return Err("unknown command, try `help`"),
        })
    }
}

/// Read commands from stdin until EOF or `quit`, re-rendering the view
/// after each one. Failed operations are only logged.
pub async fn run(app: &mut App) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", app.view());

    while let Some(line) = lines.next_line().await? {
        let cmd = match line.parse::<ShellCommand>() {
            Ok(cmd) => cmd,
            Err(msg) => {
                println!("{msg}");
                continue;
            }
        };

        if !apply(app, cmd).await {
            break;
        }
    }

    Ok(())
}

/// Returns false once the session should end.
async fn apply(app: &mut App, cmd: ShellCommand) -> bool {
    // errors were logged where they happened
    let _ = match cmd {
        ShellCommand::Username(name) => {
            app.set_username(name);
            Ok(())
        }
        ShellCommand::Password(pass) => {
            app.set_password(pass);
            Ok(())
        }
        ShellCommand::Login => app.login().await,
        ShellCommand::Register => app.register().await,
        ShellCommand::Select(path) => {
            if !app.select_file(&path) {
                println!("{path:?} isn't a file");
            }
            Ok(())
        }
        ShellCommand::Upload => app.submit_upload().await,
        ShellCommand::Like(id) => app.toggle_like(id).await,
        ShellCommand::Refresh => match app.token().cloned() {
            Some(token) => app.fetch_images(&token).await,
            None => Ok(()),
        },
        ShellCommand::Url(filename) => {
            println!("{}", app.resolve_thumbnail_url(&filename));
            return true;
        }
        ShellCommand::Show => Ok(()),
        ShellCommand::Help => {
            println!("{HELP}");
            return true;
        }
        ShellCommand::Quit => return false,
    };

    print!("{}", app.view());
    true
}
