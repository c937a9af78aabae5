use clap::Args;
use colored::Colorize;
use huddle_api::{User, UserFormValues};
use huddle_core::Core;

use crate::utils::{
    command_error::{self, Error},
    display::{LogBuilder, LogType},
    exit_code::ExitCode,
    session_file::SessionFile,
};

#[derive(Args, Debug)]
pub struct LoginCommand {
    #[clap(short, long)]
    email: String,

    #[clap(short, long)]
    password: String,
}

#[derive(Args, Debug)]
pub struct RegisterCommand {
    #[clap(short, long)]
    email: String,

    #[clap(short, long)]
    password: String,

    #[clap(short, long)]
    username: String,

    /// Name shown to other users, defaults to the username
    #[clap(short, long)]
    display_name: Option<String>,
}

#[derive(Args, Debug)]
pub struct LogoutCommand {}

#[derive(Args, Debug)]
pub struct WhoamiCommand {
    /// Show json output
    #[clap(long)]
    json: bool,
}

pub async fn handle_login(
    command: LoginCommand,
    core: &Core,
    session_file: &SessionFile,
) -> command_error::Result<()> {
    let form = UserFormValues {
        email: command.email,
        password: command.password,
        ..UserFormValues::default()
    };
    let user = core.account().login(form).await.map_err(command_error::store)?;
    session_file.save(&user.token)?;

    print_signed_in("Signed in", &user);
    Ok(())
}

pub async fn handle_register(
    command: RegisterCommand,
    core: &Core,
    session_file: &SessionFile,
) -> command_error::Result<()> {
    let form = UserFormValues {
        email: command.email,
        password: command.password,
        display_name: Some(command.display_name.unwrap_or_else(|| command.username.clone())),
        username: Some(command.username),
    };
    let user = core
        .account()
        .register(form)
        .await
        .map_err(command_error::store)?;
    session_file.save(&user.token)?;

    print_signed_in("Account created", &user);
    Ok(())
}

pub async fn handle_logout(
    _: LogoutCommand,
    core: &Core,
    session_file: &SessionFile,
) -> command_error::Result<()> {
    core.account().logout().await;
    session_file.clear()?;

    LogBuilder::new(LogType::Success, "Signed out").print();
    Ok(())
}

pub async fn handle_whoami(command: WhoamiCommand, core: &Core) -> command_error::Result<()> {
    let user = core.session().user().await;

    if command.json {
        let output = user.as_ref().map(|u| WhoamiOutput {
            username: &u.username,
            display_name: &u.display_name,
            image: u.image.as_deref(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match user {
        Some(user) => LogBuilder::new(LogType::Info, &user.display_name)
            .with_branch("Username", user.username.clone())
            .with_optional_branch("Image", user.image.clone())
            .print(),
        None => {
            println!("{}", "You are not signed in.".yellow());
            return Err(Error::Exit(ExitCode::PermissionDenied));
        }
    }
    Ok(())
}

/// Never carries the token.
#[derive(serde_derive::Serialize)]
#[serde(rename_all = "camelCase")]
struct WhoamiOutput<'a> {
    username: &'a str,
    display_name: &'a str,
    image: Option<&'a str>,
}

fn print_signed_in(message: &str, user: &User) {
    LogBuilder::new(LogType::Success, message)
        .with_branch("Username", user.username.clone())
        .with_branch("Name", user.display_name.clone())
        .print();
}
