use clap::Args;
use huddle_core::Core;

use crate::utils::{
    command_error,
    display::{LogBuilder, LogType},
};

#[derive(Args, Debug)]
pub struct Command {
    username: String,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    core.account()
        .toggle_following(&command.username)
        .await
        .map_err(command_error::store)?;

    LogBuilder::new(LogType::Success, "Follow state toggled")
        .with_branch("User", command.username)
        .print();
    Ok(())
}
