use clap::Args;
use huddle_core::Core;

use crate::utils::{
    command_error,
    display::{LogBuilder, LogType},
};

#[derive(Args, Debug)]
pub struct Command {
    id: String,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    core.activities()
        .delete_activity(&command.id)
        .await
        .map_err(command_error::store)?;

    LogBuilder::new(LogType::Success, "Activity deleted")
        .with_branch("ID", command.id)
        .print();
    Ok(())
}
