use clap::Args;
use huddle_core::Core;

use super::activity::select;
use crate::utils::{
    command_error::{self, Error},
    display::{LogBuilder, LogType},
    exit_code::ExitCode,
};

#[derive(Args, Debug)]
pub struct Command {
    id: String,
}

#[derive(Args, Debug)]
pub struct CancelCommand {
    id: String,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    let activity = select(core, &command.id).await?;
    if activity.is_host {
        return Err(Error::ExitWithError(
            ExitCode::Error,
            eyre::eyre!("you host '{}', use `huddle cancel` instead", activity.title),
        ));
    }

    let store = core.activities();
    store.update_attendance().await.map_err(command_error::store)?;

    let going = store
        .selected_activity()
        .await
        .is_some_and(|a| a.is_going);
    let message = if going {
        "You are going"
    } else {
        "You are no longer going"
    };
    LogBuilder::new(LogType::Success, message)
        .with_branch("Activity", activity.title)
        .print();
    Ok(())
}

pub async fn handle_cancel(command: CancelCommand, core: &Core) -> command_error::Result<()> {
    let activity = select(core, &command.id).await?;
    if !activity.is_host {
        return Err(Error::ExitWithError(
            ExitCode::PermissionDenied,
            eyre::eyre!("only the host of '{}' can cancel it", activity.title),
        ));
    }

    let store = core.activities();
    store
        .cancel_activity_toggle()
        .await
        .map_err(command_error::store)?;

    let cancelled = store
        .selected_activity()
        .await
        .is_some_and(|a| a.is_cancelled);
    let (log_type, message) = if cancelled {
        (LogType::Warning, "Activity cancelled")
    } else {
        (LogType::Success, "Activity reactivated")
    };
    LogBuilder::new(log_type, message)
        .with_branch("Activity", activity.title)
        .print();
    Ok(())
}
