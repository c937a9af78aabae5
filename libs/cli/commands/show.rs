use clap::Args;
use huddle_core::Core;

use super::activity::{print_details, select};
use crate::utils::command_error;

#[derive(Args, Debug)]
pub struct Command {
    id: String,

    /// Show json output
    #[clap(long)]
    json: bool,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    let activity = select(core, &command.id).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&activity)?);
    } else {
        print_details(&activity);
    }
    Ok(())
}
