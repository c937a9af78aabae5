use clap::Args;
use huddle_api::ActivityFormValues;
use huddle_core::Core;

use crate::utils::{
    command_error,
    display::{LogBuilder, LogType},
    time::{format_local, parse_date_time},
};

#[derive(Args, Debug)]
pub struct Command {
    title: String,

    /// When it takes place (YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339)
    #[clap(short, long)]
    date: String,

    #[clap(short, long)]
    category: Option<String>,

    #[clap(long)]
    description: Option<String>,

    #[clap(long)]
    city: Option<String>,

    #[clap(short, long)]
    venue: Option<String>,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    let form = ActivityFormValues {
        id: None,
        title: command.title,
        category: command.category.unwrap_or_default(),
        description: command.description.unwrap_or_default(),
        date: parse_date_time(&command.date)?,
        city: command.city.unwrap_or_default(),
        venue: command.venue.unwrap_or_default(),
    };

    let activity = core
        .activities()
        .create_activity(form)
        .await
        .map_err(command_error::store)?;

    LogBuilder::new(LogType::Success, "Activity created")
        .with_branch("Title", activity.title.clone())
        .with_branch("Date", format_local(&activity.date))
        .with_branch("ID", activity.id.clone())
        .print();
    Ok(())
}
