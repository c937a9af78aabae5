use clap::Args;
use huddle_api::ActivityFormValues;
use huddle_core::Core;

use super::activity::{print_details, select};
use crate::utils::{command_error, time::parse_date_time};

#[derive(Args, Debug)]
pub struct Command {
    id: String,

    #[clap(short, long)]
    title: Option<String>,

    /// New date (YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339)
    #[clap(short, long)]
    date: Option<String>,

    #[clap(short, long)]
    category: Option<String>,

    #[clap(long)]
    description: Option<String>,

    #[clap(long)]
    city: Option<String>,

    #[clap(short, long)]
    venue: Option<String>,
}

impl Command {
    /// Unset flags keep the current value of the activity.
    fn apply_to(self, form: &mut ActivityFormValues) -> eyre::Result<()> {
        if let Some(title) = self.title {
            form.title = title;
        }
        if let Some(date) = self.date {
            form.date = parse_date_time(&date)?;
        }
        if let Some(category) = self.category {
            form.category = category;
        }
        if let Some(description) = self.description {
            form.description = description;
        }
        if let Some(city) = self.city {
            form.city = city;
        }
        if let Some(venue) = self.venue {
            form.venue = venue;
        }
        Ok(())
    }
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    let activity = select(core, &command.id).await?;
    let mut form = ActivityFormValues::from(&activity);
    command.apply_to(&mut form)?;

    let store = core.activities();
    store.set_edit_mode(true).await;
    store
        .update_activity(form)
        .await
        .map_err(command_error::store)?;

    if let Some(updated) = store.selected_activity().await {
        print_details(&updated);
    }
    Ok(())
}
