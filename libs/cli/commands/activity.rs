use chrono_humanize::HumanTime;
use huddle_api::Activity;
use huddle_core::Core;

use crate::utils::{
    command_error::{self, Error},
    display::{activity_status, host_name, LogBuilder, LogType},
    exit_code::ExitCode,
    time::format_local,
};

/// Selects `id` in the store, fetching it from the backend.
pub async fn select(core: &Core, id: &str) -> command_error::Result<Activity> {
    core.activities().load_activity(id).await.ok_or_else(|| {
        Error::ExitWithError(
            ExitCode::NoInput,
            eyre::eyre!("activity '{id}' could not be loaded"),
        )
    })
}

pub fn print_details(activity: &Activity) {
    let attendees = activity
        .attendees
        .iter()
        .map(|a| {
            if a.following {
                format!("{} (following)", a.display_name)
            } else {
                a.display_name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    let status = activity_status(activity);

    LogBuilder::new(LogType::Info, &activity.title)
        .with_branch(
            "Date",
            format!(
                "{} ({})",
                format_local(&activity.date),
                HumanTime::from(activity.date)
            ),
        )
        .with_branch("Category", activity.category.clone())
        .with_branch("Venue", format!("{}, {}", activity.venue, activity.city))
        .with_branch("Host", host_name(activity))
        .with_optional_branch(
            "Details",
            Some(activity.description.clone()).filter(|d| !d.is_empty()),
        )
        .with_branch("Attendees", attendees)
        .with_optional_branch("Status", Some(status).filter(|s| !s.is_empty()))
        .with_branch("ID", activity.id.clone())
        .print();
}
