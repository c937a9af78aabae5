use chrono::Local;
use clap::Args;
use colored::Colorize;
use huddle_api::{Activity, Pagination};
use huddle_core::{Core, PredicateFilter};
use prettytable::{format, row, Table};
use serde_derive::Serialize;

use crate::utils::{
    command_error,
    display::{activity_status, host_name},
    time::parse_date_time,
};

#[derive(Args, Debug)]
pub struct Command {
    /// Only activities you attend
    #[clap(long, conflicts_with = "hosting")]
    going: bool,

    /// Only activities you host
    #[clap(long)]
    hosting: bool,

    /// Only activities from this date on (YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339)
    #[clap(long)]
    from: Option<String>,

    /// Load every page up to this one
    #[clap(long)]
    page: Option<u32>,

    /// Show json output
    #[clap(long)]
    json: bool,
}

impl Command {
    fn filters(&self) -> eyre::Result<Vec<PredicateFilter>> {
        let mut filters = Vec::new();
        if self.going {
            filters.push(PredicateFilter::IsGoing);
        } else if self.hosting {
            filters.push(PredicateFilter::IsHost);
        }
        if let Some(from) = &self.from {
            filters.push(PredicateFilter::StartDate(parse_date_time(from)?));
        }
        Ok(filters)
    }
}

#[derive(Serialize)]
struct ListOutput {
    activities: Vec<Activity>,
    pagination: Option<Pagination>,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    let store = core.activities();
    let filters = command.filters()?;

    if filters.is_empty() {
        store.load_activities().await;
    } else {
        store.set_predicates(filters).await;
    }

    let last_page = command.page.unwrap_or(1);
    while store.read().await.paging_params.page_number < last_page {
        if !store.load_next_page().await {
            break;
        }
    }

    if command.json {
        let output = ListOutput {
            activities: store.activities_by_date().await,
            pagination: store.read().await.pagination,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    // rows print local times, so days are split in local time too
    let groups = store.grouped_activities_in(&Local).await;
    if groups.is_empty() {
        println!("{}", "No activity matches.".yellow());
        return Ok(());
    }

    for (label, activities) in groups {
        println!("\n{}", label.bold());

        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_CLEAN);
        for activity in activities.iter() {
            table.add_row(row![
                activity.id.dimmed(),
                activity.date.with_timezone(&Local).format("%H:%M"),
                activity.title.cyan(),
                format!("{}, {}", activity.venue, activity.city),
                host_name(activity),
                format!("{} going", activity.attendees.len()),
                activity_status(activity),
            ]);
        }
        table.printstd();
    }

    if let Some(pagination) = store.read().await.pagination {
        println!(
            "\n{}",
            format!(
                "page {} of {} ({} activities)",
                pagination.current_page, pagination.total_pages, pagination.total_items
            )
            .dimmed()
        );
    }
    Ok(())
}
