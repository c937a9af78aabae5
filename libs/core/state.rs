use std::{collections::HashMap, fmt};

use chrono::{TimeZone, Utc};

use huddle_api::{Activity, ActivityId, Pagination, QueryParams};

use crate::{paging::PagingParams, predicate::Predicate};

/// Label format of [`ActivityState::grouped_activities`], e.g. `04 May 2024`.
pub const GROUP_LABEL_FORMAT: &str = "%d %B %Y";

/// Everything the activity views render from. Only the store mutates it,
/// one commit at a time.
#[derive(Debug, Clone)]
pub struct ActivityState {
    pub registry: HashMap<ActivityId, Activity>,
    pub selected: Option<ActivityId>,
    pub edit_mode: bool,
    /// a mutation of a single activity is in flight
    pub loading: bool,
    /// a list or details fetch is in flight
    pub loading_initial: bool,
    pub pagination: Option<Pagination>,
    pub paging_params: PagingParams,
    pub predicate: Predicate,
}

impl ActivityState {
    pub fn new(page_size: u32) -> Self {
        Self {
            registry: HashMap::new(),
            selected: None,
            edit_mode: false,
            loading: false,
            loading_initial: true,
            pagination: None,
            paging_params: PagingParams::first_page(page_size),
            predicate: Predicate::default(),
        }
    }

    pub fn selected_activity(&self) -> Option<&Activity> {
        self.selected.as_ref().and_then(|id| self.registry.get(id))
    }

    /// Cached activities, earliest first. Ties keep a stable order by id.
    pub fn activities_by_date(&self) -> Vec<&Activity> {
        let mut activities: Vec<&Activity> = self.registry.values().collect();
        activities.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
        activities
    }

    /// Activities by UTC day label, in date order.
    pub fn grouped_activities(&self) -> Vec<(String, Vec<&Activity>)> {
        self.grouped_activities_in(&Utc)
    }

    /// Activities by day label in `tz`, in date order.
    pub fn grouped_activities_in<Tz>(&self, tz: &Tz) -> Vec<(String, Vec<&Activity>)>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut groups: Vec<(String, Vec<&Activity>)> = Vec::new();
        let mut group_index: HashMap<String, usize> = HashMap::new();

        for activity in self.activities_by_date() {
            let label = activity
                .date
                .with_timezone(tz)
                .format(GROUP_LABEL_FORMAT)
                .to_string();
            match group_index.get(&label) {
                Some(index) => groups[*index].1.push(activity),
                None => {
                    group_index.insert(label.clone(), groups.len());
                    groups.push((label, vec![activity]));
                }
            }
        }

        groups
    }

    /// Query string of the next list request: paging first, then the predicate.
    pub fn query_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("pageNumber", self.paging_params.page_number)
            .with("pageSize", self.paging_params.page_size);
        self.predicate.append_to(&mut params);
        params
    }
}
