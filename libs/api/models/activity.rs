use chrono::{DateTime, Utc};
use patronus::{patronus, Patch};
use serde_derive::{Deserialize, Serialize};

use super::{profile::Profile, user::User};

pub type ActivityId = String;

#[patronus(
    name = "ActivityUpdate",
    derives = "Default, Debug, Clone, PartialEq"
)]
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub host_username: String,
    #[serde(default)]
    pub is_cancelled: bool,
    #[serde(default)]
    pub is_going: bool,
    #[serde(default)]
    pub is_host: bool,
    #[serde(default)]
    pub host: Option<Profile>,
    #[serde(default)]
    pub attendees: Vec<Profile>,
}

impl Activity {
    /// Builds the local entity for a freshly created activity: the creator
    /// is its host and only attendee.
    pub fn from_form(id: ActivityId, form: &ActivityFormValues, creator: &User) -> Self {
        let mut activity = Self {
            id,
            title: form.title.clone(),
            date: form.date,
            description: form.description.clone(),
            category: form.category.clone(),
            city: form.city.clone(),
            venue: form.venue.clone(),
            host_username: creator.username.clone(),
            is_cancelled: false,
            is_going: false,
            is_host: false,
            host: None,
            attendees: vec![Profile::from(creator)],
        };
        activity.decorate_for(Some(creator));
        activity
    }

    /// Recomputes the fields that depend on who is looking at the activity.
    /// Without a viewer the flags are left untouched.
    pub fn decorate_for(&mut self, viewer: Option<&User>) {
        if let Some(user) = viewer {
            self.is_going = self.attendees.iter().any(|a| a.username == user.username);
            self.is_host = self.host_username == user.username;
            self.host = self
                .attendees
                .iter()
                .find(|a| a.username == self.host_username)
                .cloned();
        }
    }

    pub fn attendee(&self, username: &str) -> Option<&Profile> {
        self.attendees.iter().find(|a| a.username == username)
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityFormValues {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ActivityId>,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub venue: String,
}

impl From<&Activity> for ActivityFormValues {
    fn from(activity: &Activity) -> Self {
        Self {
            id: Some(activity.id.clone()),
            title: activity.title.clone(),
            category: activity.category.clone(),
            description: activity.description.clone(),
            date: activity.date,
            city: activity.city.clone(),
            venue: activity.venue.clone(),
        }
    }
}

impl ActivityFormValues {
    /// The fields a form carries, as a patch over a cached activity.
    pub fn to_update(&self) -> ActivityUpdate {
        ActivityUpdate::default()
            .set_opt_id(self.id.clone())
            .set_title(self.title.clone())
            .set_category(self.category.clone())
            .set_description(self.description.clone())
            .set_date(self.date)
            .set_city(self.city.clone())
            .set_venue(self.venue.clone())
    }

    pub fn merge_into(&self, activity: &Activity) -> Activity {
        self.to_update().apply_to(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user(username: &str) -> User {
        User {
            username: username.into(),
            display_name: username.to_uppercase(),
            token: format!("token-{username}"),
            image: None,
        }
    }

    fn form() -> ActivityFormValues {
        ActivityFormValues {
            id: None,
            title: "Pub quiz".into(),
            category: "drinks".into(),
            description: "Weekly quiz".into(),
            date: Utc.with_ymd_and_hms(2024, 3, 1, 19, 0, 0).unwrap(),
            city: "London".into(),
            venue: "The Crown".into(),
        }
    }

    #[test]
    fn from_form_makes_creator_host_and_sole_attendee() {
        let bob = user("bob");
        let activity = Activity::from_form("a1".into(), &form(), &bob);

        assert_eq!(activity.host_username, "bob");
        assert_eq!(activity.attendees.len(), 1);
        assert!(activity.is_going);
        assert!(activity.is_host);
        assert_eq!(activity.host.as_ref().map(|h| h.username.as_str()), Some("bob"));
    }

    #[test]
    fn decorate_for_other_viewer() {
        let bob = user("bob");
        let mut activity = Activity::from_form("a1".into(), &form(), &bob);

        activity.decorate_for(Some(&user("alice")));

        assert!(!activity.is_going);
        assert!(!activity.is_host);
        assert_eq!(activity.host.as_ref().map(|h| h.username.as_str()), Some("bob"));
    }

    #[test]
    fn form_merge_keeps_fields_the_form_does_not_carry() {
        let bob = user("bob");
        let mut activity = Activity::from_form("a1".into(), &form(), &bob);
        activity.is_cancelled = true;

        let mut edited = ActivityFormValues::from(&activity);
        edited.title = "Pub quiz night".into();
        let merged = edited.merge_into(&activity);

        assert_eq!(merged.title, "Pub quiz night");
        assert_eq!(merged.id, "a1");
        assert!(merged.is_cancelled);
        assert_eq!(merged.attendees, activity.attendees);
    }

    #[test]
    fn form_without_id_does_not_clear_the_cached_id() {
        let activity = Activity::from_form("a1".into(), &form(), &user("bob"));

        let merged = form().merge_into(&activity);

        assert_eq!(merged.id, "a1");
    }

    #[test]
    fn deserializes_server_payload_with_string_date() -> eyre::Result<()> {
        let activity: Activity = serde_json::from_str(
            r#"{
                "id": "a9",
                "title": "Climbing",
                "date": "2024-05-04T10:30:00Z",
                "hostUsername": "carol",
                "attendees": [{"username": "carol", "displayName": "Carol", "followersCount": 3}]
            }"#,
        )?;

        assert_eq!(activity.date, Utc.with_ymd_and_hms(2024, 5, 4, 10, 30, 0).unwrap());
        assert_eq!(activity.attendees[0].followers_count, 3);
        assert!(!activity.attendees[0].following);
        assert!(activity.host.is_none());
        Ok(())
    }
}
