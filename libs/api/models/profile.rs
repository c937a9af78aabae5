use serde_derive::{Deserialize, Serialize};

use super::user::User;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub followers_count: u32,
    #[serde(default)]
    pub following_count: u32,
    /// Whether the signed in user follows this profile
    #[serde(default)]
    pub following: bool,
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            image: user.image.clone(),
            bio: None,
            followers_count: 0,
            following_count: 0,
            following: false,
        }
    }
}

impl Profile {
    /// Flips `following` and moves the follower count with it. The count
    /// saturates at zero when unfollowing a profile the server reported
    /// without followers.
    pub fn toggle_following(&mut self) {
        if self.following {
            self.followers_count = self.followers_count.saturating_sub(1);
        } else {
            self.followers_count += 1;
        }
        self.following = !self.following;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(followers_count: u32, following: bool) -> Profile {
        Profile {
            username: "alice".into(),
            display_name: "Alice".into(),
            image: None,
            bio: None,
            followers_count,
            following_count: 0,
            following,
        }
    }

    #[test]
    fn follow_then_unfollow_restores_the_count() {
        let mut alice = profile(4, false);

        alice.toggle_following();
        assert!(alice.following);
        assert_eq!(alice.followers_count, 5);

        alice.toggle_following();
        assert!(!alice.following);
        assert_eq!(alice.followers_count, 4);
    }

    #[test]
    fn unfollow_without_followers_stays_at_zero() {
        let mut alice = profile(0, true);

        alice.toggle_following();

        assert!(!alice.following);
        assert_eq!(alice.followers_count, 0);
    }
}
