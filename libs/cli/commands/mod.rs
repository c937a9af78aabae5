use clap::Subcommand;
use huddle_core::Core;

use crate::utils::{command_error, session_file::SessionFile};

pub mod account;
pub mod activity;
pub mod attend;
pub mod create;
pub mod delete;
pub mod edit;
pub mod follow;
pub mod list;
pub mod show;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the session
    Login(account::LoginCommand),
    /// Create an account and sign in with it
    Register(account::RegisterCommand),
    /// Forget the stored session
    Logout(account::LogoutCommand),
    /// Display the signed in user
    Whoami(account::WhoamiCommand),
    /// List upcoming activities grouped by day
    List(list::Command),
    /// Display one activity
    Show(show::Command),
    /// Host a new activity
    Create(create::Command),
    /// Update an activity you host
    Edit(edit::Command),
    /// Remove an activity you host
    Delete(delete::Command),
    /// Join or leave an activity
    Attend(attend::Command),
    /// Cancel or reactivate an activity you host
    Cancel(attend::CancelCommand),
    /// Follow or unfollow a user
    Follow(follow::Command),
}

impl Command {
    pub async fn execute(self, core: &Core, session_file: &SessionFile) -> command_error::Result<()> {
        match self {
            Self::Login(o) => account::handle_login(o, core, session_file).await?,
            Self::Register(o) => account::handle_register(o, core, session_file).await?,
            Self::Logout(o) => account::handle_logout(o, core, session_file).await?,
            Self::Whoami(o) => account::handle_whoami(o, core).await?,
            Self::List(o) => list::handle(o, core).await?,
            Self::Show(o) => show::handle(o, core).await?,
            Self::Create(o) => create::handle(o, core).await?,
            Self::Edit(o) => edit::handle(o, core).await?,
            Self::Delete(o) => delete::handle(o, core).await?,
            Self::Attend(o) => attend::handle(o, core).await?,
            Self::Cancel(o) => attend::handle_cancel(o, core).await?,
            Self::Follow(o) => follow::handle(o, core).await?,
        };

        Ok(())
    }
}
