use colored::*;
use huddle_api::{Activity, UiSignal};
use std::fmt::Display;

pub enum LogType {
    Success,
    Info,
    Warning,
}

/// A builder for tree-like messages: one header line, then one branch per detail.
pub struct LogBuilder<'a> {
    log_type: LogType,
    message: String,
    details: Vec<(&'a str, Box<dyn Display>)>,
}

impl<'a> LogBuilder<'a> {
    pub fn new(log_type: LogType, message: impl Display) -> Self {
        Self {
            log_type,
            message: message.to_string(),
            details: Vec::new(),
        }
    }

    pub fn with_branch(mut self, label: &'a str, value: impl Display + 'static) -> Self {
        self.details.push((label, Box::new(value)));
        self
    }

    pub fn with_optional_branch<T: Display + 'static>(
        self,
        label: &'a str,
        value: Option<T>,
    ) -> Self {
        if let Some(val) = value {
            self.with_branch(label, val)
        } else {
            self
        }
    }

    pub fn print(self) {
        let (symbol, color) = match self.log_type {
            LogType::Success => ("✔", "green"),
            LogType::Info => ("ℹ", "blue"),
            LogType::Warning => ("⚠", "yellow"),
        };

        println!(
            "\n{} {}",
            symbol.color(color).bold(),
            self.message.color(color).bold()
        );

        let count = self.details.len();
        for (i, (label, value)) in self.details.iter().enumerate() {
            let prefix = if i == count - 1 { "  ╰─" } else { "  ├─" };
            let padded_label = format!("{label}:");
            // "Attendees:" is the longest label
            println!("{} {:<10} {}", prefix.dimmed(), padded_label.bold(), value);
        }
    }
}

pub fn print_errors(messages: &[String]) {
    eprintln!("{}", "The request was rejected:".red().bold());
    for message in messages {
        eprintln!("  {} {}", "•".red(), message);
    }
}

/// Toasts and navigation requests raised while a command ran.
pub fn print_signals(signals: Vec<UiSignal>) {
    for signal in signals {
        match signal {
            UiSignal::Toast(message) => eprintln!("{} {}", "!".yellow().bold(), message.yellow()),
            UiSignal::Navigate(route) => {
                eprintln!("{} {}", "→".dimmed(), route.path().dimmed())
            }
        }
    }
}

/// Short status of an activity relative to the signed in user.
pub fn activity_status(activity: &Activity) -> String {
    let mut tags = Vec::new();
    if activity.is_cancelled {
        tags.push("cancelled".red().to_string());
    }
    if activity.is_host {
        tags.push("hosting".cyan().to_string());
    } else if activity.is_going {
        tags.push("going".green().to_string());
    }
    tags.join(" ")
}

pub fn host_name(activity: &Activity) -> String {
    activity
        .host
        .as_ref()
        .map(|h| h.display_name.clone())
        .unwrap_or_else(|| activity.host_username.clone())
}
