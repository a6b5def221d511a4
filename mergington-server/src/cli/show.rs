use anyhow::Context;
use mergington_core::{config::Configuration, render, ActivityApi, HttpActivityApi};
use mergington_dependencies::serde_json;
use mergington_models::{Activity, ActivityRoster};

use crate::cli::ShowCli;

pub async fn show(config: Configuration, cli: ShowCli) -> anyhow::Result<()> {
    let api = HttpActivityApi::new(&config)?;
    debug!("fetching activities from {}", api.base());
    let roster = api
        .activities()
        .await
        .with_context(|| format!("could not fetch activities from {}", api.base()))?;
    let roster = select(roster, cli.activity.as_deref())?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&roster)?);
    } else {
        for activity in &roster {
            print!("{}", summary(activity));
        }
    }
    Ok(())
}

fn select(roster: ActivityRoster, name: Option<&str>) -> anyhow::Result<ActivityRoster> {
    match name {
        None => Ok(roster),
        Some(name) => {
            let activity = roster
                .get(name)
                .cloned()
                .with_context(|| format!("no activity named {:?}", name))?;
            Ok(std::iter::once(activity).collect())
        }
    }
}

fn summary(activity: &Activity) -> String {
    let mut out = format!(
        "{}\n  {}\n  Schedule: {}\n  Availability: {}\n",
        activity.name,
        activity.description,
        activity.schedule,
        render::availability_text(activity)
    );
    if activity.has_participants() {
        for email in &activity.participants {
            out.push_str(&format!("  - {}\n", email));
        }
    } else {
        out.push_str(&format!("  {}\n", render::NO_PARTICIPANTS_TEXT));
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    fn roster() -> ActivityRoster {
        vec![
            Activity::new("Chess Club")
                .with_schedule("Fridays")
                .with_capacity(12)
                .with_participant("michael@mergington.edu"),
            Activity::new("Basketball Team").with_capacity(15),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    pub fn test_summary() {
        let roster = roster();
        let chess = summary(roster.get("Chess Club").expect("seeded"));
        assert!(chess.contains("Availability: 11 spots left"));
        assert!(chess.contains("  - michael@mergington.edu\n"));
        let basketball = summary(roster.get("Basketball Team").expect("seeded"));
        assert!(basketball.contains(render::NO_PARTICIPANTS_TEXT));
    }

    #[test]
    pub fn test_select_one_activity() -> anyhow::Result<()> {
        let only = select(roster(), Some("Basketball Team"))?;
        assert_eq!(vec!["Basketball Team"], only.names().collect::<Vec<_>>());
        assert_eq!(2, select(roster(), None)?.len());
        assert!(select(roster(), Some("Drama Club")).is_err());
        Ok(())
    }
}
