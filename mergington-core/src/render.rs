//! Markup for the board.
//!
//! Everything here is a pure function of the values passed in. The board is rendered from
//! scratch on every refresh, nothing is patched.

use maud::{html, Markup};
use mergington_models::Activity;

use crate::{
    board::{Listing, SignupForm, LOAD_FAILED_TEXT},
    events::{ACTION_SIGNUP, ACTION_UNREGISTER},
    notice::Notice,
};

pub const LOADING_TEXT: &str = "Loading activities...";
pub const NO_PARTICIPANTS_TEXT: &str = "No participants registered yet.";
pub const SELECT_PLACEHOLDER: &str = "-- Select an activity --";

/// Everything the board shows at one moment.
#[derive(Debug, Clone)]
pub struct BoardView<'a> {
    pub listing: &'a Listing,
    pub form: &'a SignupForm,
    pub notice: Option<Notice>,
}

/// Where the board's forms post to. Hosts mounting the board elsewhere than the root
/// override these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardRoutes {
    pub signup: String,
    pub unregister: String,
}

impl Default for BoardRoutes {
    fn default() -> Self {
        Self {
            signup: "/signup".to_string(),
            unregister: "/unregister".to_string(),
        }
    }
}

pub fn availability_text(activity: &Activity) -> String {
    format!("{} spots left", activity.spots_left())
}

fn participant_item(routes: &BoardRoutes, activity: &Activity, email: &str) -> Markup {
    html! {
        li.participant {
            span.participant__email { (email) }
            form.participant__remove method="post" action=(routes.unregister) {
                input type="hidden" name="activity" value=(activity.name);
                input type="hidden" name="email" value=(email);
                button.delete-participant type="submit" name="action" value=(ACTION_UNREGISTER)
                    aria-label=(format!("Remove {} from {}", email, activity.name))
                    data-action=(ACTION_UNREGISTER)
                    data-activity=(activity.name)
                    data-email=(email) {
                    "🗑️"
                }
            }
        }
    }
}

pub fn participants_section(routes: &BoardRoutes, activity: &Activity) -> Markup {
    html! {
        @if activity.has_participants() {
            div.participants-section {
                strong { "Registered Participants:" }
                ul.participants-list {
                    @for email in &activity.participants {
                        (participant_item(routes, activity, email))
                    }
                }
            }
        } @else {
            div.participants-section.empty {
                em { (NO_PARTICIPANTS_TEXT) }
            }
        }
    }
}

pub fn activity_card(routes: &BoardRoutes, activity: &Activity) -> Markup {
    html! {
        div.activity-card {
            h4 { (activity.name) }
            p { (activity.description) }
            p {
                strong { "Schedule: " }
                (activity.schedule)
            }
            p.availability {
                strong { "Availability: " }
                (availability_text(activity))
            }
            (participants_section(routes, activity))
        }
    }
}

/// The activity list, with the default routes.
pub fn activity_list(listing: &Listing) -> Markup {
    activity_list_with(&BoardRoutes::default(), listing)
}

pub fn activity_list_with(routes: &BoardRoutes, listing: &Listing) -> Markup {
    html! {
        div #activities-list {
            @match listing {
                Listing::Loading => p { (LOADING_TEXT) },
                Listing::Failed => p { (LOAD_FAILED_TEXT) },
                Listing::Loaded(roster) => {
                    @for activity in roster {
                        (activity_card(routes, activity))
                    }
                },
            }
        }
    }
}

/// Selector options, rebuilt from the roster on every render.
pub fn activity_select(listing: &Listing, selected: &str) -> Markup {
    html! {
        select #activity name="activity" required {
            option value="" selected[selected.is_empty()] { (SELECT_PLACEHOLDER) }
            @if let Some(roster) = listing.roster() {
                @for name in roster.names() {
                    option value=(name) selected[name == selected] { (name) }
                }
            }
        }
    }
}

pub fn signup_form(routes: &BoardRoutes, view: &BoardView<'_>) -> Markup {
    html! {
        form #signup-form method="post" action=(routes.signup) {
            input type="hidden" name="action" value=(ACTION_SIGNUP);
            div.form-group {
                label for="email" { "Student Email:" }
                input #email type="email" name="email" required
                    placeholder="your-email@mergington.edu" value=(view.form.email);
            }
            div.form-group {
                label for="activity" { "Select Activity:" }
                (activity_select(view.listing, &view.form.activity))
            }
            button type="submit" { "Sign Up" }
        }
    }
}

/// The message area. Hidden when there is nothing to show; a notice carries its remaining
/// display time so the page can hide it without asking the host again.
pub fn notice(notice: Option<&Notice>) -> Markup {
    html! {
        @match notice {
            Some(n) => {
                @let ms = n.hide_after.as_millis().to_string();
                div #message class=(format!("message {}", n.kind.css_class()))
                    data-hide-after-ms=(ms)
                    style=(format!("animation-delay: {}ms", ms)) {
                    (n.text)
                }
            },
            None => div #message.message.hidden {},
        }
    }
}

pub fn board(routes: &BoardRoutes, view: &BoardView<'_>) -> Markup {
    html! {
        section #activities-container {
            h3 { "Available Activities" }
            (activity_list_with(routes, view.listing))
        }
        section #signup-container {
            h3 { "Sign Up for an Activity" }
            (signup_form(routes, view))
            (notice(view.notice.as_ref()))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use mergington_models::ActivityRoster;

    fn roster() -> ActivityRoster {
        vec![
            Activity::new("Chess Club")
                .with_description("Learn strategies")
                .with_schedule("Fridays, 3:30 PM - 5:00 PM")
                .with_capacity(12)
                .with_participant("a@x.com"),
            Activity::new("Drama Club")
                .with_description("Theater arts")
                .with_schedule("Tuesdays")
                .with_capacity(25),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    pub fn test_chess_club_availability() {
        let html = activity_list(&Listing::Loaded(roster())).into_string();
        assert!(html.contains("<strong>Availability: </strong>11 spots left"));
        assert!(html.contains("25 spots left"));
        assert!(html.contains("<strong>Schedule: </strong>Fridays, 3:30 PM - 5:00 PM"));
    }

    #[test]
    pub fn test_spots_left_matches_every_activity() {
        let roster = roster();
        let html = activity_list(&Listing::Loaded(roster.clone())).into_string();
        for activity in &roster {
            let expected = activity.max_participants as usize - activity.participants.len();
            assert!(html.contains(&format!("{} spots left", expected)));
        }
    }

    #[test]
    pub fn test_empty_roster_shows_empty_state() {
        let drama = Activity::new("Drama Club").with_capacity(25);
        let html = participants_section(&BoardRoutes::default(), &drama).into_string();
        assert!(html.contains(NO_PARTICIPANTS_TEXT));
        assert!(html.contains("participants-section empty"));
        assert!(!html.contains("<ul"));
    }

    #[test]
    pub fn test_removal_control_carries_event_attributes() {
        let chess = Activity::new("Chess Club").with_capacity(12).with_participant("a@x.com");
        let html = participants_section(&BoardRoutes::default(), &chess).into_string();
        assert!(html.contains(r#"data-action="unregister""#));
        assert!(html.contains(r#"data-activity="Chess Club""#));
        assert!(html.contains(r#"data-email="a@x.com""#));
        assert!(html.contains(r#"aria-label="Remove a@x.com from Chess Club""#));
        assert!(html.contains(r#"action="/unregister""#));
    }

    #[test]
    pub fn test_names_are_escaped() {
        let odd = Activity::new("<script>\"Club\"</script>").with_participant("x\"@y.com");
        let html = activity_card(&BoardRoutes::default(), &odd).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    pub fn test_placeholders() {
        assert!(activity_list(&Listing::Loading).into_string().contains(LOADING_TEXT));
        assert!(activity_list(&Listing::Failed)
            .into_string()
            .contains(LOAD_FAILED_TEXT));
    }

    #[test]
    pub fn test_select_rebuilt_from_roster() {
        let listing = Listing::Loaded(roster());
        let html = activity_select(&listing, "Drama Club").into_string();
        assert!(html.contains(r#"<option value="Chess Club">Chess Club</option>"#));
        assert!(html.contains(r#"<option value="Drama Club" selected>Drama Club</option>"#));
        assert_eq!(3, html.matches("<option").count());

        let html = activity_select(&Listing::Failed, "").into_string();
        assert_eq!(1, html.matches("<option").count());
    }

    #[test]
    pub fn test_form_keeps_values() {
        let listing = Listing::Loaded(roster());
        let form = SignupForm {
            email: "kept@mergington.edu".to_string(),
            activity: "Chess Club".to_string(),
        };
        let view = BoardView {
            listing: &listing,
            form: &form,
            notice: None,
        };
        let html = board(&BoardRoutes::default(), &view).into_string();
        assert!(html.contains(r#"value="kept@mergington.edu""#));
        assert!(html.contains(r#"<option value="Chess Club" selected>"#));
        assert!(html.contains(r#"class="message hidden""#));
    }
}
