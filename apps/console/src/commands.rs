use chrono::NaiveDate;

use appointment_cell::AppointmentStatus;
use routing_cell::Route;
use shared_models::auth::Role;

pub const HELP: &str = "\
Commands:
  login <email> <password> <doctor|patient>
  register patient <name> <email> <password> [photo_url]
  register doctor <name> <email> <password> <specialization> [photo_url]
  logout | whoami | goto <path>
  doctors | search <term> | filter <specialization|all> | clear | next | prev
  book <doctor_id> <YYYY-MM-DD>
  appointments | status <pending|completed|cancelled|all> | date <YYYY-MM-DD|today|none>
  complete <appointment_id> | cancel <appointment_id>
  help | quit
Quote arguments containing spaces, e.g. register patient \"Jane Doe\" ...";

#[derive(Debug, Clone, PartialEq)]
pub enum DateFilter {
    Today,
    On(NaiveDate),
    Any,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { email: String, password: String, role: Role },
    RegisterPatient { name: String, email: String, password: String, photo_url: Option<String> },
    RegisterDoctor {
        name: String,
        email: String,
        password: String,
        specialization: String,
        photo_url: Option<String>,
    },
    Logout,
    WhoAmI,
    Goto(Route),
    Doctors,
    Search(String),
    Filter(Option<String>),
    Clear,
    Next,
    Prev,
    Book { doctor_id: String, date: String },
    Appointments,
    Status(Option<AppointmentStatus>),
    Date(DateFilter),
    Complete(String),
    Cancel(String),
    Help,
    Quit,
}

/// Split on whitespace, keeping double-quoted runs together.
fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut started = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }

    if quoted {
        return Err("Unterminated quote".to_string());
    }
    if started {
        tokens.push(current);
    }
    Ok(tokens)
}

fn usage(form: &str) -> String {
    format!("Usage: {}", form)
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(None);
        };
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("login", [email, password, role]) => Command::Login {
                email: email.to_string(),
                password: password.to_string(),
                role: Role::parse(role).ok_or_else(|| format!("Unknown role '{}'", role))?,
            },
            ("login", _) => return Err(usage("login <email> <password> <doctor|patient>")),

            ("register", ["patient", name, email, password, rest @ ..]) if rest.len() <= 1 => {
                Command::RegisterPatient {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    photo_url: rest.first().map(|s| s.to_string()),
                }
            }
            ("register", ["doctor", name, email, password, specialization, rest @ ..]) if rest.len() <= 1 => {
                Command::RegisterDoctor {
                    name: name.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    specialization: specialization.to_string(),
                    photo_url: rest.first().map(|s| s.to_string()),
                }
            }
            ("register", _) => {
                return Err(usage(
                    "register patient <name> <email> <password> [photo_url] | \
                     register doctor <name> <email> <password> <specialization> [photo_url]",
                ))
            }

            ("logout", []) => Command::Logout,
            ("whoami", []) => Command::WhoAmI,
            ("goto", [path]) => {
                Command::Goto(Route::from_path(path).ok_or_else(|| format!("Unknown route '{}'", path))?)
            }
            ("doctors", []) => Command::Doctors,
            ("search", terms) => Command::Search(terms.join(" ")),
            ("filter", [] | ["all"]) => Command::Filter(None),
            ("filter", words) => Command::Filter(Some(words.join(" "))),
            ("clear", []) => Command::Clear,
            ("next", []) => Command::Next,
            ("prev", []) => Command::Prev,
            ("book", [doctor_id, date]) => Command::Book {
                doctor_id: doctor_id.to_string(),
                date: date.to_string(),
            },
            ("book", _) => return Err(usage("book <doctor_id> <YYYY-MM-DD>")),
            ("appointments", []) => Command::Appointments,
            ("status", ["all"]) => Command::Status(None),
            ("status", [status]) => Command::Status(Some(
                AppointmentStatus::parse(status).ok_or_else(|| format!("Unknown status '{}'", status))?,
            )),
            ("date", ["today"]) => Command::Date(DateFilter::Today),
            ("date", ["none" | "all"]) => Command::Date(DateFilter::Any),
            ("date", [date]) => Command::Date(DateFilter::On(
                NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| format!("Invalid date '{}'", date))?,
            )),
            ("complete", [id]) => Command::Complete(id.to_string()),
            ("cancel", [id]) => Command::Cancel(id.to_string()),
            ("help", _) => Command::Help,
            ("quit" | "exit", []) => Command::Quit,
            (other, _) => return Err(format!("Unknown command '{}', try 'help'", other)),
        };

        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_login() {
        assert_eq!(
            Command::parse("login a@b.com secret PATIENT").unwrap(),
            Some(Command::Login {
                email: "a@b.com".into(),
                password: "secret".into(),
                role: Role::Patient,
            })
        );
        assert_matches!(Command::parse("login a@b.com secret nurse"), Err(_));
    }

    #[test]
    fn test_quoted_names() {
        assert_matches!(
            Command::parse(r#"register doctor "Gregory House" house@example.com vicodin "Infectious Disease""#),
            Ok(Some(Command::RegisterDoctor { name, specialization, photo_url: None, .. }))
                if name == "Gregory House" && specialization == "Infectious Disease"
        );
        assert_matches!(Command::parse(r#"search "unterminated"#), Err(_));
    }

    #[test]
    fn test_filters() {
        assert_eq!(Command::parse("filter all").unwrap(), Some(Command::Filter(None)));
        assert_eq!(Command::parse("status all").unwrap(), Some(Command::Status(None)));
        assert_eq!(
            Command::parse("status cancelled").unwrap(),
            Some(Command::Status(Some(AppointmentStatus::Cancelled)))
        );
        assert_eq!(Command::parse("date today").unwrap(), Some(Command::Date(DateFilter::Today)));
        assert_matches!(Command::parse("date tomorrow"), Err(_));
    }

    #[test]
    fn test_routes_and_blank_lines() {
        assert_eq!(
            Command::parse("goto /patient/appointments").unwrap(),
            Some(Command::Goto(Route::PatientAppointments))
        );
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert_matches!(Command::parse("dance"), Err(_));
    }
}
