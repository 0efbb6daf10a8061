//! Text command parsing.
//!
//! Commands look like `/trip Beach` or, in group chats, `/trip@some_bot Beach`.
//! A command addressed to a different bot is not ours and parses to `None`.

/// A recognised command. Arguments that are missing or malformed are kept as
/// `None` so the caller can answer with usage help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
  Start,
  Help,
  /// `/trip <name>`: the rest of the line, trimmed.
  Trip(Option<String>),
  /// `/seats <n>`: a decimal seat count.
  Seats(Option<u32>),
  /// `/name <name>`: the leading ASCII alphanumeric run of the argument.
  Name(Option<String>),
}

impl Command {
  pub fn parse(text: &str, bot_username: &str) -> Option<Self> {
    let text = text.trim_start();
    let rest = text.strip_prefix('/')?;

    let (head, arg) = match rest.split_once(char::is_whitespace) {
      Some((head, arg)) => (head, arg),
      None => (rest, ""),
    };

    let name = match head.split_once('@') {
      Some((name, target)) => {
        if !target.eq_ignore_ascii_case(bot_username) {
          return None;
        }
        name
      }
      None => head,
    };

    let command = match name {
      "start" => Command::Start,
      "help" => Command::Help,
      "trip" => Command::Trip(parse_trip_name(arg)),
      "seats" => Command::Seats(parse_seats(arg)),
      "name" => Command::Name(parse_name(arg)),
      _ => return None,
    };
    Some(command)
  }
}

fn parse_trip_name(arg: &str) -> Option<String> {
  let name = arg.trim();
  (!name.is_empty()).then(|| name.to_string())
}

fn parse_seats(arg: &str) -> Option<u32> {
  let digits: String = arg
    .trim_start()
    .chars()
    .take_while(char::is_ascii_digit)
    .collect();
  digits.parse().ok()
}

fn parse_name(arg: &str) -> Option<String> {
  let name: String = arg
    .trim_start()
    .chars()
    .take_while(char::is_ascii_alphanumeric)
    .collect();
  (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  const BOT: &str = "car_organizer_bot";

  fn parse(text: &str) -> Option<Command> { Command::parse(text, BOT) }

  #[test]
  fn trip_takes_the_whole_line() {
    assert_eq!(
      parse("/trip  Beach weekend "),
      Some(Command::Trip(Some("Beach weekend".into())))
    );
    assert_eq!(parse("/trip"), Some(Command::Trip(None)));
    assert_eq!(parse("/trip   "), Some(Command::Trip(None)));
  }

  #[test]
  fn bot_suffix_is_accepted_for_this_bot_only() {
    assert_eq!(
      parse("/trip@car_organizer_bot Beach"),
      Some(Command::Trip(Some("Beach".into())))
    );
    assert_eq!(parse("/help@Car_Organizer_Bot"), Some(Command::Help));
    assert_eq!(parse("/trip@other_bot Beach"), None);
  }

  #[test]
  fn seats_takes_the_leading_number() {
    assert_eq!(parse("/seats 4"), Some(Command::Seats(Some(4))));
    assert_eq!(parse("/seats 4abc"), Some(Command::Seats(Some(4))));
    assert_eq!(parse("/seats 12seats"), Some(Command::Seats(Some(12))));
    assert_eq!(parse("/seats 4 please"), Some(Command::Seats(Some(4))));
    assert_eq!(parse("/seats"), Some(Command::Seats(None)));
    assert_eq!(parse("/seats four"), Some(Command::Seats(None)));
    assert_eq!(parse("/seats -1"), Some(Command::Seats(None)));
    assert_eq!(parse("/seats 99999999999"), Some(Command::Seats(None)));
  }

  #[test]
  fn name_keeps_leading_alphanumerics() {
    assert_eq!(parse("/name Bob42"), Some(Command::Name(Some("Bob42".into()))));
    assert_eq!(parse("/name Bob Stone"), Some(Command::Name(Some("Bob".into()))));
    assert_eq!(parse("/name B.Stone"), Some(Command::Name(Some("B".into()))));
    assert_eq!(parse("/name !!"), Some(Command::Name(None)));
  }

  #[test]
  fn other_text_is_ignored() {
    assert_eq!(parse("hello"), None);
    assert_eq!(parse("/unknown"), None);
    assert_eq!(parse("/tripx Beach"), None);
    assert_eq!(parse(""), None);
  }

  #[test]
  fn start_and_help() {
    assert_eq!(parse("/start"), Some(Command::Start));
    assert_eq!(parse("  /help"), Some(Command::Help));
  }
}
