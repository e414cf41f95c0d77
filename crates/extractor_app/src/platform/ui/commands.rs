use extractor_core::{InputType, Msg, RangeType};

pub const HELP: &str = "\
Commands:
  type single|playlist     choose single video or playlist input
  url <url>                set the video or playlist URL
  name <name>              set the playlist name
  range entire|specific    extract the whole playlist or a range
  start <n> / end <n>      range bounds (blank to clear)
  list                     fetch the playlist contents again
  select <i> / unselect <i>
                           tick or clear one video by index
  all on|off               tick or clear every video
  sort                     flip the index sort order
  submit                   start the extraction
  abort                    stop the running extraction
  wait                     hold further commands until idle
  show                     print the full form and video table
  help                     print this text
  quit                     abort if needed and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Dispatch(Msg),
    Show,
    Help,
    Wait,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "type" => Command::Dispatch(Msg::InputTypeChanged(parse_input_type(rest)?)),
        "url" => Command::Dispatch(Msg::UrlChanged(rest.to_string())),
        "name" => Command::Dispatch(Msg::PlaylistNameChanged(rest.to_string())),
        "range" => Command::Dispatch(Msg::RangeTypeChanged(parse_range_type(rest)?)),
        "start" => Command::Dispatch(Msg::StartIndexChanged(rest.to_string())),
        "end" => Command::Dispatch(Msg::EndIndexChanged(rest.to_string())),
        "list" => Command::Dispatch(Msg::RefreshListClicked),
        "select" => Command::Dispatch(Msg::RowToggled {
            index: parse_index(rest)?,
            checked: true,
        }),
        "unselect" => Command::Dispatch(Msg::RowToggled {
            index: parse_index(rest)?,
            checked: false,
        }),
        "all" => Command::Dispatch(Msg::SelectAllToggled(parse_switch(rest)?)),
        "sort" => Command::Dispatch(Msg::SortClicked),
        "submit" => Command::Dispatch(Msg::SubmitClicked),
        "abort" => Command::Dispatch(Msg::AbortClicked),
        "wait" => Command::Wait,
        "show" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_input_type(value: &str) -> Result<InputType, String> {
    match value.to_ascii_lowercase().as_str() {
        "single" | "video" => Ok(InputType::Single),
        "playlist" => Ok(InputType::Playlist),
        _ => Err(format!("expected 'single' or 'playlist', got '{value}'")),
    }
}

fn parse_range_type(value: &str) -> Result<RangeType, String> {
    match value.to_ascii_lowercase().as_str() {
        "entire" => Ok(RangeType::Entire),
        "specific" => Ok(RangeType::Specific),
        _ => Err(format!("expected 'entire' or 'specific', got '{value}'")),
    }
}

fn parse_index(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("expected a video index, got '{value}'"))
}

fn parse_switch(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "yes" | "true" => Ok(true),
        "off" | "no" | "false" => Ok(false),
        _ => Err(format!("expected 'on' or 'off', got '{value}'")),
    }
}
